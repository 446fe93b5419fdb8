//! 4-connected component labeling.

use dartcam_core::BoundingBox;
use nalgebra::Point2;

/// One connected component of the foreground mask.
///
/// Borrows the tracker's pixel buffer; valid until the next detection call.
#[derive(Clone, Debug)]
pub struct Blob<'a> {
    /// Linear (row-major) indices of member pixels.
    pub pixels: &'a [usize],
    pub area: usize,
    pub bbox: BoundingBox,
    pub centroid: Point2<f32>,
}

impl Blob<'_> {
    /// `area / bbox.area()`; thin diagonal shafts score low.
    pub fn fill_ratio(&self) -> f32 {
        let bbox_area = self.bbox.area();
        if bbox_area == 0 {
            return 0.0;
        }
        self.area as f32 / bbox_area as f32
    }
}

struct Component {
    label: u32,
    area: usize,
    bbox: BoundingBox,
    sum_x: f64,
    sum_y: f64,
}

/// Label the mask and return the largest component, if any.
///
/// `labels`, `queue` and `pixels` are scratch buffers reused across calls;
/// `labels` must be `w * h` long. Ties keep the component found first in
/// row-major order.
pub fn largest_component<'a>(
    mask: &[u8],
    w: usize,
    h: usize,
    labels: &mut [u32],
    queue: &mut Vec<usize>,
    pixels: &'a mut Vec<usize>,
) -> Option<Blob<'a>> {
    labels.iter_mut().for_each(|l| *l = 0);
    let mut next_label = 0u32;
    let mut best: Option<Component> = None;

    for start in 0..w * h {
        if mask[start] == 0 || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        let comp = flood(mask, w, h, labels, queue, start, next_label);
        if best.as_ref().map_or(true, |b| comp.area > b.area) {
            best = Some(comp);
        }
    }

    let best = best?;
    pixels.clear();
    for y in best.bbox.y..best.bbox.y + best.bbox.h {
        for x in best.bbox.x..best.bbox.x + best.bbox.w {
            let i = y * w + x;
            if labels[i] == best.label {
                pixels.push(i);
            }
        }
    }

    let n = best.area as f64;
    Some(Blob {
        pixels: pixels.as_slice(),
        area: best.area,
        bbox: best.bbox,
        centroid: Point2::new((best.sum_x / n) as f32, (best.sum_y / n) as f32),
    })
}

/// Breadth-first flood fill from `start`, writing `label`.
fn flood(
    mask: &[u8],
    w: usize,
    h: usize,
    labels: &mut [u32],
    queue: &mut Vec<usize>,
    start: usize,
    label: u32,
) -> Component {
    queue.clear();
    queue.push(start);
    labels[start] = label;

    let mut comp = Component {
        label,
        area: 0,
        bbox: BoundingBox::from_pixel(start % w, start / w),
        sum_x: 0.0,
        sum_y: 0.0,
    };

    let mut head = 0;
    while head < queue.len() {
        let i = queue[head];
        head += 1;
        let (x, y) = (i % w, i / w);
        comp.area += 1;
        comp.sum_x += x as f64;
        comp.sum_y += y as f64;
        comp.bbox.include(x, y);

        let mut visit = |j: usize| {
            if mask[j] != 0 && labels[j] == 0 {
                labels[j] = label;
                queue.push(j);
            }
        };
        if x > 0 {
            visit(i - 1);
        }
        if x + 1 < w {
            visit(i + 1);
        }
        if y > 0 {
            visit(i - w);
        }
        if y + 1 < h {
            visit(i + w);
        }
    }
    comp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(rows: &[&str]) -> (Vec<u8>, usize, usize) {
        let h = rows.len();
        let w = rows[0].len();
        let m = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| (b == b'#') as u8))
            .collect();
        (m, w, h)
    }

    #[test]
    fn picks_largest_component() {
        let (m, w, h) = mask(&[
            "##......", //
            "##...###", //
            ".....###", //
            "......#.",
        ]);
        let mut labels = vec![0; w * h];
        let mut queue = Vec::new();
        let mut pixels = Vec::new();
        let blob = largest_component(&m, w, h, &mut labels, &mut queue, &mut pixels).unwrap();
        assert_eq!(blob.area, 7);
        assert_eq!(blob.bbox, BoundingBox { x: 5, y: 1, w: 3, h: 3 });
        assert_eq!(blob.pixels.len(), 7);
        assert!((blob.centroid.x - 6.0).abs() < 1e-6);
        assert!((blob.centroid.y - 13.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn diagonal_pixels_are_not_connected() {
        let (m, w, h) = mask(&["#.", ".#"]);
        let mut labels = vec![0; w * h];
        let mut queue = Vec::new();
        let mut pixels = Vec::new();
        let blob = largest_component(&m, w, h, &mut labels, &mut queue, &mut pixels).unwrap();
        assert_eq!(blob.area, 1);
        assert_eq!(blob.pixels, &[0]);
        assert_eq!(labels, vec![1, 0, 0, 2]);
    }

    #[test]
    fn empty_mask_has_no_blob() {
        let m = vec![0u8; 12];
        let mut labels = vec![0; 12];
        let mut queue = Vec::new();
        let mut pixels = Vec::new();
        assert!(largest_component(&m, 4, 3, &mut labels, &mut queue, &mut pixels).is_none());
    }

    #[test]
    fn fill_ratio_of_diagonal_is_low() {
        let pixels = [0usize, 5, 10, 15];
        let blob = Blob {
            pixels: &pixels,
            area: 4,
            bbox: BoundingBox { x: 0, y: 0, w: 4, h: 4 },
            centroid: Point2::new(1.5, 1.5),
        };
        assert!((blob.fill_ratio() - 0.25).abs() < 1e-6);
    }
}
