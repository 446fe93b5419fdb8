//! Tip localisation along the shaft axis and the confidence heuristic.

use dartcam_core::Roi;
use nalgebra::{Point2, Vector2};

use crate::types::AxisSegment;

/// Pixels within this distance of the outward extreme are averaged into the tip.
const TIP_BAND_PX: f32 = 1.0;

/// Tip estimate and the axis extent it was taken from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipEstimate {
    pub tip: Point2<f32>,
    pub axis: AxisSegment,
}

/// Project every pixel on `direction` (through `centroid`) and average the
/// pixels near the outward end.
///
/// `direction` must be a unit vector already oriented outward.
pub fn locate_tip(
    pixels: &[usize],
    width: usize,
    centroid: Point2<f32>,
    direction: Vector2<f32>,
) -> Option<TipEstimate> {
    if pixels.is_empty() || width == 0 {
        return None;
    }
    let project = |i: usize| {
        let p = Point2::new((i % width) as f32, (i / width) as f32);
        ((p - centroid).dot(&direction), p)
    };

    let mut t_min = f32::INFINITY;
    let mut t_max = f32::NEG_INFINITY;
    for &i in pixels {
        let (t, _) = project(i);
        t_min = t_min.min(t);
        t_max = t_max.max(t);
    }

    let mut sum = Vector2::zeros();
    let mut n = 0usize;
    for &i in pixels {
        let (t, p) = project(i);
        if t >= t_max - TIP_BAND_PX {
            sum += p.coords;
            n += 1;
        }
    }
    let tip = Point2::from(sum / n.max(1) as f32);

    let tail = centroid + direction * t_min;
    let head = centroid + direction * t_max;
    Some(TipEstimate {
        tip,
        axis: AxisSegment {
            x1: tail.x,
            y1: tail.y,
            x2: head.x,
            y2: head.y,
        },
    })
}

/// Heuristic confidence in `[0, 1]`.
///
/// Starts at 0.5 and rewards thin fills, tips near the ROI and elongated blobs.
pub fn confidence(fill_ratio: f32, tip: Point2<f32>, roi: &Roi, elongation: f32) -> f32 {
    let mut c = 0.5;
    if fill_ratio < 0.45 {
        c += 0.20;
        if fill_ratio < 0.25 {
            c += 0.15;
        }
    }
    if roi.is_enabled() && (tip - roi.center).norm() <= 1.1 * roi.radius {
        c += 0.10;
    }
    if elongation > 0.3 {
        c += 0.10;
    }
    f32::clamp(c, 0.0, 1.0)
}
