//! Pixel-space primitives shared by the detector and its callers.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Circular region of interest in pixel coordinates.
///
/// A radius of zero disables spatial filtering; the center still defines the
/// board center used for the outward direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub center: Point2<f32>,
    pub radius: f32,
}

impl Roi {
    /// Build a ROI. Negative or non-finite radii are clamped to zero.
    pub fn new(center_x: f32, center_y: f32, radius: f32) -> Self {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        Self {
            center: Point2::new(center_x, center_y),
            radius,
        }
    }

    /// Unrestricted ROI centred on the frame.
    pub fn frame_center(width: usize, height: usize) -> Self {
        Self::new(width as f32 * 0.5, height as f32 * 0.5, 0.0)
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.radius > 0.0
    }

    /// Whether pixel `(x, y)` lies inside the ROI. Always true when disabled.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        if !self.is_enabled() {
            return true;
        }
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Vector from the ROI center to `p`.
    #[inline]
    pub fn radial(&self, p: Point2<f32>) -> Vector2<f32> {
        p - self.center
    }
}

/// Axis-aligned integer bounding box, `w`/`h` inclusive of the last pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl BoundingBox {
    /// Bounding box covering a single pixel.
    pub fn from_pixel(x: usize, y: usize) -> Self {
        Self { x, y, w: 1, h: 1 }
    }

    /// Grow the box so it covers pixel `(x, y)`.
    pub fn include(&mut self, x: usize, y: usize) {
        let x1 = (self.x + self.w).max(x + 1);
        let y1 = (self.y + self.h).max(y + 1);
        self.x = self.x.min(x);
        self.y = self.y.min(y);
        self.w = x1 - self.x;
        self.h = y1 - self.y;
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.w * self.h
    }

    /// Whether the point lies within the covered pixels.
    pub fn contains(&self, p: Point2<f32>) -> bool {
        p.x >= self.x as f32
            && p.y >= self.y as f32
            && p.x <= (self.x + self.w) as f32
            && p.y <= (self.y + self.h) as f32
    }

    /// Intersect with a `width x height` frame. Returns `None` when disjoint.
    pub fn clamp_to(&self, width: usize, height: usize) -> Option<Self> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let x1 = (self.x + self.w).min(width);
        let y1 = (self.y + self.h).min(height);
        (x1 > self.x && y1 > self.y).then(|| Self {
            x: self.x,
            y: self.y,
            w: x1 - self.x,
            h: y1 - self.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_radius_clamps_to_disabled() {
        let roi = Roi::new(10.0, 10.0, -5.0);
        assert!(!roi.is_enabled());
        assert!(roi.contains(1000.0, -1000.0));
    }

    #[test]
    fn roi_contains_boundary() {
        let roi = Roi::new(0.0, 0.0, 5.0);
        assert!(roi.contains(3.0, 4.0));
        assert!(!roi.contains(3.0, 4.1));
    }

    #[test]
    fn bbox_grows_to_cover_pixels() {
        let mut b = BoundingBox::from_pixel(5, 5);
        b.include(2, 7);
        b.include(9, 6);
        assert_eq!(b, BoundingBox { x: 2, y: 5, w: 8, h: 3 });
        assert_eq!(b.area(), 24);
        assert!(b.contains(Point2::new(9.5, 7.5)));
    }

    #[test]
    fn bbox_clamps_to_frame() {
        let b = BoundingBox { x: 8, y: 8, w: 10, h: 10 };
        assert_eq!(b.clamp_to(12, 10), Some(BoundingBox { x: 8, y: 8, w: 4, h: 2 }));
        assert_eq!(b.clamp_to(8, 20), None);
    }
}
