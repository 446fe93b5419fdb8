//! Principal axis of a blob from its 2x2 pixel covariance.

use nalgebra::{Point2, Vector2};

/// Major axis of a pixel set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrincipalAxis {
    /// Unit vector along the major axis. Sign is arbitrary until oriented.
    pub direction: Vector2<f32>,
    /// Larger covariance eigenvalue.
    pub lambda1: f32,
    /// Smaller covariance eigenvalue.
    pub lambda2: f32,
}

impl PrincipalAxis {
    /// `1 - lambda2 / lambda1`, 0 for isotropic blobs, towards 1 for lines.
    pub fn elongation(&self) -> f32 {
        if self.lambda1 <= f32::EPSILON {
            return 0.0;
        }
        (1.0 - self.lambda2 / self.lambda1).clamp(0.0, 1.0)
    }

    /// Flip the direction so that it points along `outward`.
    ///
    /// A zero `outward` leaves the axis unchanged.
    pub fn oriented(mut self, outward: Vector2<f32>) -> Self {
        if self.direction.dot(&outward) < 0.0 {
            self.direction = -self.direction;
        }
        self
    }

    /// Unsigned angle between the axis line and `radial`, in degrees (0..=90).
    ///
    /// Returns `None` when `radial` is shorter than `min_len`.
    pub fn angle_to_deg(&self, radial: Vector2<f32>, min_len: f32) -> Option<f32> {
        let len = radial.norm();
        if len < min_len {
            return None;
        }
        let cos = (self.direction.dot(&radial) / len).abs().min(1.0);
        Some(cos.acos().to_degrees())
    }
}

/// Eigen-decomposition of the symmetric matrix `[[a, b], [b, c]]`.
///
/// Returns `(lambda1, lambda2, v1)` with `lambda1 >= lambda2` and `v1` the
/// unit eigenvector of `lambda1`.
pub fn symmetric_eigen2(a: f32, b: f32, c: f32) -> (f32, f32, Vector2<f32>) {
    let mid = 0.5 * (a + c);
    let half_diff = 0.5 * (a - c);
    let r = (half_diff * half_diff + b * b).sqrt();
    let l1 = mid + r;
    let l2 = mid - r;

    let v = if b.abs() > 1e-9 {
        Vector2::new(l1 - c, b)
    } else if a >= c {
        Vector2::x()
    } else {
        Vector2::y()
    };
    let n = v.norm();
    let v = if n > 0.0 { v / n } else { Vector2::x() };
    (l1, l2, v)
}

/// Principal axis of the pixels (linear indices into a `width`-wide image).
pub fn principal_axis(pixels: &[usize], width: usize, centroid: Point2<f32>) -> PrincipalAxis {
    let mut sxx = 0.0f64;
    let mut sxy = 0.0f64;
    let mut syy = 0.0f64;
    for &i in pixels {
        let dx = (i % width) as f64 - centroid.x as f64;
        let dy = (i / width) as f64 - centroid.y as f64;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    let n = pixels.len().max(1) as f64;
    let (l1, l2, v) = symmetric_eigen2((sxx / n) as f32, (sxy / n) as f32, (syy / n) as f32);
    PrincipalAxis {
        direction: v,
        lambda1: l1,
        lambda2: l2.max(0.0),
    }
}
