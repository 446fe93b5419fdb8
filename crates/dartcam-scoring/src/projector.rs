//! Image point to dart value.

use dartcam_core::Homography;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::ring::{Dart, Ring};

/// Clockwise sector order starting at the top of the board.
pub const SECTOR_ORDER: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// Maps a detected tip in image pixels to a dart.
///
/// `None` means no calibration is available; callers discard the detection.
pub trait ScoringProjector {
    fn project(&self, tip: Point2<f32>) -> Option<Dart>;
}

impl<F> ScoringProjector for F
where
    F: Fn(Point2<f32>) -> Option<Dart>,
{
    fn project(&self, tip: Point2<f32>) -> Option<Dart> {
        self(tip)
    }
}

/// Ring radii of a standard steel-tip board, in millimetres from the center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    pub inner_bull: f32,
    pub outer_bull: f32,
    pub triple_inner: f32,
    pub triple_outer: f32,
    pub double_inner: f32,
    pub double_outer: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            inner_bull: 6.35,
            outer_bull: 15.9,
            triple_inner: 99.0,
            triple_outer: 107.0,
            double_inner: 162.0,
            double_outer: 170.0,
        }
    }
}

impl BoardGeometry {
    /// Classify a point on the board plane.
    ///
    /// Board coordinates are millimetres with the bull at the origin, `+x`
    /// to the right and `+y` down, so sector 20 sits on the negative y axis.
    pub fn classify(&self, p: Point2<f32>) -> Dart {
        let r = p.coords.norm();
        if !r.is_finite() || r > self.double_outer {
            return Dart::miss();
        }
        if r <= self.inner_bull {
            return Dart::inner_bull();
        }
        if r <= self.outer_bull {
            return Dart::bull();
        }
        let ring = if (self.triple_inner..=self.triple_outer).contains(&r) {
            Ring::Triple
        } else if r >= self.double_inner {
            Ring::Double
        } else {
            Ring::Single
        };
        let sector = sector_at(p);
        Dart::new(ring, Some(sector)).unwrap_or_else(|_| Dart::miss())
    }
}

/// Sector number under the direction of `p` from the board center.
pub fn sector_at(p: Point2<f32>) -> u8 {
    // Clockwise angle from "up", in degrees.
    let deg = p.x.atan2(-p.y).to_degrees().rem_euclid(360.0);
    let idx = (((deg + 9.0) / 18.0).floor() as usize) % SECTOR_ORDER.len();
    SECTOR_ORDER[idx]
}

/// Reference projector: image pixels to board millimetres through a
/// homography, then standard board geometry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardProjector {
    /// Image to board-plane transform. `None` until calibrated.
    pub homography: Option<Homography>,
    #[serde(default)]
    pub geometry: BoardGeometry,
}

impl BoardProjector {
    pub fn new(homography: Homography) -> Self {
        Self {
            homography: Some(homography),
            geometry: BoardGeometry::default(),
        }
    }

    pub fn uncalibrated() -> Self {
        Self::default()
    }

    pub fn with_geometry(mut self, geometry: BoardGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn set_homography(&mut self, homography: Option<Homography>) {
        self.homography = homography;
    }

    pub fn is_calibrated(&self) -> bool {
        self.homography.is_some()
    }

    /// Board-plane position of an image point.
    pub fn to_board(&self, tip: Point2<f32>) -> Option<Point2<f32>> {
        let p = self.homography.as_ref()?.apply(tip);
        (p.x.is_finite() && p.y.is_finite()).then_some(p)
    }
}

impl ScoringProjector for BoardProjector {
    fn project(&self, tip: Point2<f32>) -> Option<Dart> {
        self.to_board(tip).map(|p| self.geometry.classify(p))
    }
}
