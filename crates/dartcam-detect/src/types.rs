use dartcam_core::BoundingBox;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Shaft axis segment in pixel coordinates, `(x2, y2)` at the outward end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl AxisSegment {
    pub fn length(&self) -> f32 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }
}

/// A dart candidate that passed every gate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Sub-pixel tip position.
    pub tip: Point2<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisSegment>,
    pub area: usize,
    pub bbox: BoundingBox,
    /// Heuristic score in `[0, 1]`.
    pub confidence: f32,
}

/// Outcome of one [`crate::DartTracker::detect_with_status`] call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectStatus {
    /// The background was (re)seeded from this frame.
    Seeded,
    /// No foreground component.
    NoBlob,
    /// Largest component outside `[min_area, max_area]`.
    RejectedArea { area: usize },
    /// Shaft not aligned with the board radius.
    RejectedAngle { deg: f32 },
    /// Candidate found but not yet stable for enough frames.
    Unstable { streak: u32 },
    /// Suppressed by the post-accept cooldown.
    Cooldown,
    Detected(Detection),
}

impl DetectStatus {
    pub fn detection(&self) -> Option<&Detection> {
        match self {
            DetectStatus::Detected(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_detection(self) -> Option<Detection> {
        match self {
            DetectStatus::Detected(d) => Some(d),
            _ => None,
        }
    }

    /// Short stable label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            DetectStatus::Seeded => "seeded",
            DetectStatus::NoBlob => "no_blob",
            DetectStatus::RejectedArea { .. } => "rejected_area",
            DetectStatus::RejectedAngle { .. } => "rejected_angle",
            DetectStatus::Unstable { .. } => "unstable",
            DetectStatus::Cooldown => "cooldown",
            DetectStatus::Detected(_) => "detected",
        }
    }
}
