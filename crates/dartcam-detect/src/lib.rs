//! Dart tip detection from a fixed camera.
//!
//! The detector keeps a running-mean background of the empty (or already
//! scored) board and isolates each newly arrived dart against it:
//!
//! 1. grayscale conversion with specular highlight masking,
//! 2. adaptive-threshold differencing inside a circular ROI,
//! 3. 4-neighbourhood closing,
//! 4. largest 4-connected component with an area gate,
//! 5. principal-axis estimation and a radial alignment check,
//! 6. sub-pixel tip at the outward end of the shaft,
//! 7. multi-frame stabilization and a post-accept cooldown.
//!
//! ```
//! use dartcam_core::FrameView;
//! use dartcam_detect::{DartTracker, DetectorParams};
//!
//! let data = vec![128u8; 64 * 48 * 4];
//! let frame = FrameView::rgba(64, 48, &data).unwrap();
//! let mut tracker = DartTracker::new(DetectorParams::default());
//! tracker.set_roi(32.0, 24.0, 20.0);
//! assert!(tracker.detect(&frame).is_none()); // seeds the background
//! assert!(tracker.detect(&frame).is_none()); // static scene
//! ```

mod background;
mod blob;
mod foreground;
mod morphology;
mod orientation;
mod params;
mod stabilizer;
mod tip;
mod tracker;
mod types;
mod workspace;

pub use background::BackgroundModel;
pub use blob::{largest_component, Blob};
pub use foreground::{extract_foreground, ForegroundInput, ForegroundStats};
pub use morphology::{close4, dilate4, erode4};
pub use orientation::{principal_axis, symmetric_eigen2, PrincipalAxis};
pub use params::DetectorParams;
pub use stabilizer::Stabilizer;
pub use tip::{confidence, locate_tip, TipEstimate};
pub use tracker::DartTracker;
pub use types::{AxisSegment, DetectStatus, Detection};
