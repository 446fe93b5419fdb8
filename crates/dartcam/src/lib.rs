//! Facade crate for the `dartcam-*` workspace.
//!
//! This crate provides:
//! - re-exports of the detection and scoring crates
//! - [`DartPipeline`], which turns camera frames into applied darts
//! - JSON session configs and reports ([`session`])
//! - (feature `image`) frame loading and offline runs over image files
//!
//! ## Quickstart
//!
//! ```no_run
//! use dartcam::{image_io, session::SessionConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::load_json("session.json")?;
//! let frames = image_io::list_frames("frames/")?;
//! let report = image_io::run_frames(&config, &frames)?;
//! println!("{} darts scored", report.applied_darts());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `dartcam::core`: frames, clocks, ROI and homographies.
//! - `dartcam::detect`: the background-differencing [`DartTracker`].
//! - `dartcam::scoring`: darts, the X01 [`LegStateMachine`], stats and the event queue.
//! - `dartcam::pipeline`: detection to scoring for one camera.
//! - `dartcam::image_io` (feature `image`): PNG/JPEG frames.

pub use dartcam_core as core;
pub use dartcam_detect as detect;
pub use dartcam_scoring as scoring;

pub use dartcam_core::{FrameView, Homography, Roi};
pub use dartcam_detect::{DartTracker, DetectStatus, Detection, DetectorParams};
pub use dartcam_scoring::{
    BoardProjector, Dart, DartOutcome, LegStateMachine, Ring, ScoringError, ScoringProjector,
    X01Rules,
};

pub mod pipeline;
pub mod session;

#[cfg(feature = "image")]
pub mod image_io;

pub use pipeline::{DartPipeline, PipelineEvent};
pub use session::{SessionConfig, SessionError, SessionReport};
