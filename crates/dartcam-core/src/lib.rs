//! Core types and utilities for dart detection.
//!
//! This crate is intentionally small. It knows about borrowed video frames,
//! pixel-space geometry, projective transforms and time, and nothing about
//! detection heuristics or darts rules.

mod clock;
mod geometry;
mod homography;
mod image;
mod logger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use geometry::{BoundingBox, Roi};
pub use homography::Homography;
pub use image::{luma, saturation, FrameError, FrameView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{current_frame, init_with_level, level_from_verbosity, set_frame};

pub use nalgebra::{Point2, Vector2};
