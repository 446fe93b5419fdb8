//! Per-camera dart tracker.

use dartcam_core::{Clock, FrameView, Roi, SystemClock};
use log::{debug, info};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::background::BackgroundModel;
use crate::blob::largest_component;
use crate::foreground::{extract_foreground, ForegroundInput, ForegroundStats};
use crate::morphology::close4;
use crate::orientation::principal_axis;
use crate::stabilizer::Stabilizer;
use crate::tip::{confidence, locate_tip};
use crate::types::{DetectStatus, Detection};
use crate::workspace::Workspace;
use crate::DetectorParams;

/// Centroids closer than this to the ROI center skip the radial check.
const MIN_RADIAL_PX: f32 = 1.0;

/// Background-differencing dart detector for one camera session.
///
/// Feed every frame to [`DartTracker::detect`]. The first frame (and any
/// frame with new dimensions) seeds the background. Once the caller has
/// scored a detection it calls [`DartTracker::accept`] so the dart becomes
/// part of the background and the next dart is isolated against it.
///
/// All time reads go through the injected [`Clock`].
#[derive(Debug)]
pub struct DartTracker<C: Clock = SystemClock> {
    params: DetectorParams,
    roi: Option<Roi>,
    background: BackgroundModel,
    workspace: Workspace,
    stabilizer: Stabilizer,
    last_accept_ms: Option<u64>,
    last_stats: ForegroundStats,
    clock: C,
}

impl DartTracker<SystemClock> {
    pub fn new(params: DetectorParams) -> Self {
        Self::with_clock(params, SystemClock::new())
    }
}

impl Default for DartTracker<SystemClock> {
    fn default() -> Self {
        Self::new(DetectorParams::default())
    }
}

impl<C: Clock> DartTracker<C> {
    pub fn with_clock(params: DetectorParams, clock: C) -> Self {
        Self {
            params,
            roi: None,
            background: BackgroundModel::new(),
            workspace: Workspace::default(),
            stabilizer: Stabilizer::new(),
            last_accept_ms: None,
            last_stats: ForegroundStats::default(),
            clock,
        }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn background(&self) -> &BackgroundModel {
        &self.background
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Explicit ROI, if one was set.
    pub fn roi(&self) -> Option<Roi> {
        self.roi
    }

    /// Statistics of the last differencing pass.
    pub fn last_stats(&self) -> &ForegroundStats {
        &self.last_stats
    }

    /// Restrict detection to a circle. A radius of 0 disables the restriction
    /// but keeps `(center_x, center_y)` as the board center.
    pub fn set_roi(&mut self, center_x: f32, center_y: f32, radius: f32) {
        self.roi = Some(Roi::new(center_x, center_y, radius));
    }

    /// Drop the background model; the next frame reseeds it.
    pub fn reset(&mut self) {
        self.background.clear();
        self.stabilizer.reset();
        self.last_accept_ms = None;
        debug!("tracker reset");
    }

    /// Run the pipeline on one frame and return a detection, if any.
    pub fn detect(&mut self, frame: &FrameView<'_>) -> Option<Detection> {
        self.detect_with_status(frame).into_detection()
    }

    /// Same as [`DartTracker::detect`] but reports why nothing was detected.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, frame),
            fields(width = frame.width(), height = frame.height())
        )
    )]
    pub fn detect_with_status(&mut self, frame: &FrameView<'_>) -> DetectStatus {
        let now = self.clock.now_ms();
        let params = &self.params;
        let ws = &mut self.workspace;
        ws.load(frame, params);
        let (w, h) = (ws.width, ws.height);

        if !self.background.matches(frame) {
            self.background.seed_from_gray(w, h, &ws.gray);
            self.stabilizer.reset();
            info!("background seeded at {w}x{h}");
            return DetectStatus::Seeded;
        }

        let roi = self.roi.unwrap_or_else(|| Roi::frame_center(w, h));
        let in_cooldown = self
            .last_accept_ms
            .is_some_and(|t| now.saturating_sub(t) < params.cooldown_ms);

        let input = ForegroundInput {
            width: w,
            height: h,
            gray: &ws.gray,
            background: self.background.mean(),
            highlight: &ws.highlight,
        };
        self.last_stats = extract_foreground(
            &input,
            &roi,
            params.threshold,
            params.threshold_sigma,
            &mut ws.diff,
            &mut ws.mask,
        );
        close4(&mut ws.mask, &mut ws.scratch, w, h);

        let blob = largest_component(
            &ws.mask,
            w,
            h,
            &mut ws.labels,
            &mut ws.queue,
            &mut ws.blob_pixels,
        );

        let Some(blob) = blob else {
            if !in_cooldown {
                self.background.blend_all(&ws.gray, params.background_alpha);
            }
            return DetectStatus::NoBlob;
        };

        if blob.area < params.min_area || blob.area > params.max_area {
            debug!(
                "candidate rejected: area {} outside [{}, {}]",
                blob.area, params.min_area, params.max_area
            );
            if !in_cooldown {
                self.background.blend_all(&ws.gray, params.background_alpha);
            }
            return DetectStatus::RejectedArea { area: blob.area };
        }

        let radial = roi.radial(blob.centroid);
        let axis = principal_axis(blob.pixels, w, blob.centroid).oriented(radial);
        if let Some(deg) = axis.angle_to_deg(radial, MIN_RADIAL_PX) {
            if deg > params.max_axis_angle_deg {
                debug!(
                    "candidate rejected: axis {deg:.1} deg off radial (max {})",
                    params.max_axis_angle_deg
                );
                if !in_cooldown {
                    self.background.blend_all(&ws.gray, params.background_alpha);
                }
                return DetectStatus::RejectedAngle { deg };
            }
        }

        let Some(est) = locate_tip(blob.pixels, w, blob.centroid, axis.direction) else {
            return DetectStatus::NoBlob;
        };

        if in_cooldown {
            debug!("candidate suppressed by cooldown");
            return DetectStatus::Cooldown;
        }

        let streak = self.stabilizer.observe(
            est.tip,
            blob.area,
            params.stable_px,
            params.stable_area_frac,
        );
        if streak < params.require_stable_n {
            debug!(
                "candidate unstable: streak {streak}/{}",
                params.require_stable_n
            );
            return DetectStatus::Unstable { streak };
        }

        let detection = Detection {
            tip: est.tip,
            axis: Some(est.axis),
            area: blob.area,
            bbox: blob.bbox,
            confidence: confidence(blob.fill_ratio(), est.tip, &roi, axis.elongation()),
        };
        info!(
            "dart detected at ({:.1}, {:.1}) area {} confidence {:.2}",
            detection.tip.x, detection.tip.y, detection.area, detection.confidence
        );
        DetectStatus::Detected(detection)
    }

    /// Commit a scored detection: absorb its bbox into the background, reset
    /// the stability streak and start the cooldown.
    pub fn accept(&mut self, frame: &FrameView<'_>, detection: &Detection) {
        self.background
            .blend_region(frame, detection.bbox, self.params.accept_alpha);
        self.stabilizer.reset();
        self.last_accept_ms = Some(self.clock.now_ms());
        debug!("detection accepted, bbox {:?}", detection.bbox);
    }
}
