//! Per-pixel running-mean background.

use dartcam_core::{BoundingBox, FrameView};

/// Grayscale running mean of the static board.
///
/// Owned by exactly one tracker. Reseeded whenever the frame size changes.
#[derive(Clone, Debug, Default)]
pub struct BackgroundModel {
    width: usize,
    height: usize,
    mean: Vec<f32>,
}

impl BackgroundModel {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_seeded(&self) -> bool {
        !self.mean.is_empty()
    }

    /// Whether the model is seeded for frames of this size.
    #[inline]
    pub fn matches(&self, frame: &FrameView<'_>) -> bool {
        self.is_seeded() && self.width == frame.width() && self.height == frame.height()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Mean gray level per pixel, row-major.
    #[inline]
    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    /// Copy the frame's grayscale values into the model, resizing if needed.
    pub fn seed(&mut self, frame: &FrameView<'_>) {
        self.width = frame.width();
        self.height = frame.height();
        self.mean.clear();
        self.mean.extend((0..frame.len()).map(|i| frame.gray_at(i)));
    }

    /// Seed from precomputed gray values (same layout as the frame).
    pub(crate) fn seed_from_gray(&mut self, width: usize, height: usize, gray: &[f32]) {
        self.width = width;
        self.height = height;
        self.mean.clear();
        self.mean.extend_from_slice(gray);
    }

    /// Forget everything; the next frame reseeds.
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.mean.clear();
    }

    /// Blend every pixel: `mean += alpha * (gray - mean)`.
    pub(crate) fn blend_all(&mut self, gray: &[f32], alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        for (m, &g) in self.mean.iter_mut().zip(gray) {
            *m += alpha * (g - *m);
        }
    }

    /// Blend the frame into the model inside `bbox` only.
    pub fn blend_region(&mut self, frame: &FrameView<'_>, bbox: BoundingBox, alpha: f32) {
        if !self.matches(frame) {
            return;
        }
        let Some(b) = bbox.clamp_to(self.width, self.height) else {
            return;
        };
        let alpha = alpha.clamp(0.0, 1.0);
        for y in b.y..b.y + b.h {
            let row = y * self.width;
            for x in b.x..b.x + b.w {
                let i = row + x;
                let g = frame.gray_at(i);
                self.mean[i] += alpha * (g - self.mean[i]);
            }
        }
    }
}
