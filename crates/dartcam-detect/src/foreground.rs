//! Background differencing with an adaptive threshold.

use dartcam_core::Roi;
use serde::{Deserialize, Serialize};

/// Inputs of one differencing pass, all row-major `width * height`.
pub struct ForegroundInput<'a> {
    pub width: usize,
    pub height: usize,
    pub gray: &'a [f32],
    pub background: &'a [f32],
    /// Specular highlight flags; flagged pixels are never foreground.
    pub highlight: &'a [bool],
}

/// Statistics of the differencing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForegroundStats {
    /// Threshold actually applied: `max(floor, mean + k * std)`.
    pub threshold: f32,
    pub mean_diff: f32,
    pub std_diff: f32,
    /// In-ROI, non-highlight pixels that fed the statistics.
    pub samples: usize,
    /// Pixels set in the mask.
    pub foreground: usize,
}

/// Compute `|gray - background|` into `diff` and the binary mask into `mask`.
///
/// Mean and standard deviation of the diff are taken over in-ROI pixels that
/// are not highlights; the threshold never drops below `floor`.
pub fn extract_foreground(
    input: &ForegroundInput<'_>,
    roi: &Roi,
    floor: f32,
    sigma: f32,
    diff: &mut [f32],
    mask: &mut [u8],
) -> ForegroundStats {
    let w = input.width;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut samples = 0usize;

    for y in 0..input.height {
        for x in 0..w {
            let i = y * w + x;
            let d = (input.gray[i] - input.background[i]).abs();
            diff[i] = d;
            if !input.highlight[i] && roi.contains(x as f32, y as f32) {
                sum += d as f64;
                sum_sq += (d as f64) * (d as f64);
                samples += 1;
            }
        }
    }

    let (mean, std) = if samples > 0 {
        let n = samples as f64;
        let mean = sum / n;
        let var = (sum_sq / n - mean * mean).max(0.0);
        (mean as f32, var.sqrt() as f32)
    } else {
        (0.0, 0.0)
    };
    let threshold = floor.max(mean + sigma * std);

    let mut foreground = 0usize;
    for y in 0..input.height {
        for x in 0..w {
            let i = y * w + x;
            let on = diff[i] > threshold
                && !input.highlight[i]
                && roi.contains(x as f32, y as f32);
            mask[i] = on as u8;
            foreground += on as usize;
        }
    }

    ForegroundStats {
        threshold,
        mean_diff: mean,
        std_diff: std,
        samples,
        foreground,
    }
}
