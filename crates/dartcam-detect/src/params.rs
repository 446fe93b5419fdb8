use serde::{Deserialize, Serialize};

/// Configuration for [`crate::DartTracker`].
///
/// Every field has a default, so a JSON config only needs the overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Static floor of the foreground threshold (gray levels, 0..255).
    pub threshold: f32,
    /// Smallest accepted component area in pixels.
    pub min_area: usize,
    /// Largest accepted component area in pixels. Hands and arms exceed it.
    pub max_area: usize,
    /// Consecutive consistent candidates required before a detection fires.
    pub require_stable_n: u32,
    /// Suppression window after an accepted detection, in milliseconds.
    pub cooldown_ms: u64,
    /// Multiplier on the diff standard deviation in the dynamic threshold.
    pub threshold_sigma: f32,
    /// Minimum gray level of a specular highlight.
    pub highlight_luma: f32,
    /// Maximum HSV saturation of a specular highlight.
    pub highlight_max_saturation: f32,
    /// Maximum angle between shaft axis and board radius (degrees).
    pub max_axis_angle_deg: f32,
    /// Maximum tip displacement between stable candidates (pixels).
    pub stable_px: f32,
    /// Maximum relative area change between stable candidates.
    pub stable_area_frac: f32,
    /// Background learning rate when nothing is detected.
    pub background_alpha: f32,
    /// Background learning rate inside an accepted detection's bbox.
    pub accept_alpha: f32,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            threshold: 28.0,
            min_area: 90,
            max_area: 6000,
            require_stable_n: 1,
            cooldown_ms: 600,
            threshold_sigma: 1.2,
            highlight_luma: 240.0,
            highlight_max_saturation: 0.12,
            max_axis_angle_deg: 55.0,
            stable_px: 6.0,
            stable_area_frac: 0.3,
            background_alpha: 0.02,
            accept_alpha: 0.85,
        }
    }
}

impl DetectorParams {
    /// Stricter preset: two consistent frames before a dart is reported.
    pub fn strict() -> Self {
        Self {
            require_stable_n: 2,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let p: DetectorParams =
            serde_json::from_str(r#"{ "min_area": 40, "require_stable_n": 3 }"#).unwrap();
        assert_eq!(p.min_area, 40);
        assert_eq!(p.require_stable_n, 3);
        assert_eq!(p.max_area, 6000);
        assert_eq!(p.cooldown_ms, 600);
        assert_eq!(p.threshold, 28.0);
    }
}
