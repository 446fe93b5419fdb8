use nalgebra::Point2;

/// Multi-frame consistency gate for dart candidates.
///
/// A candidate extends the streak when its tip is within `max_px` of the
/// previous candidate and its area changed by at most `max_area_frac`;
/// otherwise it becomes the new baseline with streak 1.
#[derive(Clone, Debug, Default)]
pub struct Stabilizer {
    last_tip: Option<Point2<f32>>,
    last_area: usize,
    streak: u32,
}

impl Stabilizer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Feed one candidate and return the updated streak.
    pub fn observe(
        &mut self,
        tip: Point2<f32>,
        area: usize,
        max_px: f32,
        max_area_frac: f32,
    ) -> u32 {
        let consistent = self.last_tip.is_some_and(|prev| {
            let moved = (tip - prev).norm();
            let base = self.last_area.max(1) as f32;
            let area_change = (area as f32 - self.last_area as f32).abs() / base;
            moved <= max_px && area_change <= max_area_frac
        });

        self.streak = if consistent {
            self.streak.saturating_add(1)
        } else {
            1
        };
        self.last_tip = Some(tip);
        self.last_area = area;
        self.streak
    }

    /// Forget the baseline; the next candidate starts a new streak.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
