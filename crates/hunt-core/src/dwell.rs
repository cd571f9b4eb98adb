/// Accumulates continuous gaze-on-target time and reports when it crosses
/// a threshold. Losing the gaze for even one tick resets the accumulator.
#[derive(Clone, Copy, Debug, Default)]
pub struct DwellTracker {
    elapsed: f32,
}

impl DwellTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tick. Returns true while the accumulated dwell exceeds
    /// `threshold`. Level-triggered: it keeps returning true on every
    /// gazed tick after the crossing, and the caller decides what counts
    /// as newly detected.
    pub fn update(&mut self, hit: bool, dt: f32, threshold: f32) -> bool {
        if !hit {
            self.elapsed = 0.0;
            return false;
        }
        self.elapsed += dt;
        self.elapsed > threshold
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
