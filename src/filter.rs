// Exponential smoothing of the raw luminance signal.

/// Smoothing factor applied once per evaluation (~1 s settle time at 60 fps).
pub const LUMINANCE_SMOOTHING: f32 = 0.18;

/// `previous + (sample - previous) * alpha`, with `alpha` clamped to [0, 1].
#[inline]
pub fn smooth(previous: f32, sample: f32, alpha: f32) -> f32 {
    previous + (sample - previous) * alpha.clamp(0.0, 1.0)
}

/// Smoothed luminance with first-sample seeding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalFilter {
    value: f32,
    initialized: bool,
    alpha: f32,
}

impl Default for TemporalFilter {
    fn default() -> Self {
        Self::new(LUMINANCE_SMOOTHING)
    }
}

impl TemporalFilter {
    /// Unseeded filter reading 1.0 (bright until measured).
    pub fn new(alpha: f32) -> Self {
        Self {
            value: 1.0,
            initialized: false,
            alpha,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Jump straight to `sample` if this is the first one since (re)initialization.
    pub fn seed(&mut self, sample: f32) {
        if !self.initialized {
            self.value = sample;
            self.initialized = true;
        }
    }

    /// Force the next `seed` to take effect, keeping the current value meanwhile.
    pub fn invalidate(&mut self) {
        self.initialized = false;
    }

    /// Advance one evaluation toward `sample`.
    pub fn update(&mut self, sample: f32) -> f32 {
        self.value = smooth(self.value, sample, self.alpha);
        self.value
    }
}
