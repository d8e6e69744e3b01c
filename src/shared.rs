// Values crossing threads: the elapsed-time accumulator and the UI brightness readout.
//
// Both store an f32 bit pattern in an AtomicU32. The accumulator must never
// lose or double-count time, so `add` is a CAS loop and `drain` a swap.
// The readout tolerates staleness and uses relaxed ordering.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Elapsed time reported by the host's tick signal, drained once per render.
#[derive(Debug, Default)]
pub struct TickAccumulator {
    bits: AtomicU32,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `seconds`. Non-finite or negative values are ignored.
    pub fn add(&self, seconds: f32) {
        if !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f32::from_bits(bits) + seconds).to_bits())
            });
    }

    /// Take everything accumulated so far and reset to zero.
    pub fn drain(&self) -> f32 {
        f32::from_bits(self.bits.swap(0, Ordering::AcqRel))
    }

    pub fn pending(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Minimum change (percentage points) before the readout republishes.
pub const READOUT_REFRESH_STEP: f32 = 0.5;

/// Brightness percentage shown in the host's property view.
#[derive(Debug)]
pub struct BrightnessReadout {
    percent_bits: AtomicU32,
    published: AtomicBool,
}

impl Default for BrightnessReadout {
    fn default() -> Self {
        Self {
            percent_bits: AtomicU32::new(100.0f32.to_bits()),
            published: AtomicBool::new(false),
        }
    }
}

impl BrightnessReadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last published brightness, 0–100.
    pub fn percent(&self) -> f32 {
        f32::from_bits(self.percent_bits.load(Ordering::Relaxed))
    }

    /// Publish `percent` if nothing was published yet or it moved by at least
    /// `READOUT_REFRESH_STEP`. Returns whether the value changed.
    ///
    /// Single writer: only the render path calls this.
    pub fn publish(&self, percent: f32) -> bool {
        let first = !self.published.load(Ordering::Relaxed);
        if !first && (percent - self.percent()).abs() < READOUT_REFRESH_STEP {
            return false;
        }
        self.percent_bits.store(percent.to_bits(), Ordering::Relaxed);
        self.published.store(true, Ordering::Relaxed);
        true
    }

    pub(crate) fn reset(&self) {
        self.percent_bits.store(100.0f32.to_bits(), Ordering::Relaxed);
        self.published.store(false, Ordering::Relaxed);
    }
}
