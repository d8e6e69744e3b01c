// Exposure controller: one evaluation per rendered frame.
//
// tick() -> accumulate elapsed time (any thread, via TickAccumulator)
// render() -> drain time -> sample luminance if due -> smooth -> fade step
//             -> publish readout -> upload uniforms
//
// All mutable state lives in one owned AdaptationState; nothing is shared
// except the two atomics in `shared`.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::adaptation::{Adaptation, FadeTiming, Lifecycle, StepInput, NOMINAL_FRAME_SECONDS};
use crate::color::{PixelEncoding, SurfaceFormat};
use crate::filter::TemporalFilter;
use crate::luminance::LuminanceSample;
use crate::settings::{EffectSettings, SettingsData};
use crate::shared::{BrightnessReadout, TickAccumulator};
use crate::source::FrameSource;
use crate::uniforms::{EffectUniforms, UniformSink};

/// Edge length of the square readback target.
pub const DEFAULT_DOWNSAMPLE_SIZE: u32 = 32;

/// Minimum time between luminance readbacks (20 Hz).
pub const LUMINANCE_SAMPLE_INTERVAL_SECONDS: f32 = 1.0 / 20.0;

/// Runtime state owned by one controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptationState {
    pub fade: Adaptation,
    pub filter: TemporalFilter,
    /// Most recent raw estimate; reused between samples and when readback fails.
    pub latest_luminance: f32,
    pub time_since_last_sample: f32,
}

impl Default for AdaptationState {
    fn default() -> Self {
        Self {
            fade: Adaptation::new(),
            filter: TemporalFilter::default(),
            latest_luminance: 1.0,
            time_since_last_sample: 0.0,
        }
    }
}

/// Outcome of one `render` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub lifecycle: Lifecycle,
    pub effect_strength: f32,
    pub smoothed_luminance: f32,
    /// Elapsed time consumed by this evaluation.
    pub delta_seconds: f32,
    /// Set when a fresh readback was measured this frame.
    pub sample: Option<LuminanceSample>,
    /// The brightness readout moved; the host should refresh its property view.
    pub readout_changed: bool,
}

/// Drives the correction effect for one filter instance.
///
/// # Examples
/// ```
/// use image::{DynamicImage, Rgba, RgbaImage};
/// use smartgamma::{ExposureController, ImageFrameSource, SettingsData};
///
/// let mut settings = SettingsData::with_defaults();
/// let mut controller = ExposureController::new(&mut settings);
/// let dark = RgbaImage::from_pixel(64, 64, Rgba([8, 8, 8, 255]));
/// let mut source = ImageFrameSource::new(DynamicImage::ImageRgba8(dark));
/// let mut uploads = Vec::new();
///
/// controller.tick(1.0 / 60.0);
/// let report = controller.render(&mut source, &mut uploads);
/// assert!(report.smoothed_luminance < 0.1);
/// assert_eq!(uploads.len(), 1);
/// ```
#[derive(Debug)]
pub struct ExposureController {
    settings: EffectSettings,
    timing: FadeTiming,
    state: AdaptationState,
    ticks: Arc<TickAccumulator>,
    readout: Arc<BrightnessReadout>,
    downsample_size: u32,
    /// Decoder used for the last successful readback.
    encoding: Option<PixelEncoding>,
    /// Last unsupported format warned about, to avoid per-frame warnings.
    unsupported_format: Option<SurfaceFormat>,
}

impl ExposureController {
    /// Create a controller from a host settings document (migrating it if needed).
    pub fn new(data: &mut SettingsData) -> Self {
        Self::with_settings(EffectSettings::from_data(data))
    }

    pub fn with_settings(settings: EffectSettings) -> Self {
        Self {
            settings,
            timing: settings.timing(),
            state: AdaptationState::default(),
            ticks: Arc::new(TickAccumulator::new()),
            readout: Arc::new(BrightnessReadout::new()),
            downsample_size: DEFAULT_DOWNSAMPLE_SIZE,
            encoding: None,
            unsupported_format: None,
        }
    }

    /// Override the readback resolution (clamped to at least 1).
    pub fn with_downsample_size(mut self, size: u32) -> Self {
        self.downsample_size = size.max(1);
        self
    }

    /// Accumulate elapsed time. Evaluation happens in `render`.
    pub fn tick(&self, seconds: f32) {
        self.ticks.add(seconds);
    }

    /// Handle for a tick signal delivered on another thread.
    pub fn tick_handle(&self) -> Arc<TickAccumulator> {
        Arc::clone(&self.ticks)
    }

    /// Handle for a UI reading the brightness figure on another thread.
    pub fn readout(&self) -> Arc<BrightnessReadout> {
        Arc::clone(&self.readout)
    }

    /// Brightness shown to the user, 0–100.
    pub fn brightness_percent(&self) -> f32 {
        self.readout.percent()
    }

    /// Replace the settings from a host document.
    ///
    /// The next render re-samples and reseeds the smoothing filter instead of
    /// continuing from a value measured under the old settings. Fade state is kept.
    pub fn update(&mut self, data: &mut SettingsData) {
        self.apply_settings(EffectSettings::from_data(data));
    }

    pub fn apply_settings(&mut self, settings: EffectSettings) {
        info!(
            threshold = settings.darkness_threshold,
            dwell_ms = settings.threshold_duration_ms,
            fade_in_ms = settings.fade_in_ms,
            fade_out_ms = settings.fade_out_ms,
            "exposure settings applied"
        );
        self.settings = settings;
        self.timing = settings.timing();
        self.state.filter.invalidate();
        self.state.time_since_last_sample = 0.0;
        let _ = self.ticks.drain();
    }

    /// Return to the freshly created state, keeping settings.
    pub fn reset(&mut self) {
        self.state = AdaptationState::default();
        let _ = self.ticks.drain();
        self.readout.reset();
        self.encoding = None;
        self.unsupported_format = None;
    }

    /// Run one evaluation and upload the resulting uniforms.
    pub fn render<S, U>(&mut self, source: &mut S, sink: &mut U) -> FrameReport
    where
        S: FrameSource + ?Sized,
        U: UniformSink + ?Sized,
    {
        let mut delta = self.ticks.drain();
        if delta <= 0.0 {
            delta = NOMINAL_FRAME_SECONDS;
        }
        self.state.time_since_last_sample += delta;

        let due = !self.state.filter.is_initialized()
            || self.state.time_since_last_sample >= LUMINANCE_SAMPLE_INTERVAL_SECONDS;
        let sample = if due {
            self.state.time_since_last_sample = 0.0;
            self.sample_luminance(source)
        } else {
            None
        };

        let readout_changed = self.evaluate(delta);
        sink.upload(&self.uniforms());

        FrameReport {
            lifecycle: self.state.fade.lifecycle,
            effect_strength: self.state.fade.effect_strength,
            smoothed_luminance: self.state.filter.value(),
            delta_seconds: delta,
            sample,
            readout_changed,
        }
    }

    /// Read back and measure the current frame. On failure the previous sample stays.
    fn sample_luminance<S>(&mut self, source: &mut S) -> Option<LuminanceSample>
    where
        S: FrameSource + ?Sized,
    {
        let format = source.color_space().preferred_format();
        let frame = match source.readback(self.downsample_size, format) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(%err, "luminance readback unavailable, keeping previous sample");
                return None;
            }
        };

        self.note_format(frame.format);
        let sample = LuminanceSample::measure(&frame);
        self.state.latest_luminance = sample.value;
        self.state.filter.seed(sample.value);
        trace!(luminance = sample.value, encoding = ?sample.encoding, "luminance sampled");
        Some(sample)
    }

    fn note_format(&mut self, format: SurfaceFormat) {
        match PixelEncoding::from_surface(format) {
            Some(encoding) => {
                if self.encoding != Some(encoding) {
                    debug!(?encoding, ?format, "luminance decoder selected");
                    self.encoding = Some(encoding);
                }
                self.unsupported_format = None;
            }
            None => {
                if self.unsupported_format != Some(format) {
                    warn!(?format, "unsupported readback format, decoding as RGBA8");
                    self.unsupported_format = Some(format);
                }
                self.encoding = Some(PixelEncoding::default());
            }
        }
    }

    /// Smooth, step the fade machine and publish the readout.
    fn evaluate(&mut self, delta: f32) -> bool {
        let smoothed = self.state.filter.update(self.state.latest_luminance);
        let before = self.state.fade.lifecycle;
        self.state.fade = self.state.fade.step(StepInput {
            delta_seconds: delta,
            smoothed_luminance: smoothed,
            timing: self.timing,
        });

        let after = self.state.fade.lifecycle;
        if before != after {
            debug!(
                from = ?before,
                to = ?after,
                strength = self.state.fade.effect_strength,
                luminance = smoothed,
                "exposure lifecycle transition"
            );
        }

        self.readout.publish(smoothed.clamp(0.0, 1.0) * 100.0)
    }

    /// Uniforms for the current state.
    pub fn uniforms(&self) -> EffectUniforms {
        EffectUniforms::new(self.state.fade.effect_strength, &self.settings)
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    pub fn state(&self) -> &AdaptationState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.fade.lifecycle
    }

    pub fn effect_strength(&self) -> f32 {
        self.state.fade.effect_strength
    }

    pub fn smoothed_luminance(&self) -> f32 {
        self.state.filter.value()
    }

    pub fn latest_luminance(&self) -> f32 {
        self.state.latest_luminance
    }

    pub fn downsample_size(&self) -> u32 {
        self.downsample_size
    }
}
