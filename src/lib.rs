//! # smartgamma
//!
//! Adaptive exposure correction for streamed video.
//!
//! Every rendered frame the controller estimates the mean luminance of a tiny
//! downsampled copy of the source, smooths it, and runs a hysteresis state
//! machine that fades a gamma / brightness / contrast / saturation grade in
//! while the scene stays dark and back out once it recovers. Readback and the
//! shader itself belong to the host; they are reached through the
//! [`FrameSource`] and [`UniformSink`] traits.
//!
//! ## Rust usage
//!
//! ```
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use smartgamma::{ExposureController, ImageFrameSource, Lifecycle, SettingsData};
//!
//! let mut settings = SettingsData::with_defaults();
//! settings.set_double("activation_delay_ms", 0.0);
//! let mut controller = ExposureController::new(&mut settings);
//!
//! let night = RgbaImage::from_pixel(320, 180, Rgba([12, 12, 20, 255]));
//! let mut source = ImageFrameSource::new(DynamicImage::ImageRgba8(night));
//! let mut uploads = Vec::new();
//!
//! for _ in 0..30 {
//!     controller.tick(1.0 / 60.0);
//!     controller.render(&mut source, &mut uploads);
//! }
//! assert_eq!(controller.lifecycle(), Lifecycle::Active);
//! assert_eq!(uploads.last().unwrap().effect_strength, 1.0);
//! ```

pub mod adaptation;
pub mod color;
pub mod controller;
pub mod error;
pub mod filter;
pub mod luminance;
pub mod schema;
pub mod settings;
pub mod shared;
pub mod source;
pub mod uniforms;

pub use adaptation::{Adaptation, FadeTiming, Lifecycle, StepInput};
pub use color::{ColorSpace, PixelEncoding, SurfaceFormat};
pub use controller::{AdaptationState, ExposureController, FrameReport};
pub use error::{ReadbackError, SettingsError};
pub use filter::{smooth, TemporalFilter};
pub use luminance::{estimate, LuminanceSample};
pub use schema::{Parameter, ParameterDescriptor, PARAMETER_DESCRIPTORS};
pub use settings::{EffectSettings, SettingValue, SettingsData};
pub use shared::{BrightnessReadout, TickAccumulator};
pub use source::{FrameBuffer, FrameSource, ImageFrameSource};
pub use uniforms::{EffectUniforms, UniformSink};
