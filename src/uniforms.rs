// Scalar parameters handed to the color-transform shader each frame.

use crate::settings::EffectSettings;

/// Smallest gamma uploaded; keeps `pow(x, 1/gamma)` well-defined.
pub const MIN_GAMMA: f32 = 0.01;

/// The five shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectUniforms {
    pub effect_strength: f32,
    pub gamma: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl EffectUniforms {
    pub fn new(effect_strength: f32, settings: &EffectSettings) -> Self {
        Self {
            effect_strength: effect_strength.clamp(0.0, 1.0),
            gamma: settings.gamma.max(MIN_GAMMA),
            brightness: settings.brightness,
            contrast: settings.contrast,
            saturation: settings.saturation,
        }
    }
}

/// Receiver of per-frame uniforms (the host's shader parameter upload).
pub trait UniformSink {
    fn upload(&mut self, uniforms: &EffectUniforms);
}

/// Records every upload, in order.
impl UniformSink for Vec<EffectUniforms> {
    fn upload(&mut self, uniforms: &EffectUniforms) {
        self.push(*uniforms);
    }
}
