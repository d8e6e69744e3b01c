// Configuration boundary: host settings document -> EffectSettings.
//
// SettingsData mirrors the host's key/value settings object (explicit values
// plus registered defaults). EffectSettings is the typed snapshot the
// controller owns; it is rebuilt wholesale on every configuration update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::adaptation::FadeTiming;
use crate::error::SettingsError;
use crate::schema::{Parameter, DARKNESS_THRESHOLD_PERCENT_KEY, PARAMETER_DESCRIPTORS};

/// A single stored setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
}

/// Host-side settings document.
///
/// Only explicit values are serialized; defaults are registered at runtime
/// and consulted when a key has no explicit value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsData {
    values: BTreeMap<String, SettingValue>,
    #[serde(skip)]
    defaults: BTreeMap<String, SettingValue>,
}

impl SettingsData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty document with every descriptor default registered.
    pub fn with_defaults() -> Self {
        let mut data = Self::new();
        data.register_defaults();
        data
    }

    /// Register the descriptor defaults without touching explicit values.
    pub fn register_defaults(&mut self) {
        for descriptor in &PARAMETER_DESCRIPTORS {
            self.set_default_double(descriptor.key, descriptor.default_value);
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn set_double(&mut self, key: &str, value: f64) {
        self.values
            .insert(key.to_string(), SettingValue::Number(value));
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), SettingValue::Bool(value));
    }

    pub fn set_default_double(&mut self, key: &str, value: f64) {
        self.defaults
            .insert(key.to_string(), SettingValue::Number(value));
    }

    pub fn set_default_bool(&mut self, key: &str, value: bool) {
        self.defaults
            .insert(key.to_string(), SettingValue::Bool(value));
    }

    /// Explicit value only, ignoring registered defaults.
    pub fn user_value(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    fn lookup(&self, key: &str) -> Option<SettingValue> {
        self.values
            .get(key)
            .or_else(|| self.defaults.get(key))
            .copied()
    }

    /// Numeric value (explicit, else default, else 0.0). Booleans read as 0/1.
    pub fn get_double(&self, key: &str) -> f64 {
        match self.lookup(key) {
            Some(SettingValue::Number(v)) => v,
            Some(SettingValue::Bool(b)) => f64::from(u8::from(b)),
            None => 0.0,
        }
    }

    /// Boolean value (explicit, else default, else false). Numbers read as `!= 0`.
    pub fn get_bool(&self, key: &str) -> bool {
        match self.lookup(key) {
            Some(SettingValue::Bool(b)) => b,
            Some(SettingValue::Number(v)) => v != 0.0,
            None => false,
        }
    }

    /// Clamp every explicit descriptor value into its `[min, max]` range.
    ///
    /// This is the host boundary's job; the controller never clamps.
    pub fn clamp_to_schema(&mut self) {
        for descriptor in &PARAMETER_DESCRIPTORS {
            if let Some(SettingValue::Number(v)) = self.values.get_mut(descriptor.key) {
                *v = descriptor.clamp(*v);
            }
        }
    }
}

/// Current values of the eight controls.
///
/// `darkness_threshold` is normalized to [0, 1] regardless of how the
/// settings document stores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    pub darkness_threshold: f32,
    pub threshold_duration_ms: f32,
    pub fade_in_ms: f32,
    pub fade_out_ms: f32,
    pub gamma: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            darkness_threshold: Parameter::DarknessThreshold.default_value() as f32 / 100.0,
            threshold_duration_ms: Parameter::ThresholdDurationMs.default_value() as f32,
            fade_in_ms: Parameter::FadeInMs.default_value() as f32,
            fade_out_ms: Parameter::FadeOutMs.default_value() as f32,
            gamma: Parameter::Gamma.default_value() as f32,
            brightness: Parameter::Brightness.default_value() as f32,
            contrast: Parameter::Contrast.default_value() as f32,
            saturation: Parameter::Saturation.default_value() as f32,
        }
    }
}

impl EffectSettings {
    /// Build settings from a host document, migrating a legacy fractional
    /// darkness threshold to the percentage convention in place.
    pub fn from_data(data: &mut SettingsData) -> Self {
        let mut settings = Self::default();
        for parameter in Parameter::ALL {
            let value = data.get_double(parameter.key());
            match parameter {
                Parameter::DarknessThreshold => {
                    settings.darkness_threshold = migrate_darkness_threshold(data, value);
                }
                Parameter::ThresholdDurationMs => settings.threshold_duration_ms = value as f32,
                Parameter::FadeInMs => settings.fade_in_ms = value as f32,
                Parameter::FadeOutMs => settings.fade_out_ms = value as f32,
                Parameter::Gamma => settings.gamma = value as f32,
                Parameter::Brightness => settings.brightness = value as f32,
                Parameter::Contrast => settings.contrast = value as f32,
                Parameter::Saturation => settings.saturation = value as f32,
            }
        }
        settings
    }

    /// Threshold and durations in the units the state machine consumes.
    pub fn timing(&self) -> FadeTiming {
        FadeTiming::new(
            self.darkness_threshold,
            self.threshold_duration_ms,
            self.fade_in_ms,
            self.fade_out_ms,
        )
    }
}

/// Normalize the stored threshold and record that the document now holds 0–100.
///
/// Only an explicit flag counts: a legacy document never wrote one.
fn migrate_darkness_threshold(data: &mut SettingsData, stored: f64) -> f32 {
    let key = Parameter::DarknessThreshold.key();
    let stored = stored as f32;
    let stored_as_percent = matches!(
        data.user_value(DARKNESS_THRESHOLD_PERCENT_KEY),
        Some(SettingValue::Bool(true))
    );

    if stored_as_percent || stored > 1.0 {
        data.set_bool(DARKNESS_THRESHOLD_PERCENT_KEY, true);
        return stored / 100.0;
    }

    let normalized = stored.clamp(0.0, 1.0);
    warn!(
        stored,
        migrated = normalized * 100.0,
        "darkness threshold stored as a fraction; rewriting as percentage"
    );
    data.set_double(key, f64::from(normalized * 100.0));
    data.set_bool(DARKNESS_THRESHOLD_PERCENT_KEY, true);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_defaults_from_empty_document() {
        let mut data = SettingsData::with_defaults();
        let settings = EffectSettings::from_data(&mut data);
        assert!(approx(settings.darkness_threshold, 0.35));
        assert_eq!(settings.threshold_duration_ms, 600.0);
        assert_eq!(settings.fade_in_ms, 200.0);
        assert_eq!(settings.fade_out_ms, 450.0);
        assert!(approx(settings.gamma, 1.2));
        assert!(data.get_bool(DARKNESS_THRESHOLD_PERCENT_KEY));
    }

    #[test]
    fn test_legacy_fraction_is_migrated_once() {
        let mut data = SettingsData::with_defaults();
        data.set_double("darkness_threshold", 0.35);

        let settings = EffectSettings::from_data(&mut data);
        assert!(approx(settings.darkness_threshold, 0.35));
        assert!((data.get_double("darkness_threshold") - 35.0).abs() < 1e-4);
        assert_eq!(
            data.user_value(DARKNESS_THRESHOLD_PERCENT_KEY),
            Some(SettingValue::Bool(true))
        );

        // Second pass reads the rewritten percentage without rescaling.
        let again = EffectSettings::from_data(&mut data);
        assert!(approx(again.darkness_threshold, 0.35));
        assert!((data.get_double("darkness_threshold") - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_registered_flag_default_does_not_rescale_legacy_fraction() {
        let mut data = SettingsData::with_defaults();
        data.set_default_bool(DARKNESS_THRESHOLD_PERCENT_KEY, true);
        data.set_double("darkness_threshold", 0.35);
        assert!(data.get_bool(DARKNESS_THRESHOLD_PERCENT_KEY));

        let settings = EffectSettings::from_data(&mut data);
        assert!(approx(settings.darkness_threshold, 0.35));
        assert!((data.get_double("darkness_threshold") - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_percentage_value_without_flag() {
        let mut data = SettingsData::with_defaults();
        data.set_double("darkness_threshold", 35.0);
        let settings = EffectSettings::from_data(&mut data);
        assert!(approx(settings.darkness_threshold, 0.35));
        assert_eq!(data.get_double("darkness_threshold"), 35.0);
    }

    #[test]
    fn test_flag_forces_percentage_for_small_values() {
        let mut data = SettingsData::with_defaults();
        data.set_double("darkness_threshold", 0.5);
        data.set_bool(DARKNESS_THRESHOLD_PERCENT_KEY, true);
        let settings = EffectSettings::from_data(&mut data);
        assert!(approx(settings.darkness_threshold, 0.005));
        assert_eq!(data.get_double("darkness_threshold"), 0.5);
    }

    #[test]
    fn test_json_round_trip_keeps_explicit_values_only() {
        let mut data = SettingsData::with_defaults();
        data.set_double("gamma", 1.8);
        data.set_bool(DARKNESS_THRESHOLD_PERCENT_KEY, true);

        let json = data.to_json().unwrap();
        assert!(json.contains("\"gamma\": 1.8"));
        assert!(!json.contains("fade_in_ms"));

        let mut loaded = SettingsData::from_json(&json).unwrap();
        assert_eq!(loaded.get_double("gamma"), 1.8);
        assert!(loaded.get_bool(DARKNESS_THRESHOLD_PERCENT_KEY));
        assert_eq!(loaded.get_double("fade_in_ms"), 0.0);
        loaded.register_defaults();
        assert_eq!(loaded.get_double("fade_in_ms"), 200.0);
    }

    #[test]
    fn test_clamp_to_schema() {
        let mut data = SettingsData::new();
        data.set_double("gamma", 10.0);
        data.set_double("brightness", -3.0);
        data.set_double("fade_in_ms", 250.0);
        data.clamp_to_schema();
        assert_eq!(data.get_double("gamma"), 3.0);
        assert_eq!(data.get_double("brightness"), -0.5);
        assert_eq!(data.get_double("fade_in_ms"), 250.0);
    }

    #[test]
    fn test_timing_converts_units() {
        let settings = EffectSettings {
            fade_in_ms: 0.0,
            ..EffectSettings::default()
        };
        let timing = settings.timing();
        assert!(approx(timing.dwell_seconds, 0.6));
        assert!(approx(timing.fade_out_seconds, 0.45));
        assert!(timing.fade_in_seconds > 0.0);
    }
}
