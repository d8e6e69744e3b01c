// Parameter schema: the eight tunable controls of the exposure filter.
//
// The table is process-wide constant data. Index order matches `Parameter`,
// so `descriptor()` is a plain array lookup.

/// Tunable controls, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    DarknessThreshold,
    ThresholdDurationMs,
    FadeInMs,
    FadeOutMs,
    Gamma,
    Brightness,
    Contrast,
    Saturation,
}

impl Parameter {
    /// All parameters in table order.
    pub const ALL: [Parameter; 8] = [
        Parameter::DarknessThreshold,
        Parameter::ThresholdDurationMs,
        Parameter::FadeInMs,
        Parameter::FadeOutMs,
        Parameter::Gamma,
        Parameter::Brightness,
        Parameter::Contrast,
        Parameter::Saturation,
    ];

    pub fn descriptor(self) -> &'static ParameterDescriptor {
        &PARAMETER_DESCRIPTORS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.descriptor().key
    }

    pub fn default_value(self) -> f64 {
        self.descriptor().default_value
    }

    /// Look up a parameter by its settings key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Static description of one control: settings key, localization tokens and value domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    pub key: &'static str,
    pub label_token: &'static str,
    pub description_token: &'static str,
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
    pub default_value: f64,
}

impl ParameterDescriptor {
    /// Clamp a raw value into `[min_value, max_value]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min_value, self.max_value)
    }
}

/// Settings key of the flag recording that the darkness threshold is stored as 0–100.
pub const DARKNESS_THRESHOLD_PERCENT_KEY: &str = "darkness_threshold_is_percent";

pub static PARAMETER_DESCRIPTORS: [ParameterDescriptor; 8] = [
    ParameterDescriptor {
        key: "darkness_threshold",
        label_token: "SmartGamma.Param.DarknessThreshold",
        description_token: "SmartGamma.Param.DarknessThreshold.Description",
        min_value: 0.0,
        max_value: 100.0,
        step: 1.0,
        default_value: 35.0,
    },
    ParameterDescriptor {
        key: "activation_delay_ms",
        label_token: "SmartGamma.Param.ThresholdDuration",
        description_token: "SmartGamma.Param.ThresholdDuration.Description",
        min_value: 0.0,
        max_value: 20000.0,
        step: 10.0,
        default_value: 600.0,
    },
    ParameterDescriptor {
        key: "fade_in_ms",
        label_token: "SmartGamma.Param.FadeIn",
        description_token: "SmartGamma.Param.FadeIn.Description",
        min_value: 0.0,
        max_value: 20000.0,
        step: 10.0,
        default_value: 200.0,
    },
    ParameterDescriptor {
        key: "fade_out_ms",
        label_token: "SmartGamma.Param.FadeOut",
        description_token: "SmartGamma.Param.FadeOut.Description",
        min_value: 0.0,
        max_value: 20000.0,
        step: 10.0,
        default_value: 450.0,
    },
    ParameterDescriptor {
        key: "gamma",
        label_token: "SmartGamma.Param.Gamma",
        description_token: "SmartGamma.Param.Gamma.Description",
        min_value: 0.5,
        max_value: 3.0,
        step: 0.01,
        default_value: 1.20,
    },
    ParameterDescriptor {
        key: "brightness",
        label_token: "SmartGamma.Param.Brightness",
        description_token: "SmartGamma.Param.Brightness.Description",
        min_value: -0.5,
        max_value: 0.5,
        step: 0.01,
        default_value: 0.10,
    },
    ParameterDescriptor {
        key: "contrast",
        label_token: "SmartGamma.Param.Contrast",
        description_token: "SmartGamma.Param.Contrast.Description",
        min_value: 0.5,
        max_value: 2.0,
        step: 0.01,
        default_value: 1.10,
    },
    ParameterDescriptor {
        key: "saturation",
        label_token: "SmartGamma.Param.Saturation",
        description_token: "SmartGamma.Param.Saturation.Description",
        min_value: 0.0,
        max_value: 2.5,
        step: 0.01,
        default_value: 1.00,
    },
];
