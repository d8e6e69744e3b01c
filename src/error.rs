//! Error types at the host boundary.
//!
//! Nothing in the per-frame path is fatal: a `ReadbackError` only means the
//! previous luminance sample stays in use.

use thiserror::Error;

use crate::color::SurfaceFormat;

/// Why a downsampled frame could not be read back this frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadbackError {
    /// The source has no frame to render yet.
    #[error("frame source not ready")]
    NotReady,

    /// The source reports a zero width or height.
    #[error("frame source is zero-sized ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },

    /// The source cannot produce the requested surface format.
    #[error("surface format {format:?} not supported by this source")]
    UnsupportedFormat { format: SurfaceFormat },
}

/// Errors from loading or saving a settings document.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readback_error_display() {
        let err = ReadbackError::ZeroSized {
            width: 0,
            height: 720,
        };
        assert_eq!(err.to_string(), "frame source is zero-sized (0x720)");

        let err = ReadbackError::UnsupportedFormat {
            format: SurfaceFormat::Rgba16f,
        };
        assert!(err.to_string().contains("Rgba16f"));
    }

    #[test]
    fn test_settings_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(err.to_string().starts_with("invalid settings document"));
    }
}
