// Pixel formats at the readback boundary.
//
// SurfaceFormat is what the host hands back; PixelEncoding is the closed set
// the estimator knows how to decode. Anything else decodes as RGBA8.

/// Color space reported by the host for the current source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Srgb,
    /// sRGB primaries with half-float storage.
    Srgb16f,
    /// Linear Rec.709 with values above 1.0 (scRGB-style HDR).
    Rec709Extended,
}

impl ColorSpace {
    /// Surface format to request from the downsample pass for this color space.
    pub fn preferred_format(self) -> SurfaceFormat {
        match self {
            ColorSpace::Srgb => SurfaceFormat::Rgba,
            ColorSpace::Srgb16f | ColorSpace::Rec709Extended => SurfaceFormat::Rgba16f,
        }
    }
}

/// Surface formats a host may return from readback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    Rgba,
    RgbaUnorm,
    Bgra,
    Bgrx,
    BgraUnorm,
    BgrxUnorm,
    Rgba16f,
    /// 10-bit packed formats; no dedicated decoder.
    R10G10B10A2,
    Rgba32f,
}

/// Decodable pixel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelEncoding {
    #[default]
    RgbaUnorm8,
    BgraUnorm8,
    RgbaFloat16,
}

impl PixelEncoding {
    /// Exact mapping, `None` for formats without a decoder.
    pub fn from_surface(format: SurfaceFormat) -> Option<Self> {
        match format {
            SurfaceFormat::Rgba | SurfaceFormat::RgbaUnorm => Some(Self::RgbaUnorm8),
            SurfaceFormat::Bgra
            | SurfaceFormat::Bgrx
            | SurfaceFormat::BgraUnorm
            | SurfaceFormat::BgrxUnorm => Some(Self::BgraUnorm8),
            SurfaceFormat::Rgba16f => Some(Self::RgbaFloat16),
            SurfaceFormat::R10G10B10A2 | SurfaceFormat::Rgba32f => None,
        }
    }

    /// Like `from_surface`, falling back to RGBA8 for unsupported formats.
    pub fn resolve(format: SurfaceFormat) -> Self {
        Self::from_surface(format).unwrap_or_default()
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelEncoding::RgbaUnorm8 | PixelEncoding::BgraUnorm8 => 4,
            PixelEncoding::RgbaFloat16 => 8,
        }
    }

    pub fn is_hdr(self) -> bool {
        matches!(self, PixelEncoding::RgbaFloat16)
    }
}

/// ITU-R BT.709 luma weights (R, G, B).
pub const BT709_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Relative luminance of a normalized linear RGB triple.
#[inline]
pub fn bt709_luma(r: f32, g: f32, b: f32) -> f64 {
    BT709_WEIGHTS[0] * f64::from(r)
        + BT709_WEIGHTS[1] * f64::from(g)
        + BT709_WEIGHTS[2] * f64::from(b)
}
