// FrameSource over a still image, via the `image` crate.
//
// The image is resized to the requested square and encoded into the requested
// surface format with a padded row pitch, the way a GPU staging surface comes
// back. Useful for offline analysis and for driving the controller in tests.

use std::path::Path;

use anyhow::{Context, Result};
use half::f16;
use image::imageops::{self, FilterType};
use image::DynamicImage;

use super::{FrameBuffer, FrameSource};
use crate::color::{ColorSpace, PixelEncoding, SurfaceFormat};
use crate::error::ReadbackError;

/// Row pitch alignment of readback buffers (bytes).
pub const ROW_PITCH_ALIGNMENT: usize = 256;

/// Frame source serving one still image (or nothing, until one is set).
#[derive(Debug, Clone, Default)]
pub struct ImageFrameSource {
    image: Option<DynamicImage>,
}

impl ImageFrameSource {
    pub fn new(image: DynamicImage) -> Self {
        Self { image: Some(image) }
    }

    /// Source with no frame; every readback reports `NotReady`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load an image file (any format the `image` crate decodes).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to open image {}", path.display()))?;
        Ok(Self::new(image))
    }

    /// Replace the served frame (e.g. a scene change).
    pub fn set_image(&mut self, image: DynamicImage) {
        self.image = Some(image);
    }

    pub fn clear(&mut self) {
        self.image = None;
    }
}

fn is_float_image(image: &DynamicImage) -> bool {
    matches!(
        image,
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)
    )
}

impl FrameSource for ImageFrameSource {
    fn color_space(&self) -> ColorSpace {
        match &self.image {
            Some(image) if is_float_image(image) => ColorSpace::Srgb16f,
            _ => ColorSpace::Srgb,
        }
    }

    fn readback(&mut self, size: u32, format: SurfaceFormat) -> Result<FrameBuffer, ReadbackError> {
        let image = self.image.as_ref().ok_or(ReadbackError::NotReady)?;
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(ReadbackError::ZeroSized { width, height });
        }
        if size == 0 {
            return Err(ReadbackError::ZeroSized {
                width: size,
                height: size,
            });
        }
        let encoding =
            PixelEncoding::from_surface(format).ok_or(ReadbackError::UnsupportedFormat { format })?;

        let small = imageops::resize(&image.to_rgba32f(), size, size, FilterType::Triangle);

        let bpp = encoding.bytes_per_pixel();
        let row_bytes = size as usize * bpp;
        let row_stride = row_bytes.next_multiple_of(ROW_PITCH_ALIGNMENT);
        let mut data = vec![0u8; row_stride * size as usize];

        for (row, dst) in small.rows().zip(data.chunks_exact_mut(row_stride)) {
            for (pixel, out) in row.zip(dst[..row_bytes].chunks_exact_mut(bpp)) {
                encode_pixel(pixel.0, encoding, out);
            }
        }

        Ok(FrameBuffer {
            data,
            width: size,
            height: size,
            row_stride,
            format,
        })
    }
}

/// Write one RGBA float pixel into `out` (exactly `bytes_per_pixel` bytes).
fn encode_pixel(rgba: [f32; 4], encoding: PixelEncoding, out: &mut [u8]) {
    let unorm = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    match encoding {
        PixelEncoding::RgbaUnorm8 => {
            out.copy_from_slice(&rgba.map(unorm));
        }
        PixelEncoding::BgraUnorm8 => {
            let [r, g, b, a] = rgba.map(unorm);
            out.copy_from_slice(&[b, g, r, a]);
        }
        PixelEncoding::RgbaFloat16 => {
            for (channel, dst) in rgba.iter().zip(out.chunks_exact_mut(2)) {
                dst.copy_from_slice(&f16::from_f32(*channel).to_bits().to_ne_bytes());
            }
        }
    }
}
