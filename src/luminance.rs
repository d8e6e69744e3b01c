// Mean-luminance estimation over a small readback buffer.
//
// Cost is bounded by the downsample size, not the source resolution.
// Decoding dispatches on PixelEncoding; rows honor the readback pitch.

use half::f16;

use crate::color::{bt709_luma, PixelEncoding};
use crate::source::FrameBuffer;

const LDR_SCALE: f32 = 1.0 / 255.0;

/// One luminance measurement and the encoding it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuminanceSample {
    pub value: f32,
    pub encoding: PixelEncoding,
}

impl LuminanceSample {
    /// Measure a readback buffer, resolving its surface format to an encoding.
    pub fn measure(frame: &FrameBuffer) -> Self {
        let encoding = PixelEncoding::resolve(frame.format);
        let value = estimate(
            &frame.data,
            frame.width,
            frame.height,
            frame.row_stride,
            encoding,
        );
        Self { value, encoding }
    }
}

/// Average BT.709 luminance of `height` rows of `width` pixels, in [0, 1].
///
/// Rows start every `row_stride` bytes. Pixels missing from a short buffer are
/// skipped rather than read, and the mean is taken over the pixels actually
/// present, not `width * height`. An empty frame yields 0.
pub fn estimate(
    pixels: &[u8],
    width: u32,
    height: u32,
    row_stride: usize,
    encoding: PixelEncoding,
) -> f32 {
    let bpp = encoding.bytes_per_pixel();
    let row_bytes = width as usize * bpp;
    if row_bytes == 0 || height == 0 {
        return 0.0;
    }
    let stride = row_stride.max(row_bytes);

    let mut accum = 0.0f64;
    let mut count = 0usize;
    for row in pixels.chunks(stride).take(height as usize) {
        let row = &row[..row.len().min(row_bytes)];
        for pixel in row.chunks_exact(bpp) {
            let [r, g, b] = decode_rgb(pixel, encoding);
            accum += bt709_luma(r, g, b);
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }
    ((accum / count as f64) as f32).clamp(0.0, 1.0)
}

/// Normalized RGB of one pixel. `pixel` holds exactly `bytes_per_pixel` bytes.
#[inline]
fn decode_rgb(pixel: &[u8], encoding: PixelEncoding) -> [f32; 3] {
    match encoding {
        PixelEncoding::RgbaUnorm8 => [
            f32::from(pixel[0]) * LDR_SCALE,
            f32::from(pixel[1]) * LDR_SCALE,
            f32::from(pixel[2]) * LDR_SCALE,
        ],
        PixelEncoding::BgraUnorm8 => [
            f32::from(pixel[2]) * LDR_SCALE,
            f32::from(pixel[1]) * LDR_SCALE,
            f32::from(pixel[0]) * LDR_SCALE,
        ],
        PixelEncoding::RgbaFloat16 => [
            half_channel(pixel[0], pixel[1]),
            half_channel(pixel[2], pixel[3]),
            half_channel(pixel[4], pixel[5]),
        ],
    }
}

/// Expand a native-endian binary16 channel and clamp it to the display range.
///
/// Out-of-range HDR values count as saturated; NaN counts as black.
#[inline]
fn half_channel(lo: u8, hi: u8) -> f32 {
    let value = f16::from_bits(u16::from_ne_bytes([lo, hi])).to_f32();
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
