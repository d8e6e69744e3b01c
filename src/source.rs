// Frame acquisition boundary.
//
// A FrameSource stands in for the host's downsample-and-readback service:
// render the current frame of a source into a tiny target, copy it to CPU
// memory and hand back the bytes. Unavailability is an error value, never a
// panic; the controller keeps its previous sample when it sees one.

pub mod image;

use crate::color::{ColorSpace, SurfaceFormat};
use crate::error::ReadbackError;

pub use self::image::ImageFrameSource;

/// CPU-readable copy of a downsampled frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    /// `height` rows, each starting `row_stride` bytes after the previous one.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bytes between row starts (may include padding).
    pub row_stride: usize,
    /// Format the host actually produced, which may differ from the one requested.
    pub format: SurfaceFormat,
}

/// Host service producing downsampled frames of the filtered source.
pub trait FrameSource {
    /// Color space of the current source. May change at any frame boundary.
    fn color_space(&self) -> ColorSpace;

    /// Render the current frame into a `size` x `size` target of `format` and read it back.
    fn readback(&mut self, size: u32, format: SurfaceFormat) -> Result<FrameBuffer, ReadbackError>;
}
