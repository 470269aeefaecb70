//! The uniform in-memory image.

use std::fmt;

/// Bytes per pixel in the fixed RGBA8 layout.
pub const BYTES_PER_PIXEL: usize = 4;

/// Decoded pixels in interleaved 8-bit RGBA, row-major, no row padding.
///
/// The buffer length always equals `width * height * 4`; the fields are
/// private so that invariant cannot be broken from outside the crate.
/// Ownership is the only lifecycle: dropping the value (or passing it to
/// [`free_image`](crate::free_image)) releases the memory.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA bytes, or `None` if `data` does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Byte length of the pixel data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-area image.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.data.get(idx..idx + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

// Pixel data elided.
impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}
