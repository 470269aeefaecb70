//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::error::{Error, Result};
use crate::pixel::BYTES_PER_PIXEL;

/// Largest edge a WebP bitstream can describe (14-bit field, stored minus one).
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Byte length of an RGBA8 buffer, or `None` on overflow.
///
/// ```
/// # use agno::imaging::rgba_len;
/// assert_eq!(rgba_len(100, 100), Some(40_000));
/// ```
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Check a resize target before any allocation happens.
///
/// Rejects zero edges, areas beyond `max_pixels`, and sizes whose byte
/// length does not fit in `usize`.
pub fn validate_target(width: u32, height: u32, max_pixels: u64) -> Result<()> {
    let invalid = |reason| Error::InvalidDimensions {
        width,
        height,
        reason,
    };

    if width == 0 || height == 0 {
        return Err(invalid("width and height must be non-zero"));
    }
    if u64::from(width) * u64::from(height) > max_pixels {
        return Err(invalid("exceeds the configured pixel limit"));
    }
    if rgba_len(width, height).is_none() {
        return Err(invalid("buffer size overflows"));
    }
    Ok(())
}

/// Check that a buffer can be represented in a WebP bitstream.
pub fn validate_webp_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::Encode(format!(
            "cannot encode an empty {width}x{height} image"
        )));
    }
    if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        return Err(Error::Encode(format!(
            "{width}x{height} exceeds the WebP limit of {WEBP_MAX_DIMENSION} per edge"
        )));
    }
    Ok(())
}
