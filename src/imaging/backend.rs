//! Image processing backend trait.
//!
//! The [`ImageBackend`] trait defines the three pixel operations every
//! backend must support: decode, resize, and WebP encode. Validation,
//! configuration, and file handling live in
//! [`Pipeline`](super::operations::Pipeline), so a backend only ever sees
//! requests that already passed those checks.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::{DecodeParams, EncodeParams, ResizeParams};
use crate::error::Result;
use crate::pixel::PixelBuffer;

/// Trait for image processing backends.
pub trait ImageBackend: Sync {
    /// Decode file bytes of an already-detected format into RGBA8.
    fn decode(&self, params: &DecodeParams<'_>) -> Result<PixelBuffer>;

    /// Resample to exactly the requested dimensions.
    fn resize(&self, params: &ResizeParams<'_>) -> Result<PixelBuffer>;

    /// Serialize to a complete WebP file image (`RIFF....WEBP`).
    fn encode_webp(&self, params: &EncodeParams<'_>) -> Result<Vec<u8>>;
}
