//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`Pipeline`](super::operations::Pipeline), which
//! validates requests and owns the configuration, and the
//! [`backend`](super::backend), which does the pixel work.
//!
//! ## Types
//!
//! - [`ResampleFilter`]: Interpolation kernel for resizing (default Lanczos3).
//! - [`WebpMode`]: Lossy (default) or lossless WebP output.
//! - [`DecodeParams`]: Source bytes, detected format, orientation, limits.
//! - [`ResizeParams`]: Source buffer, exact target dimensions, filter.
//! - [`EncodeParams`]: Buffer to encode, mode, quality.

use super::format::SourceFormat;
use crate::pixel::PixelBuffer;
use image::imageops::FilterType;
use image::metadata::Orientation;
use serde::{Deserialize, Serialize};

/// Interpolation kernel used by the resampler.
///
/// All kernels run separably (vertical pass, then horizontal) in `f32` and
/// round to nearest, so identical inputs give byte-identical outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Box kernel: every output pixel copies one source pixel.
    Nearest,
    /// Triangle kernel with support 1.0.
    Bilinear,
    /// Cubic kernel, B = 0, C = 0.5.
    CatmullRom,
    /// Windowed sinc with three lobes.
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub(crate) fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// WebP bitstream flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebpMode {
    /// VP8, sized by `quality`.
    #[default]
    Lossy,
    /// VP8L; decodes back to the exact input pixels.
    Lossless,
}

/// Parameters for decoding an in-memory file.
#[derive(Debug, Clone, Copy)]
pub struct DecodeParams<'a> {
    pub bytes: &'a [u8],
    pub format: SourceFormat,
    /// Orientation to apply after decoding; `None` leaves pixels as stored.
    pub orientation: Option<Orientation>,
    pub max_pixels: u64,
    /// Most bytes the decoder may allocate for its native pixel buffer.
    pub max_alloc: u64,
}

/// Parameters for a resize. Target dimensions are honored exactly.
#[derive(Debug, Clone, Copy)]
pub struct ResizeParams<'a> {
    pub source: &'a PixelBuffer,
    pub width: u32,
    pub height: u32,
    pub filter: ResampleFilter,
}

/// Parameters for a WebP encode.
#[derive(Debug, Clone, Copy)]
pub struct EncodeParams<'a> {
    pub image: &'a PixelBuffer,
    pub mode: WebpMode,
    /// 0-100; ignored for [`WebpMode::Lossless`].
    pub quality: u8,
}
