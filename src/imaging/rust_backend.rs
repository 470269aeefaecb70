//! Image backend built on the `image` crate, with libwebp for lossy output.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate decoders under `image::Limits`, converted to RGBA8 |
//! | Orientation | `DynamicImage::apply_orientation` |
//! | Resize | `image::imageops::resize` with the configured filter |
//! | Encode → WebP, lossy | `webp::Encoder` (libwebp VP8) |
//! | Encode → WebP, lossless | `image::codecs::webp::WebPEncoder` (VP8L) |

use super::backend::ImageBackend;
use super::params::{DecodeParams, EncodeParams, ResizeParams, WebpMode};
use crate::error::{Error, Result};
use crate::pixel::PixelBuffer;
use image::codecs::webp::WebPEncoder;
use image::{
    DynamicImage, ExtendedColorType, ImageBuffer, ImageDecoder, ImageReader, Limits, Rgba,
};
use log::debug;
use std::io::Cursor;

/// Backend using the `image` crate ecosystem plus the `webp` bindings.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, params: &DecodeParams<'_>) -> Result<PixelBuffer> {
        let name = params.format.name();
        let codec_err = |e: image::ImageError| Error::decode(format!("{name}: {e}"));

        let mut limits = decode_limits(params.max_pixels, params.max_alloc);
        let mut reader =
            ImageReader::with_format(Cursor::new(params.bytes), params.format.image_format());
        reader.limits(limits.clone());
        let decoder = reader.into_decoder().map_err(codec_err)?;

        let (width, height) = decoder.dimensions();
        if u64::from(width) * u64::from(height) > params.max_pixels {
            return Err(Error::decode(format!(
                "{name}: {width}x{height} exceeds the limit of {} pixels",
                params.max_pixels
            )));
        }
        // Header dimensions times the native sample size, before allocating.
        limits.reserve(decoder.total_bytes()).map_err(codec_err)?;

        let mut img = DynamicImage::from_decoder(decoder).map_err(codec_err)?;
        if let Some(orientation) = params.orientation {
            img.apply_orientation(orientation);
        }

        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("Decoded {name} {width}x{height}");
        PixelBuffer::from_rgba(width, height, rgba.into_raw())
            .ok_or_else(|| Error::decode(format!("{name}: decoder returned a short buffer")))
    }

    fn resize(&self, params: &ResizeParams<'_>) -> Result<PixelBuffer> {
        let src = params.source;
        if src.dimensions() == (params.width, params.height) {
            return Ok(src.clone());
        }

        let view: ImageBuffer<Rgba<u8>, &[u8]> =
            ImageBuffer::from_raw(src.width(), src.height(), src.as_bytes()).ok_or_else(|| {
                Error::InvalidDimensions {
                    width: src.width(),
                    height: src.height(),
                    reason: "source buffer does not match its dimensions",
                }
            })?;

        let resized = image::imageops::resize(
            &view,
            params.width,
            params.height,
            params.filter.filter_type(),
        );

        PixelBuffer::from_rgba(params.width, params.height, resized.into_raw()).ok_or(
            Error::InvalidDimensions {
                width: params.width,
                height: params.height,
                reason: "resampler returned a short buffer",
            },
        )
    }

    fn encode_webp(&self, params: &EncodeParams<'_>) -> Result<Vec<u8>> {
        let image = params.image;
        match params.mode {
            WebpMode::Lossy => {
                let encoder = webp::Encoder::new(
                    image.as_bytes(),
                    webp::PixelLayout::Rgba,
                    image.width(),
                    image.height(),
                );
                let encoded = encoder
                    .encode_simple(false, f32::from(params.quality))
                    .map_err(|e| Error::Encode(format!("WebP encode failed: {e:?}")))?;
                Ok(encoded.to_vec())
            }
            WebpMode::Lossless => {
                let mut out = Vec::new();
                WebPEncoder::new_lossless(&mut out)
                    .encode(
                        image.as_bytes(),
                        image.width(),
                        image.height(),
                        ExtendedColorType::Rgba8,
                    )
                    .map_err(|e| Error::Encode(format!("WebP encode failed: {e}")))?;
                Ok(out)
            }
        }
    }
}

/// Decoder limits for a pixel ceiling and an allocation ceiling. Neither
/// edge may exceed the pixel ceiling on its own.
fn decode_limits(max_pixels: u64, max_alloc: u64) -> Limits {
    let edge = u32::try_from(max_pixels).unwrap_or(u32::MAX);
    let mut limits = Limits::default();
    limits.max_image_width = Some(edge);
    limits.max_image_height = Some(edge);
    limits.max_alloc = Some(max_alloc);
    limits
}
