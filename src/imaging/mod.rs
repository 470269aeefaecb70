//! Image decoding, resampling and WebP encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Detect** | magic bytes ([`SourceFormat::detect`]) |
//! | **Decode** | `image` crate decoders → RGBA8 |
//! | **Orient** | EXIF Orientation via [`crate::exif`] + `apply_orientation` |
//! | **Resize** | `image::imageops::resize`, Lanczos3 by default |
//! | **Encode → WebP** | `webp` (libwebp) lossy at quality 90 by default; `image` WebP encoder for lossless |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`Pipeline`], combining calculations, config, and backend

pub mod backend;
mod calculations;
pub mod format;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::ImageBackend;
pub use calculations::{WEBP_MAX_DIMENSION, rgba_len, validate_target};
pub use format::SourceFormat;
pub use operations::Pipeline;
pub use params::{DecodeParams, EncodeParams, ResampleFilter, ResizeParams, WebpMode};
pub use rust_backend::RustBackend;
