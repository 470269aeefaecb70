//! # agno
//!
//! Load a raster image, resample it to an exact size, write it out as WebP,
//! and read individual EXIF tags from the source.
//!
//! ```no_run
//! use std::path::Path;
//!
//! agno::init();
//! let img = agno::load_image(Path::new("photo.jpg"))?;
//! let small = agno::resize_image(&img, 320, 240)?;
//! agno::write_webp(Path::new("photo.webp"), &small)?;
//! agno::free_image(small);
//!
//! let make = agno::get_exif_value(Path::new("photo.jpg"), 0x010F)?;
//! println!("type {} / {} bytes", make.type_code(), make.len());
//! # Ok::<(), agno::Error>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | One-time [`init`]; every other operation fails with [`Error::NotInitialized`] before it |
//! | [`imaging`] | Format detection, decode, resize, WebP encode, behind the [`ImageBackend`] trait |
//! | [`exif`] | Container scanning and bounds-checked IFD walking for raw tag lookup |
//! | [`pixel`] | [`PixelBuffer`], the owned RGBA8 image every operation exchanges |
//! | [`config`] | `agno.toml` loading with stock defaults and layered overrides |
//! | [`error`] | The [`Error`] taxonomy shared by every operation |
//!
//! # Design Decisions
//!
//! ## One Pixel Layout
//!
//! Every decoder converts to interleaved 8-bit RGBA, so a buffer is always
//! `width * height * 4` bytes no matter what format it came from. Grey,
//! 16-bit, and float sources are narrowed at decode time.
//!
//! ## Exact Dimensions, Deterministic Resampling
//!
//! [`resize_image`] honours the requested width and height exactly, even
//! when that distorts the aspect ratio. The default kernel is Lanczos3;
//! nearest, bilinear, and Catmull-Rom are available through
//! [`config::ResizeConfig`]. The same input always produces the same bytes.
//!
//! ## WebP, Written Atomically
//!
//! Output is lossy WebP at quality 90 unless [`config::EncodeConfig`] asks
//! for another quality or for lossless. The encoded bytes go to a temporary
//! file in the destination directory which is renamed over the target only
//! after a successful write, so a failed call never leaves a half-written
//! file. An overwritten file keeps its permissions.
//!
//! ## Raw EXIF Values
//!
//! [`get_exif_value`] returns the tag's bytes exactly as stored plus the
//! EXIF type code and byte order; [`ExifValue::decode`] turns them into
//! typed components when needed. A missing tag is [`Error::TagNotFound`], a
//! source without EXIF is [`Error::NoMetadata`], and a corrupt directory is
//! [`Error::Decode`]. None of them is ever an empty "found" value.
//!
//! ## Ownership Instead of Handles
//!
//! Buffers are plain owned values. Passing one by value hands it over,
//! borrowing it lends it, and dropping it (or [`free_image`]) releases it.
//! No operation keeps a reference to a buffer after returning.

pub mod config;
pub mod error;
pub mod exif;
pub mod imaging;
pub mod pixel;
pub mod session;

pub use error::{Error, Result};
pub use exif::{ExifSource, ExifValue, TagType, TagValue};
pub use imaging::{ImageBackend, Pipeline, ResampleFilter, SourceFormat, WebpMode};
pub use pixel::PixelBuffer;
pub use session::{init, is_initialized};

use log::debug;
use std::path::Path;

fn default_pipeline() -> Pipeline {
    Pipeline::default()
}

/// Read and decode an image file with the default configuration.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    default_pipeline().load(path)
}

/// Resample `image` to exactly `width` x `height` with the default filter.
pub fn resize_image(image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    default_pipeline().resize(image, width, height)
}

/// Encode `image` as WebP (lossy, quality 90) and write it to `path`.
pub fn write_webp(path: &Path, image: &PixelBuffer) -> Result<()> {
    default_pipeline().write_webp(path, image)
}

/// Release a buffer. Equivalent to dropping it.
pub fn free_image(image: PixelBuffer) {
    debug!("Freeing {}x{} buffer", image.width(), image.height());
    drop(image);
}

/// Look up one EXIF tag in a file or in bytes already read.
///
/// `tag` uses the EXIF numbering; it is signed to match the classic
/// interface and reinterpreted as unsigned, so `0x8769_u16 as i16` and
/// `-30871` name the same tag.
pub fn get_exif_value<'a>(source: impl Into<ExifSource<'a>>, tag: i16) -> Result<ExifValue> {
    session::ensure_initialized()?;
    let tag = tag as u16;
    match source.into() {
        ExifSource::Bytes(bytes) => exif::lookup(bytes, tag),
        ExifSource::Path(path) => {
            let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
            exif::lookup(&bytes, tag)
        }
    }
}
