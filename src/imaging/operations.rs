//! High-level image operations.
//!
//! [`Pipeline`] combines configuration, validation, and file handling with a
//! backend that does the pixel work. Every operation checks that
//! [`init`](crate::init) has run, validates its inputs, and only then hands
//! the request to the backend.

use super::backend::ImageBackend;
use super::calculations::{validate_target, validate_webp_dimensions};
use super::format::SourceFormat;
use super::params::{DecodeParams, EncodeParams, ResizeParams};
use super::rust_backend::RustBackend;
use crate::config::{PipelineConfig, load_config};
use crate::error::{Error, Result};
use crate::exif::{self, ExifDirectory, tags};
use crate::pixel::PixelBuffer;
use crate::session::ensure_initialized;
use image::metadata::Orientation;
use log::{debug, warn};
use std::io::Write;
use std::path::Path;

/// Decode → resize → WebP pipeline bound to one configuration.
pub struct Pipeline<B: ImageBackend = RustBackend> {
    backend: B,
    config: PipelineConfig,
}

impl Pipeline<RustBackend> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_backend(RustBackend::new(), config)
    }

    /// Build a pipeline from an `agno.toml` file layered over the stock
    /// defaults. A missing file gives the defaults; an unreadable, malformed
    /// or out-of-range one is [`Error::Config`].
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = load_config(path)?;
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(Self::new(config))
    }
}

impl Default for Pipeline<RustBackend> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<B: ImageBackend> Pipeline<B> {
    pub fn with_backend(backend: B, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read a file fully and decode it.
    pub fn load(&self, path: &Path) -> Result<PixelBuffer> {
        ensure_initialized()?;
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        debug!("Loading {} ({} bytes)", path.display(), bytes.len());
        self.decode(&bytes).map_err(|e| match e {
            Error::Decode(msg) => Error::Decode(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Detect the format of in-memory file bytes and decode them to RGBA8.
    pub fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        ensure_initialized()?;
        let format = SourceFormat::detect(bytes)
            .ok_or_else(|| Error::decode("unrecognized image format"))?;

        let orientation = if self.config.decode.auto_orient {
            exif_orientation(bytes)
        } else {
            None
        };

        self.backend.decode(&DecodeParams {
            bytes,
            format,
            orientation,
            max_pixels: self.config.decode.max_pixels,
            max_alloc: self.config.decode.max_alloc,
        })
    }

    /// Resample `image` to exactly `width` x `height` with the configured
    /// filter. The source is left untouched.
    pub fn resize(&self, image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
        ensure_initialized()?;
        if image.is_empty() {
            return Err(Error::InvalidDimensions {
                width: image.width(),
                height: image.height(),
                reason: "source image is empty",
            });
        }
        validate_target(width, height, self.config.decode.max_pixels)?;

        debug!(
            "Resizing {}x{} to {}x{} ({:?})",
            image.width(),
            image.height(),
            width,
            height,
            self.config.resize.filter
        );
        self.backend.resize(&ResizeParams {
            source: image,
            width,
            height,
            filter: self.config.resize.filter,
        })
    }

    /// Serialize `image` as WebP into memory, in the configured mode.
    pub fn encode_webp(&self, image: &PixelBuffer) -> Result<Vec<u8>> {
        ensure_initialized()?;
        validate_webp_dimensions(image.width(), image.height())?;
        self.backend.encode_webp(&EncodeParams {
            image,
            mode: self.config.encode.mode,
            quality: self.config.encode.quality,
        })
    }

    /// Encode `image` as WebP and write it to `path`, replacing any existing
    /// file. On failure `path` is left as it was.
    pub fn write_webp(&self, path: &Path, image: &PixelBuffer) -> Result<()> {
        let bytes = self.encode_webp(image)?;
        write_atomically(path, &bytes)?;
        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Write through a temp file in the destination directory, then rename.
///
/// The temp file is deleted on drop, so every error path cleans up. It is
/// created with the mode the result should have: the existing target's, or
/// the usual `0o666` minus umask for a new file.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    if let Some(perms) = output_permissions(path) {
        builder.permissions(perms);
    }
    let mut tmp = builder.tempfile_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn output_permissions(path: &Path) -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(match std::fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(_) => std::fs::Permissions::from_mode(0o666),
    })
}

#[cfg(not(unix))]
fn output_permissions(_path: &Path) -> Option<std::fs::Permissions> {
    None
}

/// Orientation from the source's EXIF, if present and meaningful.
fn exif_orientation(bytes: &[u8]) -> Option<Orientation> {
    let dir = match ExifDirectory::from_source(bytes) {
        Ok(dir) => dir,
        Err(Error::NoMetadata) => return None,
        Err(e) => {
            warn!("Ignoring unreadable EXIF while orienting: {e}");
            return None;
        }
    };
    let value = dir.get(tags::ORIENTATION).ok()?;
    match value.decode() {
        exif::TagValue::Short(v) => v
            .first()
            .and_then(|&o| u8::try_from(o).ok())
            .and_then(Orientation::from_exif),
        other => {
            warn!("Orientation tag has unexpected type: {other:?}");
            None
        }
    }
}
