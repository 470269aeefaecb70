//! Error taxonomy shared by every public operation.
//!
//! Callers branch on the variant, never on the message. Codec-specific
//! errors from the `image` crate are flattened into [`Error::Decode`] or
//! [`Error::Encode`] at the backend boundary.

use crate::config::ConfigError;
use crate::exif::tags::tag_name;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: &'static str,
    },
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Source has no EXIF metadata")]
    NoMetadata,
    #[error("EXIF tag {} not found", describe_tag(*tag))]
    TagNotFound { tag: u16 },
    #[error("agno::init() must be called before this operation")]
    NotInitialized,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }
}

fn describe_tag(tag: u16) -> String {
    match tag_name(tag) {
        Some(name) => format!("0x{tag:04X} ({name})"),
        None => format!("0x{tag:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_not_found_names_known_tags() {
        let err = Error::TagNotFound { tag: 0x0112 };
        assert_eq!(err.to_string(), "EXIF tag 0x0112 (Orientation) not found");
    }

    #[test]
    fn tag_not_found_unknown_tag_is_hex_only() {
        let err = Error::TagNotFound { tag: 0xBEEF };
        assert_eq!(err.to_string(), "EXIF tag 0xBEEF not found");
    }

    #[test]
    fn io_error_carries_path() {
        let err = Error::io(
            "/missing/photo.jpg",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.to_string().contains("/missing/photo.jpg"));
        assert!(matches!(err, Error::Io { .. }));
    }
}
