//! Pipeline configuration.
//!
//! Handles loading, validating, and merging an `agno.toml` file. Stock
//! defaults are the base layer; a user file only has to name the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [decode]
//! auto_orient = false       # Rotate/flip according to EXIF Orientation
//! max_pixels = 268435456    # Decode/resize pixel ceiling (16384 x 16384)
//! max_alloc = 1073741824    # Decoder buffer ceiling in bytes (1 GiB)
//!
//! [resize]
//! filter = "lanczos3"       # nearest | bilinear | catmull-rom | lanczos3
//!
//! [encode]
//! mode = "lossy"            # lossy | lossless
//! quality = 90              # 0-100, lossy only
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{ResampleFilter, WebpMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default pixel ceiling: a 16384 x 16384 image, 1 GiB of RGBA.
pub const DEFAULT_MAX_PIXELS: u64 = 16384 * 16384;

/// Default decoder allocation ceiling. Fits [`DEFAULT_MAX_PIXELS`] of 8-bit
/// RGBA, but not the same image at 16 bits per channel.
pub const DEFAULT_MAX_ALLOC: u64 = 1 << 30;

pub const DEFAULT_WEBP_QUALITY: u8 = 90;

/// Pipeline configuration loaded from `agno.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Decoder behavior (orientation, limits).
    pub decode: DecodeConfig,
    /// Resampling settings.
    pub resize: ResizeConfig,
    /// WebP output settings.
    pub encode: EncodeConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decode.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "decode.max_pixels must be non-zero".into(),
            ));
        }
        if self.decode.max_alloc == 0 {
            return Err(ConfigError::Validation(
                "decode.max_alloc must be non-zero".into(),
            ));
        }
        if self.encode.quality > 100 {
            return Err(ConfigError::Validation(
                "encode.quality must be 0-100".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeConfig {
    /// Apply the EXIF Orientation tag to decoded pixels.
    pub auto_orient: bool,
    /// Largest `width * height` accepted from a decoder or requested from
    /// the resampler.
    pub max_pixels: u64,
    /// Largest buffer, in bytes, a decoder may allocate for its native
    /// pixel format.
    pub max_alloc: u64,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            auto_orient: false,
            max_pixels: DEFAULT_MAX_PIXELS,
            max_alloc: DEFAULT_MAX_ALLOC,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub filter: ResampleFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    pub mode: WebpMode,
    /// Lossy quality, 0-100. Higher is larger and closer to the source.
    pub quality: u8,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            mode: WebpMode::Lossy,
            quality: DEFAULT_WEBP_QUALITY,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but
/// cannot be read or parsed.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the TOML file at `path`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `agno.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Agno Configuration
# ==================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Decoding
# ---------------------------------------------------------------------------
[decode]
# Rotate/flip decoded pixels according to the EXIF Orientation tag (0x0112).
auto_orient = false

# Refuse to decode, or resize to, images with more pixels than this.
max_pixels = 268435456

# Refuse to decode images whose decoder buffer would exceed this many bytes.
max_alloc = 1073741824

# ---------------------------------------------------------------------------
# Resampling
# ---------------------------------------------------------------------------
[resize]
# Interpolation kernel: "nearest", "bilinear", "catmull-rom" or "lanczos3".
filter = "lanczos3"

# ---------------------------------------------------------------------------
# WebP output
# ---------------------------------------------------------------------------
[encode]
# "lossy" (VP8) or "lossless" (VP8L).
mode = "lossy"

# Lossy quality, 0-100. Ignored in lossless mode.
quality = 90
"##
}
