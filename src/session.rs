//! One-time process setup.
//!
//! [`init`] must run before any decode, resize, encode, or EXIF call. It is
//! guarded by a [`Once`], so racing callers block until the first one has
//! finished and later calls return immediately. The completion state of that
//! `Once` is the only global state the crate keeps.

use crate::error::{Error, Result};
use crate::imaging::SourceFormat;
use log::info;
use std::sync::Once;

static INIT: Once = Once::new();

/// Prepare the crate for use. Idempotent and safe to call from any thread.
///
/// Installs an `env_logger` at `info` level (overridable through `RUST_LOG`)
/// unless the host process already installed a logger, then reports the
/// compiled-in decoders.
pub fn init() {
    INIT.call_once(|| {
        // Another logger may already be installed.
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_target(false)
            .try_init();

        let decoders: Vec<&str> = SourceFormat::all().iter().map(|f| f.name()).collect();
        info!("agno initialized (decoders: {})", decoders.join(", "));
    });
}

/// Whether [`init`] has completed.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

pub(crate) fn ensure_initialized() -> Result<()> {
    if is_initialized() {
        Ok(())
    } else {
        Err(Error::NotInitialized)
    }
}
