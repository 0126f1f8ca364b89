//! Error Types
//!
//! [`StageError`] covers every failure the crate reports. None of them is
//! fatal to a host application: they are all confined to the animated model
//! and degrade to a static or placeholder visual.
//!
//! | Variant        | Recovery                                      |
//! |----------------|-----------------------------------------------|
//! | `AssetLoad`    | keep showing the placeholder                  |
//! | `NoAnimations` | show the model without scroll playback        |
//! | `Attach`       | retry once the scroll region is mounted        |
//!
//! ```rust,ignore
//! use scrollstage::errors::{Result, StageError};
//!
//! fn check(clips: usize) -> Result<()> {
//!     if clips == 0 {
//!         return Err(StageError::NoAnimations);
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    // ========================================================================
    // Animation Feature Errors
    // ========================================================================
    /// The model could not be read or decoded.
    #[error("Failed to load model '{source_name}': {reason}")]
    AssetLoad {
        /// Path, URL or label of the asset
        source_name: String,
        /// What went wrong
        reason: String,
    },

    /// The model contains no animation clips.
    #[error("Model has no animation clips")]
    NoAnimations,

    /// The scroll region was not mounted when a listener was attached.
    #[error("Scroll region '{region}' is not mounted")]
    Attach {
        /// Debug label of the missing region
        region: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ========================================================================
    // Decoding & I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error (embedded glTF buffers).
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// glTF document error.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// Browser API error.
    #[cfg(target_arch = "wasm32")]
    #[error("Web error: {0}")]
    Web(String),
}

impl StageError {
    pub(crate) fn asset_load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        StageError::AssetLoad {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the animation feature can fall back to a static or placeholder visual.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StageError::AssetLoad { .. } | StageError::NoAnimations | StageError::Attach { .. }
        )
    }

    /// Whether retrying the same call later can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, StageError::Attach { .. })
    }
}

impl From<gltf::Error> for StageError {
    fn from(err: gltf::Error) -> Self {
        StageError::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, StageError>`.
pub type Result<T> = std::result::Result<T, StageError>;
