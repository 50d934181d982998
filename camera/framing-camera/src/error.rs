//! Error types for camera configuration.

use thiserror::Error;

/// Errors that can occur while configuring a framing camera.
///
/// A configured camera never fails at runtime: ticks whose preconditions
/// are unmet are skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CameraError {
    /// A camera setting is outside its valid range.
    #[error("invalid camera setting {name} = {value}: {reason}")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// The constraint it violates.
        reason: &'static str,
    },

    /// The lens cannot project anything.
    #[error("invalid lens: {0}")]
    InvalidLens(String),
}

impl CameraError {
    /// Create an invalid setting error.
    #[must_use]
    pub const fn invalid_setting(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidSetting {
            name,
            value,
            reason,
        }
    }

    /// Create an invalid lens error.
    #[must_use]
    pub fn invalid_lens(reason: impl Into<String>) -> Self {
        Self::InvalidLens(reason.into())
    }

    /// Check if this error names `setting`.
    #[must_use]
    pub fn is_setting(&self, setting: &str) -> bool {
        matches!(self, Self::InvalidSetting { name, .. } if *name == setting)
    }
}

/// Result type for camera operations.
pub type CameraResult<T> = std::result::Result<T, CameraError>;
