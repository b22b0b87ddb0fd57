//! Error handling for growth evaluation.
//!
//! Range clamping is not an error: an age outside a
//! table's covered domain still produces a score and is reported through
//! [`crate::algorithm::interpolation::RangeClampWarning`] instead.

use std::io;

use crate::reference::ReferenceTableKey;

/// Specialized error type for growth evaluation
#[derive(Debug, thiserror::Error)]
pub enum GrowthError {
    /// No reference table is registered for the requested combination
    #[error("Configuration error: no reference table registered for {key}")]
    Configuration {
        /// The key that could not be resolved
        key: ReferenceTableKey,
    },

    /// A measurement, patient field or transform parameter is out of range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A reference table failed load-time validation
    #[error("Invalid reference table '{name}': {reason}")]
    InvalidTable {
        /// Table name or source path
        name: String,
        /// Why validation rejected the table
        reason: String,
    },

    /// Error opening or reading a reference file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding a JSON reference bundle or request
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GrowthError {
    /// Shorthand for an [`GrowthError::InvalidInput`] error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for an [`GrowthError::InvalidTable`] error
    pub fn invalid_table(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error stems from store configuration rather than caller input
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::InvalidTable { .. })
    }
}

/// Result type for growth evaluation operations
pub type Result<T> = std::result::Result<T, GrowthError>;

/// Reject values that are not finite and strictly positive
pub(crate) fn ensure_positive(value: f64, what: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GrowthError::invalid_input(format!(
            "{what} must be a positive finite number, got {value}"
        )))
    }
}
