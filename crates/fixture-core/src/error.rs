//! Error taxonomy for descriptor resolution and field injection.
//!
//! Every failure is fail-fast: nothing is retried or downgraded, and an
//! injection pass stops at the first error it meets.

/// Error type for generator construction, resolution and injection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Malformed bounds, detected before any value is produced
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Missing descriptor, incompatible field type, empty candidate set,
    /// unregistered custom generator, non-positive size or length
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The fixture refused the assignment of a generated value
    #[error("Access denied to field '{field}': {reason}")]
    AccessDenied { field: String, reason: String },
}

impl GenerationError {
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn access_denied(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Fail with [`GenerationError::InvalidArgument`] unless `condition` holds.
    pub fn check_argument(condition: bool, message: impl Into<String>) -> Result<(), Self> {
        if condition {
            Ok(())
        } else {
            Err(Self::invalid_argument(message))
        }
    }

    /// Fail with [`GenerationError::InvalidRange`] unless `condition` holds.
    pub fn check_range(condition: bool, message: impl Into<String>) -> Result<(), Self> {
        if condition {
            Ok(())
        } else {
            Err(Self::invalid_range(message))
        }
    }
}
