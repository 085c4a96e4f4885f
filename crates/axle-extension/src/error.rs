//! Extension layer errors.
//!
//! Errors an extension's own hooks report back to the hub. They use the
//! `EXTENSION_` code prefix and are never recoverable by retry; the hub
//! folds them into the registration completion rather than panicking.

use axle_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by an extension hook.
///
/// # Error Codes
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | [`ConstructionFailed`](Self::ConstructionFailed) | `EXTENSION_CONSTRUCTION_FAILED` | No |
/// | [`RegistrationFailed`](Self::RegistrationFailed) | `EXTENSION_REGISTRATION_FAILED` | No |
///
/// # Example
///
/// ```
/// use axle_extension::ExtensionError;
/// use axle_types::ErrorCode;
///
/// let err = ExtensionError::RegistrationFailed("missing app id".into());
/// assert_eq!(err.code(), "EXTENSION_REGISTRATION_FAILED");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ExtensionError {
    /// The extension constructor could not produce an instance.
    #[error("extension construction failed: {0}")]
    ConstructionFailed(String),

    /// The extension's `on_registered` hook failed.
    #[error("extension registration failed: {0}")]
    RegistrationFailed(String),
}

impl ErrorCode for ExtensionError {
    fn code(&self) -> &'static str {
        match self {
            Self::ConstructionFailed(_) => "EXTENSION_CONSTRUCTION_FAILED",
            Self::RegistrationFailed(_) => "EXTENSION_REGISTRATION_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axle_types::assert_error_codes;

    fn all_variants() -> Vec<ExtensionError> {
        vec![
            ExtensionError::ConstructionFailed("x".into()),
            ExtensionError::RegistrationFailed("x".into()),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "EXTENSION_");
    }

    #[test]
    fn none_are_recoverable() {
        for err in all_variants() {
            assert!(!err.is_recoverable());
        }
    }
}
