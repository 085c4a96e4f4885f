//! Hub registration errors.
//!
//! These are delivered exclusively through the `completion` callback of the
//! registration call that caused them; the hub never aborts on any of them.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`RegistrationError::InvalidExtensionName`] | `INVALID_EXTENSION_NAME` | No |
//! | [`RegistrationError::DuplicateExtensionName`] | `DUPLICATE_EXTENSION_NAME` | No |
//! | [`RegistrationError::ExtensionNotRegistered`] | `EXTENSION_NOT_REGISTERED` | No |
//! | [`RegistrationError::InitializationFailure`] | `EXTENSION_INITIALIZATION_FAILURE` | No |

use axle_extension::ExtensionError;
use axle_types::ErrorCode;
use thiserror::Error;

/// Failure of a hub registration operation.
///
/// # Example
///
/// ```
/// use axle_runtime::RegistrationError;
/// use axle_types::ErrorCode;
///
/// let err = RegistrationError::DuplicateExtensionName("com.example.module.analytics".into());
/// assert_eq!(err.code(), "DUPLICATE_EXTENSION_NAME");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// The extension type name was empty.
    #[error("extension type name must not be empty")]
    InvalidExtensionName,

    /// An extension with this type name is already registered.
    #[error("extension already registered: {0}")]
    DuplicateExtensionName(String),

    /// No extension with this type name is registered.
    #[error("extension not registered: {0}")]
    ExtensionNotRegistered(String),

    /// The extension's constructor or `on_registered` hook failed.
    #[error("extension failed to initialize: {0}")]
    InitializationFailure(#[from] ExtensionError),
}

impl ErrorCode for RegistrationError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidExtensionName => "INVALID_EXTENSION_NAME",
            Self::DuplicateExtensionName(_) => "DUPLICATE_EXTENSION_NAME",
            Self::ExtensionNotRegistered(_) => "EXTENSION_NOT_REGISTERED",
            Self::InitializationFailure(_) => "EXTENSION_INITIALIZATION_FAILURE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
