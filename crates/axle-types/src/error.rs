//! Unified error interface for Axle.
//!
//! All Axle error types implement [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: For programmatic error handling
//! - **Recoverability info**: For retry logic and user feedback
//!
//! # Example
//!
//! ```
//! use axle_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     NotFound(String),
//!     Busy,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound(_) => "NOT_FOUND",
//!             Self::Busy => "BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! let err = MyError::Busy;
//! assert_eq!(err.code(), "BUSY");
//! assert!(err.is_recoverable());
//! ```

/// Unified error code interface for Axle errors.
///
/// # Code Format
///
/// Error codes should be:
///
/// - **UPPER_SNAKE_CASE**: e.g., `"DUPLICATE_EXTENSION_NAME"`
/// - **Stable**: Codes do not change once defined (API contract)
///
/// # Recoverability
///
/// An error is recoverable if retrying the operation may succeed or the
/// caller can take corrective action. Invalid input and duplicate
/// registrations are not recoverable; transient conditions are.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    ///
    /// - `true`: Retry may succeed, or the caller can fix the condition
    /// - `false`: Retry will not help, requires a code change
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error's code carries `expected_prefix` and is
/// well-formed UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with the offending code if either check fails.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(
        code.starts_with(expected_prefix),
        "code '{code}' is missing the '{expected_prefix}' prefix"
    );
    assert!(code_is_well_formed(code), "code '{code}' is not UPPER_SNAKE_CASE");
}

/// Runs [`assert_error_code`] over every variant of an error enum.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for error in errors {
        assert_error_code(error, expected_prefix);
    }
}

/// UPPER_SNAKE_CASE means underscore-separated segments of uppercase
/// letters and digits, with no segment empty (which also rules out the
/// empty code and leading, trailing, or doubled underscores).
fn code_is_well_formed(code: &str) -> bool {
    !code.is_empty()
        && code.split('_').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        })
}
