//! Unified error interface for Vitrine.
//!
//! Every error type in the workspace implements [`ErrorCode`]:
//!
//! - **Machine-readable codes** for programmatic handling and logging
//! - **Recoverability** so callers know whether retry can help
//!
//! # Code Convention
//!
//! Codes are UPPER_SNAKE_CASE with a crate prefix:
//!
//! | Prefix | Crate |
//! |--------|-------|
//! | `REMOTE_` | vitrine-remote |
//! | `AUTH_` | vitrine-session |
//! | `ORDER_` | vitrine-admin |
//!
//! Codes are stable once defined; renaming one is a breaking change.
//!
//! # Example
//!
//! ```
//! use vitrine_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Offline,
//!     BadPayload,
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Offline => "FETCH_OFFLINE",
//!             Self::BadPayload => "FETCH_BAD_PAYLOAD",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Offline)
//!     }
//! }
//!
//! assert_eq!(FetchError::Offline.code(), "FETCH_OFFLINE");
//! assert!(FetchError::Offline.is_recoverable());
//! ```

/// Unified error code interface.
///
/// # Recoverability
///
/// An error is recoverable when retrying may succeed: transport
/// failures, timeouts, a busy remote. Non-recoverable errors need a
/// different action: an unknown record id stays unknown, a denied
/// role stays denied until someone grants it.
pub trait ErrorCode {
    /// Returns a machine-readable, stable, UPPER_SNAKE_CASE code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows workspace conventions.
///
/// Checks the code is non-empty, starts with `expected_prefix`, and is
/// UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with a descriptive message if validation fails. Intended for
/// tests.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use vitrine_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum E { A, B }
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "X_A",
///             Self::B => "X_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[E::A, E::B], "X_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
