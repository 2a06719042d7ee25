//! Remote boundary errors.
//!
//! # Error Code Convention
//!
//! All remote errors use the `REMOTE_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`RemoteError::NotFound`] | `REMOTE_NOT_FOUND` | No |
//! | [`RemoteError::Rejected`] | `REMOTE_REJECTED` | No |
//! | [`RemoteError::Transport`] | `REMOTE_TRANSPORT` | Yes |
//! | [`RemoteError::Unavailable`] | `REMOTE_UNAVAILABLE` | Yes |
//!
//! Transport and availability failures may clear up on retry; a
//! missing row or a rejected write will not.

use thiserror::Error;
use vitrine_types::{ErrorCode, RecordId};

/// Failure reported by the remote store or identity provider.
///
/// The core never lets one of these escape to rendering code: session
/// reads fail soft, role checks fail closed, and reorder persistence
/// converts failure into a rollback plus a notice.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The addressed row does not exist.
    #[error("record {id} not found in {collection}")]
    NotFound {
        /// Collection that was addressed.
        collection: String,
        /// Row id that was addressed.
        id: RecordId,
    },

    /// The remote accepted the request and refused it (validation,
    /// permissions on the remote side).
    #[error("remote rejected the request: {0}")]
    Rejected(String),

    /// The request never completed (network failure, reset).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote is reachable but not serving (maintenance, overload).
    #[error("remote unavailable")]
    Unavailable,
}

impl ErrorCode for RemoteError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "REMOTE_NOT_FOUND",
            Self::Rejected(_) => "REMOTE_REJECTED",
            Self::Transport(_) => "REMOTE_TRANSPORT",
            Self::Unavailable => "REMOTE_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Rejected(_) => false,
            Self::Transport(_) | Self::Unavailable => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_types::assert_error_codes;

    fn all_variants() -> Vec<RemoteError> {
        vec![
            RemoteError::NotFound {
                collection: "cards".into(),
                id: RecordId::new("c1"),
            },
            RemoteError::Rejected("x".into()),
            RemoteError::Transport("x".into()),
            RemoteError::Unavailable,
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "REMOTE_");
    }

    #[test]
    fn transport_failures_are_recoverable() {
        assert!(RemoteError::Transport("reset".into()).is_recoverable());
        assert!(RemoteError::Unavailable.is_recoverable());
        assert!(!RemoteError::Rejected("bad".into()).is_recoverable());
    }

    #[test]
    fn not_found_names_the_row() {
        let err = RemoteError::NotFound {
            collection: "cards".into(),
            id: RecordId::new("c9"),
        };
        assert!(err.to_string().contains("cards"));
        assert!(err.to_string().contains("c9"));
    }
}
