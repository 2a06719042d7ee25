//! Session layer errors.
//!
//! Most session failures are absorbed on the spot (fail-soft reads,
//! fail-closed role checks) and only surface in logs; the variants
//! here exist for the few hard edges and so the absorbed cases log a
//! stable code.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`SessionError::ListenerAttached`] | `AUTH_LISTENER_ATTACHED` | No |
//! | [`SessionError::ProviderUnreachable`] | `AUTH_PROVIDER_UNREACHABLE` | Yes |
//! | [`SessionError::RoleCheckTimeout`] | `AUTH_ROLE_CHECK_TIMEOUT` | Yes |

use thiserror::Error;
use vitrine_remote::RemoteError;
use vitrine_types::ErrorCode;

/// Session layer error.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A second identity listener registration was refused. The
    /// listener is registered exactly once per store lifetime; a
    /// fresh view mount gets a fresh store.
    #[error("identity listener is already attached")]
    ListenerAttached,

    /// The identity provider could not be reached. The read that hit
    /// this resolves soft to "no identity".
    #[error("identity provider unreachable: {0}")]
    ProviderUnreachable(#[from] RemoteError),

    /// The admin role lookup exceeded its deadline. The check that
    /// hit this resolves closed to "not admin".
    #[error("role lookup exceeded its deadline")]
    RoleCheckTimeout,
}

impl ErrorCode for SessionError {
    fn code(&self) -> &'static str {
        match self {
            Self::ListenerAttached => "AUTH_LISTENER_ATTACHED",
            Self::ProviderUnreachable(_) => "AUTH_PROVIDER_UNREACHABLE",
            Self::RoleCheckTimeout => "AUTH_ROLE_CHECK_TIMEOUT",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ListenerAttached => false,
            Self::ProviderUnreachable(_) | Self::RoleCheckTimeout => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_types::assert_error_codes;

    fn all_variants() -> Vec<SessionError> {
        vec![
            SessionError::ListenerAttached,
            SessionError::ProviderUnreachable(RemoteError::Unavailable),
            SessionError::RoleCheckTimeout,
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "AUTH_");
    }

    #[test]
    fn timeout_is_recoverable() {
        assert!(SessionError::RoleCheckTimeout.is_recoverable());
        assert!(!SessionError::ListenerAttached.is_recoverable());
    }
}
