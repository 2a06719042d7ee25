//! Identity and authorization status types.
//!
//! [`Identity`] is pure identity ("who is signed in"); [`AuthStatus`]
//! is the derived authorization fact ("are they an admin"). They live
//! here, below the session layer, because the remote boundary emits
//! [`IdentityEvent`]s containing identities and must not depend on
//! session logic.
//!
//! # Design Rationale
//!
//! Authorization is **derived, never assumed**. `AuthStatus` is only
//! ever written by the session store after a confirmed role lookup;
//! there is no constructor path that produces `Admin` from an
//! `Identity` alone.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// The authenticated principal and its session token.
///
/// Created on sign-in, replaced wholesale on token refresh, destroyed
/// on sign-out or expiry. The token is opaque; expiry is the
/// provider's business and is surfaced only as a `SignedOut` event.
///
/// # Example
///
/// ```
/// use vitrine_types::{Identity, UserId};
///
/// let id = Identity::new(UserId::new("usr_181"), "tok_a1b2");
/// assert_eq!(id.token, "tok_a1b2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id, stable across token refreshes.
    pub user_id: UserId,
    /// Raw session token. Replaced on refresh.
    pub token: String,
}

impl Identity {
    /// Creates an identity from provider-supplied parts.
    #[must_use]
    pub fn new(user_id: UserId, token: impl Into<String>) -> Self {
        Self {
            user_id,
            token: token.into(),
        }
    }
}

/// Derived authorization fact about the current identity.
///
/// # Variants
///
/// | Variant | Meaning |
/// |---------|---------|
/// | `Unknown` | No identity read has completed yet |
/// | `Unauthenticated` | No identity present |
/// | `NonAdmin` | Identity present, role check returned `false` |
/// | `Admin` | Identity present, role check returned `true` |
///
/// Only the session store mutates this, and only in response to
/// identity-provider events or a completed role lookup. Role
/// elevation is never assumed before confirmation, so `Admin` cannot
/// be reached optimistically.
///
/// # Example
///
/// ```
/// use vitrine_types::AuthStatus;
///
/// assert!(AuthStatus::Admin.is_admin());
/// assert!(AuthStatus::NonAdmin.is_authenticated());
/// assert!(!AuthStatus::Unknown.is_authenticated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthStatus {
    /// No identity read has completed yet.
    #[default]
    Unknown,

    /// No identity is present.
    Unauthenticated,

    /// Authenticated, confirmed not an administrator.
    NonAdmin,

    /// Authenticated, confirmed administrator.
    Admin,
}

impl AuthStatus {
    /// Returns `true` only for a confirmed administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns `true` if an identity is present, admin or not.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::NonAdmin | Self::Admin)
    }
}

/// Change notification from the identity provider.
///
/// Delivered over the provider's broadcast channel. Events are
/// authoritative: a listener that receives one applies it
/// unconditionally, whereas the initial fetch at mount only seeds
/// state that no event has written yet (listen-before-poll).
///
/// # Example
///
/// ```
/// use vitrine_types::{Identity, IdentityEvent, UserId};
///
/// let evt = IdentityEvent::SignedIn(Identity::new(UserId::new("u1"), "t1"));
/// assert!(evt.identity().is_some());
/// assert!(IdentityEvent::SignedOut.identity().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityEvent {
    /// A user signed in.
    SignedIn(Identity),

    /// The current session's token was refreshed. Same user, new token.
    TokenRefreshed(Identity),

    /// The session ended (sign-out or expiry).
    SignedOut,
}

impl IdentityEvent {
    /// Returns the identity carried by the event, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(id) | Self::TokenRefreshed(id) => Some(id),
            Self::SignedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_refresh_keeps_user_id() {
        let before = Identity::new(UserId::new("u1"), "t1");
        let after = Identity::new(UserId::new("u1"), "t2");
        assert_eq!(before.user_id, after.user_id);
        assert_ne!(before.token, after.token);
    }

    #[test]
    fn default_status_is_unknown() {
        assert_eq!(AuthStatus::default(), AuthStatus::Unknown);
    }

    #[test]
    fn signed_out_carries_no_identity() {
        assert_eq!(IdentityEvent::SignedOut.identity(), None);
    }

    #[test]
    fn events_roundtrip_serde() {
        let evt = IdentityEvent::SignedIn(Identity::new(UserId::new("u1"), "t1"));
        let json = serde_json::to_string(&evt).expect("serialize");
        let back: IdentityEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, evt);
    }
}
