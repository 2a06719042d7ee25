//! Identity provider abstraction.
//!
//! The [`IdentityProvider`] trait is the session half of the remote
//! boundary: current-session reads, role lookups, and a broadcast
//! subscription for identity changes.
//!
//! # Listen-Before-Poll
//!
//! [`subscribe`](IdentityProvider::subscribe) hands out a
//! [`broadcast::Receiver`] that buffers events from the moment of
//! subscription. The session layer subscribes *before* issuing its
//! initial [`get_session`](IdentityProvider::get_session) so a change
//! event racing the initial fetch is never lost.

use crate::RemoteError;
use std::future::Future;
use tokio::sync::broadcast;
use vitrine_types::{Identity, IdentityEvent, UserId};

/// Role name that grants access to the back-office.
pub const ROLE_ADMIN: &str = "admin";

/// Session half of the remote boundary.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// async tasks.
///
/// # Error Semantics
///
/// Callers treat rejection as failure, never as silence: a failed
/// [`get_session`](Self::get_session) means "unknown", a failed
/// [`has_role`](Self::has_role) means "not confirmed". The session
/// layer maps both to their safe defaults.
pub trait IdentityProvider: Send + Sync {
    /// Returns the current session's identity, or `None` if nobody is
    /// signed in.
    fn get_session(&self) -> impl Future<Output = Result<Option<Identity>, RemoteError>> + Send;

    /// Returns whether `user_id` holds `role`.
    ///
    /// A single boolean fact with no side effects. The session layer
    /// wraps this in a hard timeout and fails closed.
    fn has_role(
        &self,
        user_id: &UserId,
        role: &str,
    ) -> impl Future<Output = Result<bool, RemoteError>> + Send;

    /// Subscribes to identity change notifications.
    ///
    /// Events sent after this call are buffered in the returned
    /// receiver even if it has not been polled yet.
    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent>;
}
