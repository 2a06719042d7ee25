//! Authorization gate for the administrative surface.
//!
//! One [`AuthGate`] guards one mounted protected view. It starts in
//! `Checking`, resolves to `Denied` or `Granted` exactly once, and
//! stays there for the lifetime of the view; a fresh mount gets a
//! fresh gate.
//!
//! ```text
//!              ┌──────────┐
//!              │ Checking │  (initial, pending)
//!              └────┬─────┘
//!        identity absent │ role != true        role == true
//!       ┌────────────────┴────────────────┐
//!       ▼                                 ▼
//! ┌──────────┐                      ┌──────────┐
//! │  Denied  │                      │ Granted  │
//! └──────────┘                      └──────────┘
//!   (terminal)                       (terminal)
//! ```
//!
//! The protected view must not fetch any administrative data before
//! `Granted`; fetching earlier would leak the existence of
//! administrative collections to unauthorized callers. That gating is
//! enforced by the back-office assembly, which checks
//! [`AuthGate::is_granted`] before every listing fetch.

use crate::SessionStore;
use tracing::{debug, info};
use vitrine_remote::IdentityProvider;
use vitrine_types::Notice;

/// Why the gate denied access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No identity present; the visitor must sign in.
    NotSignedIn,

    /// Identity present, admin role not confirmed.
    NotAdmin,
}

/// Gate state. `Checking` is initial; the other two are terminal for
/// the lifetime of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Facts not yet in. The view renders an intermediate state and
    /// fetches nothing.
    Checking,

    /// Access refused.
    Denied(DenialReason),

    /// Access confirmed; the protected view may fetch its data.
    Granted,
}

/// What the view should do once the gate has resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Send the visitor to the sign-in page.
    RedirectToSignIn,

    /// Send the visitor home, carrying an access-denied notice.
    RedirectHome(Notice),

    /// Render the administrative surface.
    RenderAdmin,
}

/// Per-view authorization state machine.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vitrine_remote::testing::MemoryProvider;
/// use vitrine_session::{AuthGate, GateDecision, GateState, SessionStore};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let store = Arc::new(SessionStore::new(Arc::new(MemoryProvider::new())));
/// let mut gate = AuthGate::new();
/// assert_eq!(gate.state(), GateState::Checking);
///
/// // Nobody signed in: denied, redirect to sign-in.
/// let decision = gate.resolve(&store).await;
/// assert_eq!(decision, GateDecision::RedirectToSignIn);
/// assert!(!gate.is_granted());
/// # });
/// ```
#[derive(Debug)]
pub struct AuthGate {
    state: GateState,
    decision: Option<GateDecision>,
}

impl AuthGate {
    /// Creates a gate in `Checking`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: GateState::Checking,
            decision: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Returns `true` once access has been confirmed.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self.state, GateState::Granted)
    }

    /// Returns `true` until [`resolve`](Self::resolve) has completed
    /// once.
    #[must_use]
    pub fn is_checking(&self) -> bool {
        matches!(self.state, GateState::Checking)
    }

    /// Runs the entry checks and resolves the gate.
    ///
    /// The decision is computed exactly once; repeat calls return the
    /// cached decision without touching the provider again. While this
    /// future is pending the gate reports `Checking`.
    ///
    /// Entry sequence per the route contract: read the store; if the
    /// identity is absent, fetch it once; if still absent, deny with a
    /// sign-in redirect. Otherwise run the fail-closed role check and
    /// grant only on a confirmed `true`.
    pub async fn resolve<P>(&mut self, store: &SessionStore<P>) -> GateDecision
    where
        P: IdentityProvider + 'static,
    {
        if let Some(decision) = &self.decision {
            debug!("gate already resolved, returning cached decision");
            return decision.clone();
        }

        let identity = match store.identity() {
            Some(identity) => Some(identity),
            None => store.refresh().await,
        };

        let decision = match identity {
            None => {
                info!("gate denied: no identity");
                self.state = GateState::Denied(DenialReason::NotSignedIn);
                GateDecision::RedirectToSignIn
            }
            Some(identity) => {
                if store.check_admin_role(&identity.user_id).await {
                    info!(user = %identity.user_id, "gate granted");
                    self.state = GateState::Granted;
                    GateDecision::RenderAdmin
                } else {
                    info!(user = %identity.user_id, "gate denied: not an admin");
                    self.state = GateState::Denied(DenialReason::NotAdmin);
                    GateDecision::RedirectHome(Notice::error(
                        "You need administrator access to view this page.",
                    ))
                }
            }
        };
        self.decision = Some(decision.clone());
        decision
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}
