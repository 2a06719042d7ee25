//! The admin surface, assembled.
//!
//! [`Backoffice`] wires one [`SessionStore`] + [`AuthGate`] to the two
//! reorder controllers (project cards and sponsor logos):
//!
//! ```text
//! enter()
//!   ├─ mount session (listener first, then fetch)
//!   ├─ resolve gate ── Denied ──► redirect (+ notice if non-admin)
//!   │                     │
//!   │                  Granted
//!   │                     │
//!   └─────────────────────┴──► refresh cards + sponsors
//! ```
//!
//! No collection is fetched, and no mutation accepted, until the gate
//! is granted. Signing out clears every piece of admin state in the
//! same call, before any network round-trip.

use crate::{
    AdminConfig, DeleteOutcome, FetchOutcome, ReorderController, ReorderOutcome,
    VisibilityOutcome,
};
use std::sync::Arc;
use tracing::{info, warn};
use vitrine_remote::{IdentityProvider, RemoteStore};
use vitrine_session::{AuthGate, GateDecision, GateState, SessionStore, SessionSubscription};
use vitrine_types::{ErrorCode, Notice, NoticeId, ProjectCard, RecordId, SponsorLogo};

/// Where a denied visitor is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// To the sign-in page (no identity).
    SignIn,
    /// To the public home page (signed in, not an administrator).
    Home,
}

/// Outcome of a gated collection refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The gate has not granted access; nothing was fetched.
    NotAuthorized,
    /// The fetch ran; see the inner outcome.
    Done(FetchOutcome),
}

/// The whole admin state: session, gate, collections, notices.
///
/// One instance per admin view mount. Generic over the identity
/// provider and the record store so tests run against the in-memory
/// doubles.
pub struct Backoffice<P, S> {
    session: Arc<SessionStore<P>>,
    subscription: Option<SessionSubscription>,
    gate: AuthGate,
    cards: ReorderController<S, ProjectCard>,
    sponsors: ReorderController<S, SponsorLogo>,
    notices: Vec<Notice>,
    redirect: Option<Redirect>,
}

impl<P, S> Backoffice<P, S>
where
    P: IdentityProvider + 'static,
    S: RemoteStore,
{
    /// Builds the back-office against `provider` and `store`.
    #[must_use]
    pub fn new(provider: Arc<P>, store: Arc<S>, config: &AdminConfig) -> Self {
        let session = Arc::new(SessionStore::with_config(
            provider,
            config.session_config(),
        ));
        Self {
            session,
            subscription: None,
            gate: AuthGate::new(),
            cards: ReorderController::new(Arc::clone(&store), config.collections.cards.clone()),
            sponsors: ReorderController::new(store, config.collections.sponsors.clone()),
            notices: Vec::new(),
            redirect: None,
        }
    }

    /// The session store, for status display.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore<P>> {
        &self.session
    }

    /// Current gate state.
    #[must_use]
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Returns `true` once the gate has granted access.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.gate.is_granted()
    }

    /// The pending redirect, if one was decided.
    #[must_use]
    pub fn redirect(&self) -> Option<Redirect> {
        self.redirect
    }

    /// Notices awaiting display, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Removes one notice, typically after the user dismissed it.
    pub fn dismiss_notice(&mut self, id: NoticeId) {
        self.notices.retain(|notice| notice.id != id);
    }

    /// The project cards in render order.
    #[must_use]
    pub fn cards(&self) -> &[ProjectCard] {
        self.cards.records()
    }

    /// The sponsor logos in render order.
    #[must_use]
    pub fn sponsors(&self) -> &[SponsorLogo] {
        self.sponsors.records()
    }

    /// Returns `true` while either collection has a reorder in flight.
    #[must_use]
    pub fn is_reordering(&self) -> bool {
        self.cards.is_reordering() || self.sponsors.is_reordering()
    }

    /// Mounts the admin view: session mount, gate resolution, and, on
    /// a grant, the initial collection fetches.
    ///
    /// The gate's decision is computed once; re-entering replays it
    /// without new role lookups. The redirect, if any, is recorded at
    /// most once per mount.
    pub async fn enter(&mut self) -> GateState {
        if self.subscription.is_none() {
            match self.session.mount().await {
                Ok(subscription) => self.subscription = Some(subscription),
                Err(err) => warn!(code = err.code(), error = %err, "session mount failed"),
            }
        } else {
            let _ = self.session.refresh().await;
        }

        match self.gate.resolve(&self.session).await {
            GateDecision::RenderAdmin => {
                self.refresh_cards().await;
                self.refresh_sponsors().await;
            }
            GateDecision::RedirectToSignIn => {
                if self.redirect.is_none() {
                    self.redirect = Some(Redirect::SignIn);
                }
            }
            GateDecision::RedirectHome(notice) => {
                if self.redirect.is_none() {
                    self.redirect = Some(Redirect::Home);
                    self.notices.push(notice);
                }
            }
        }
        self.gate.state()
    }

    /// Refetches the project cards. Refused before the gate grants.
    pub async fn refresh_cards(&mut self) -> RefreshOutcome {
        if !self.gate.is_granted() {
            warn!("refusing card fetch before access is granted");
            return RefreshOutcome::NotAuthorized;
        }
        RefreshOutcome::Done(self.cards.refresh().await)
    }

    /// Refetches the sponsor logos. Refused before the gate grants.
    pub async fn refresh_sponsors(&mut self) -> RefreshOutcome {
        if !self.gate.is_granted() {
            warn!("refusing sponsor fetch before access is granted");
            return RefreshOutcome::NotAuthorized;
        }
        RefreshOutcome::Done(self.sponsors.refresh().await)
    }

    /// Drag-reorders the project cards. A rollback's notice lands in
    /// the notice queue.
    pub async fn reorder_cards(
        &mut self,
        source: &RecordId,
        destination: &RecordId,
    ) -> ReorderOutcome {
        if !self.gate.is_granted() {
            warn!("refusing card reorder before access is granted");
            return ReorderOutcome::Noop;
        }
        let outcome = self.cards.on_drag_end(source, destination).await;
        if let ReorderOutcome::RolledBack(notice) = &outcome {
            self.notices.push(notice.clone());
        }
        outcome
    }

    /// Drag-reorders the sponsor logos.
    pub async fn reorder_sponsors(
        &mut self,
        source: &RecordId,
        destination: &RecordId,
    ) -> ReorderOutcome {
        if !self.gate.is_granted() {
            warn!("refusing sponsor reorder before access is granted");
            return ReorderOutcome::Noop;
        }
        let outcome = self.sponsors.on_drag_end(source, destination).await;
        if let ReorderOutcome::RolledBack(notice) = &outcome {
            self.notices.push(notice.clone());
        }
        outcome
    }

    /// Deletes a project card.
    pub async fn delete_card(&mut self, id: &RecordId) -> DeleteOutcome {
        if !self.gate.is_granted() {
            warn!("refusing card delete before access is granted");
            return DeleteOutcome::Failed(Notice::error("You are not signed in as an administrator."));
        }
        let outcome = self.cards.delete(id).await;
        if let DeleteOutcome::Failed(notice) = &outcome {
            self.notices.push(notice.clone());
        }
        outcome
    }

    /// Deletes a sponsor logo.
    pub async fn delete_sponsor(&mut self, id: &RecordId) -> DeleteOutcome {
        if !self.gate.is_granted() {
            warn!("refusing sponsor delete before access is granted");
            return DeleteOutcome::Failed(Notice::error("You are not signed in as an administrator."));
        }
        let outcome = self.sponsors.delete(id).await;
        if let DeleteOutcome::Failed(notice) = &outcome {
            self.notices.push(notice.clone());
        }
        outcome
    }

    /// Shows or hides a project card on the public surface.
    pub async fn set_card_visibility(
        &mut self,
        id: &RecordId,
        visible: bool,
    ) -> VisibilityOutcome {
        if !self.gate.is_granted() {
            warn!("refusing visibility change before access is granted");
            return VisibilityOutcome::Failed(Notice::error(
                "You are not signed in as an administrator.",
            ));
        }
        let outcome = self.cards.set_visibility(id, visible).await;
        if let VisibilityOutcome::Failed(notice) = &outcome {
            self.notices.push(notice.clone());
        }
        outcome
    }

    /// Shows or hides a sponsor logo on the public surface.
    pub async fn set_sponsor_visibility(
        &mut self,
        id: &RecordId,
        visible: bool,
    ) -> VisibilityOutcome {
        if !self.gate.is_granted() {
            warn!("refusing visibility change before access is granted");
            return VisibilityOutcome::Failed(Notice::error(
                "You are not signed in as an administrator.",
            ));
        }
        let outcome = self.sponsors.set_visibility(id, visible).await;
        if let VisibilityOutcome::Failed(notice) = &outcome {
            self.notices.push(notice.clone());
        }
        outcome
    }

    /// Signs out. Identity, authorization, collections, and the gate
    /// are all cleared in this call, before any network round-trip;
    /// the view has nothing privileged left to render by the time it
    /// returns.
    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.cards.clear();
        self.sponsors.clear();
        self.gate = AuthGate::new();
        self.redirect = None;
        info!("signed out, admin state cleared");
        self.notices.push(Notice::info("Signed out."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrine_remote::testing::{MemoryProvider, MemoryStore};
    use vitrine_remote::ROLE_ADMIN;
    use vitrine_types::{Identity, Severity, UserId};

    fn identity(user: &str) -> Identity {
        Identity::new(UserId::new(user), format!("tok_{user}"))
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.seed(
            "project_cards",
            vec![
                json!({"id": "a", "title": "A", "display_order": 0}),
                json!({"id": "b", "title": "B", "display_order": 1}),
            ],
        );
        store.seed(
            "sponsor_logos",
            vec![json!({"id": "s1", "name": "Acme", "image_url": "https://x/a.png", "display_order": 0})],
        );
        Arc::new(store)
    }

    fn admin_provider(user: &str) -> Arc<MemoryProvider> {
        let provider = MemoryProvider::signed_in(identity(user));
        provider.grant_role(&UserId::new(user), ROLE_ADMIN);
        Arc::new(provider)
    }

    async fn granted_backoffice() -> (Arc<MemoryStore>, Backoffice<MemoryProvider, MemoryStore>) {
        let store = seeded_store();
        let mut office = Backoffice::new(
            admin_provider("u1"),
            Arc::clone(&store),
            &AdminConfig::default(),
        );
        assert_eq!(office.enter().await, GateState::Granted);
        (store, office)
    }

    #[tokio::test]
    async fn admin_enter_grants_and_loads_collections() {
        let (_store, office) = granted_backoffice().await;
        assert_eq!(office.cards().len(), 2);
        assert_eq!(office.sponsors().len(), 1);
        assert!(office.redirect().is_none());
    }

    #[tokio::test]
    async fn unauthenticated_enter_redirects_to_sign_in_without_fetching() {
        let store = seeded_store();
        let mut office = Backoffice::new(
            Arc::new(MemoryProvider::new()),
            Arc::clone(&store),
            &AdminConfig::default(),
        );

        let state = office.enter().await;

        assert!(matches!(state, GateState::Denied(_)));
        assert_eq!(office.redirect(), Some(Redirect::SignIn));
        assert_eq!(store.list_count(), 0);
        assert!(office.cards().is_empty());
    }

    #[tokio::test]
    async fn non_admin_enter_redirects_home_with_notice_once() {
        let store = seeded_store();
        let provider = Arc::new(MemoryProvider::signed_in(identity("u1")));
        let mut office = Backoffice::new(provider, Arc::clone(&store), &AdminConfig::default());

        office.enter().await;
        office.enter().await; // replayed decision, no second notice

        assert_eq!(office.redirect(), Some(Redirect::Home));
        assert_eq!(office.notices().len(), 1);
        assert_eq!(office.notices()[0].severity, Severity::Error);
        assert_eq!(store.list_count(), 0);
    }

    #[tokio::test]
    async fn mutations_refused_before_grant() {
        let store = seeded_store();
        let mut office = Backoffice::new(
            Arc::new(MemoryProvider::new()),
            Arc::clone(&store),
            &AdminConfig::default(),
        );
        office.enter().await;

        let outcome = office
            .reorder_cards(&RecordId::new("b"), &RecordId::new("a"))
            .await;

        assert_eq!(outcome, ReorderOutcome::Noop);
        assert_eq!(
            office.refresh_cards().await,
            RefreshOutcome::NotAuthorized
        );
        assert!(store.write_log().is_empty());
    }

    #[tokio::test]
    async fn rolled_back_reorder_queues_its_notice() {
        let (store, mut office) = granted_backoffice().await;
        store.set_fail_updates(true);

        let outcome = office
            .reorder_cards(&RecordId::new("b"), &RecordId::new("a"))
            .await;

        assert!(matches!(outcome, ReorderOutcome::RolledBack(_)));
        assert_eq!(office.notices().len(), 1);
        assert_eq!(office.notices()[0].message, "Reordering failed, try again.");
    }

    #[tokio::test]
    async fn dismiss_removes_one_notice() {
        let (store, mut office) = granted_backoffice().await;
        store.set_fail_updates(true);
        office
            .reorder_cards(&RecordId::new("b"), &RecordId::new("a"))
            .await;

        let id = office.notices()[0].id;
        office.dismiss_notice(id);

        assert!(office.notices().is_empty());
    }

    #[tokio::test]
    async fn sign_out_clears_admin_state_synchronously() {
        let (_store, mut office) = granted_backoffice().await;
        assert!(!office.cards().is_empty());

        office.sign_out();

        assert!(office.cards().is_empty());
        assert!(office.sponsors().is_empty());
        assert!(office.session().identity().is_none());
        assert!(office.gate_state() == GateState::Checking);
        assert!(office
            .notices()
            .iter()
            .any(|n| n.severity == Severity::Info));
    }

    #[tokio::test]
    async fn visibility_toggle_reaches_the_store() {
        let (store, mut office) = granted_backoffice().await;

        let outcome = office.set_card_visibility(&RecordId::new("a"), false).await;

        assert_eq!(outcome, VisibilityOutcome::Applied);
        assert_eq!(store.raw_rows("project_cards")[0]["visible"], false);
    }
}
