//! Authorization gate flows through the assembled back-office.

use serde_json::json;
use std::sync::Arc;
use vitrine_admin::{AdminConfig, Backoffice, Redirect};
use vitrine_remote::testing::{MemoryProvider, MemoryStore};
use vitrine_remote::ROLE_ADMIN;
use vitrine_session::{DenialReason, GateState};
use vitrine_types::{Identity, Severity, UserId};

fn identity(user: &str) -> Identity {
    Identity::new(UserId::new(user), format!("tok_{user}"))
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.seed(
        "project_cards",
        vec![json!({"id": "a", "title": "Alpha", "display_order": 0})],
    );
    store.seed(
        "sponsor_logos",
        vec![json!({"id": "s", "name": "Acme", "image_url": "https://x/a.png", "display_order": 0})],
    );
    Arc::new(store)
}

mod denied {
    use super::*;

    #[tokio::test]
    async fn visitor_without_session_is_sent_to_sign_in() {
        let store = seeded_store();
        let mut office = Backoffice::new(
            Arc::new(MemoryProvider::new()),
            Arc::clone(&store),
            &AdminConfig::default(),
        );

        let state = office.enter().await;

        assert_eq!(state, GateState::Denied(DenialReason::NotSignedIn));
        assert_eq!(office.redirect(), Some(Redirect::SignIn));
        // Nothing privileged was fetched.
        assert_eq!(store.list_count(), 0);
        assert!(office.cards().is_empty());
        assert!(office.sponsors().is_empty());
    }

    #[tokio::test]
    async fn signed_in_non_admin_is_sent_home_with_a_notice() {
        let store = seeded_store();
        let provider = Arc::new(MemoryProvider::signed_in(identity("visitor")));
        let mut office = Backoffice::new(provider, Arc::clone(&store), &AdminConfig::default());

        let state = office.enter().await;

        assert_eq!(state, GateState::Denied(DenialReason::NotAdmin));
        assert_eq!(office.redirect(), Some(Redirect::Home));
        assert_eq!(office.notices().len(), 1);
        assert_eq!(office.notices()[0].severity, Severity::Error);
        assert_eq!(store.list_count(), 0);
    }

    #[tokio::test]
    async fn re_entering_replays_the_decision_without_duplicates() {
        let store = seeded_store();
        let provider = Arc::new(MemoryProvider::signed_in(identity("visitor")));
        let mut office = Backoffice::new(provider, store, &AdminConfig::default());

        office.enter().await;
        office.enter().await;
        office.enter().await;

        assert_eq!(office.redirect(), Some(Redirect::Home));
        assert_eq!(office.notices().len(), 1);
    }

    #[tokio::test]
    async fn role_lookup_over_deadline_fails_closed() {
        let store = seeded_store();
        let provider = Arc::new(MemoryProvider::signed_in(identity("slow")));
        provider.grant_role(&UserId::new("slow"), ROLE_ADMIN);
        provider.set_role_delay(std::time::Duration::from_millis(200));

        // A zero-second deadline expires before any lookup returns.
        let config = AdminConfig::from_toml("[timeouts]\nrole_check_secs = 0\n").expect("config");
        let mut office = Backoffice::new(provider, Arc::clone(&store), &config);

        let state = office.enter().await;

        assert_eq!(state, GateState::Denied(DenialReason::NotAdmin));
        assert_eq!(store.list_count(), 0);
    }

    #[tokio::test]
    async fn unreachable_role_service_fails_closed() {
        let store = seeded_store();
        let provider = Arc::new(MemoryProvider::signed_in(identity("admin")));
        provider.grant_role(&UserId::new("admin"), ROLE_ADMIN);
        provider.set_fail_roles(true);

        let mut office = Backoffice::new(provider, Arc::clone(&store), &AdminConfig::default());

        assert_eq!(
            office.enter().await,
            GateState::Denied(DenialReason::NotAdmin)
        );
        assert_eq!(store.list_count(), 0);
    }
}

mod granted {
    use super::*;

    fn admin_provider(user: &str) -> Arc<MemoryProvider> {
        let provider = MemoryProvider::signed_in(identity(user));
        provider.grant_role(&UserId::new(user), ROLE_ADMIN);
        Arc::new(provider)
    }

    #[tokio::test]
    async fn administrator_reaches_the_collections() {
        let store = seeded_store();
        let mut office = Backoffice::new(
            admin_provider("admin"),
            Arc::clone(&store),
            &AdminConfig::default(),
        );

        let state = office.enter().await;

        assert_eq!(state, GateState::Granted);
        assert!(office.redirect().is_none());
        assert_eq!(office.cards().len(), 1);
        assert_eq!(office.sponsors().len(), 1);
        // One list per collection.
        assert_eq!(store.list_count(), 2);
    }

    #[tokio::test]
    async fn sign_out_clears_everything_before_returning() {
        let store = seeded_store();
        let mut office = Backoffice::new(
            admin_provider("admin"),
            Arc::clone(&store),
            &AdminConfig::default(),
        );
        office.enter().await;
        assert!(office.is_granted());

        office.sign_out();

        assert!(office.cards().is_empty());
        assert!(office.sponsors().is_empty());
        assert!(office.session().identity().is_none());
        assert_eq!(office.gate_state(), GateState::Checking);
    }

    #[tokio::test]
    async fn custom_collection_names_are_honored() {
        let store = MemoryStore::new();
        store.seed(
            "cards_v2",
            vec![json!({"id": "x", "title": "X", "display_order": 0})],
        );
        store.seed("logos_v2", vec![]);
        let config = AdminConfig::from_toml(
            "[collections]\ncards = \"cards_v2\"\nsponsors = \"logos_v2\"\n",
        )
        .expect("config");
        let mut office = Backoffice::new(admin_provider("admin"), Arc::new(store), &config);

        assert_eq!(office.enter().await, GateState::Granted);
        assert_eq!(office.cards().len(), 1);
        assert!(office.sponsors().is_empty());
    }
}
