//! Portfolio back-office core.
//!
//! The pieces of the admin surface that are worth getting exactly
//! right: ordered collections with optimistic drag-reorder and
//! all-or-nothing rollback, and their assembly behind the
//! authorization gate.
//!
//! # Layers
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`collection`] | Dense ordering, reorder transactions |
//! | [`controller`] | Optimistic persistence, fetch, delete, visibility |
//! | [`backoffice`] | Gate-fronted assembly, notices, redirects |
//! | [`config`] | TOML configuration |
//!
//! # Reorder lifecycle
//!
//! ```text
//! drag end
//!   └─► OrderedCollection::move_item   (synchronous, on-screen at once)
//!         └─► ReorderController::persist   (concurrent order writes)
//!               ├─ all ok ──► commit
//!               └─ any err ─► rollback + "Reordering failed, try again."
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use vitrine_admin::{AdminConfig, Backoffice};
//! use vitrine_remote::testing::{MemoryProvider, MemoryStore};
//! use vitrine_remote::ROLE_ADMIN;
//! use vitrine_session::GateState;
//! use vitrine_types::{Identity, UserId};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let provider = MemoryProvider::signed_in(Identity::new(UserId::new("u1"), "tok"));
//! provider.grant_role(&UserId::new("u1"), ROLE_ADMIN);
//! let store = MemoryStore::new();
//! store.seed("project_cards", vec![
//!     json!({"id": "c0", "title": "First", "display_order": 0}),
//! ]);
//!
//! let mut office = Backoffice::new(Arc::new(provider), Arc::new(store), &AdminConfig::default());
//! assert_eq!(office.enter().await, GateState::Granted);
//! assert_eq!(office.cards()[0].title, "First");
//! # });
//! ```

pub mod backoffice;
pub mod collection;
pub mod config;
pub mod controller;
pub mod error;

pub use backoffice::{Backoffice, Redirect, RefreshOutcome};
pub use collection::{LoadOutcome, OrderSnapshot, OrderedCollection, ReorderTransaction};
pub use config::{AdminConfig, CollectionsConfig, TimeoutsConfig};
pub use controller::{
    DeleteOutcome, FetchOutcome, ReorderController, ReorderOutcome, VisibilityOutcome,
};
pub use error::OrderError;
