//! Remote sync boundary for Vitrine.
//!
//! Everything the core knows about the outside world crosses this
//! crate's two traits:
//!
//! - [`IdentityProvider`] — who is signed in, role lookups, and a
//!   change-notification subscription
//! - [`RemoteStore`] — row CRUD on sort-keyed collections
//!
//! The remote store is the source of truth; the core keeps caches and
//! optimistic mirrors on this side of the boundary and reconciles
//! through these traits only. No wire format or transport is assumed:
//! rows travel as [`serde_json::Value`] and typed decoding happens in
//! the layer that owns the records.
//!
//! # Test Doubles
//!
//! The [`testing`] module provides [`MemoryProvider`](testing::MemoryProvider)
//! and [`MemoryStore`](testing::MemoryStore), in-memory implementations
//! with failure and delay injection, so the session and admin layers
//! can be exercised without any real backend.

mod error;
mod provider;
mod store;
pub mod testing;

pub use error::RemoteError;
pub use provider::{IdentityProvider, ROLE_ADMIN};
pub use store::RemoteStore;
