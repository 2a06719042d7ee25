//! Session cache and authorization gate.
//!
//! This crate decides whether a visitor may reach the administrative
//! surface:
//!
//! - [`SessionStore`] is the single source of truth for "who is the
//!   current user, and are they an admin". It caches the identity,
//!   subscribes to provider change events, and performs the
//!   fail-closed admin role lookup.
//! - [`AuthGate`] is the per-view state machine on top of it:
//!   `Checking` until the facts are in, then terminally `Denied` or
//!   `Granted`.
//!
//! # Ordering Guarantees
//!
//! ```text
//! mount
//!   ├── 1. attach()   subscribe to identity events, spawn listener
//!   └── 2. refresh()  initial fetch, seeds only if no event won first
//! ```
//!
//! The listener is wired *before* the initial fetch is issued, so a
//! change event racing the fetch is never lost. Reconciliation is
//! first-writer-wins within the mount: a write-epoch counter on the
//! session slot, not a flag read. Listener events always apply and
//! bump the epoch; the initial fetch seeds only while the epoch is
//! still zero.
//!
//! # Failure Policy
//!
//! Nothing here throws into the view layer. Identity reads fail soft
//! (absent), role checks fail closed (not admin, hard 3 second
//! deadline by default), and every such downgrade is logged via
//! `tracing`.

mod error;
mod gate;
mod store;

pub use error::SessionError;
pub use gate::{AuthGate, DenialReason, GateDecision, GateState};
pub use store::{SessionConfig, SessionStore, SessionSubscription};
