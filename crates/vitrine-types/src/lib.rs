//! Core types for the Vitrine back-office.
//!
//! Vitrine is the administrative core of a personal portfolio site: a
//! session/authorization gate in front of the back-office, and an
//! optimistic reordering layer for the lists an administrator can
//! drag-reorder (project cards, sponsor logos).
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Foundation Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vitrine-types   : IDs, Identity, records, ErrorCode ◄── HERE│
//! │  vitrine-remote  : RemoteStore / IdentityProvider boundary   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Core Layer                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vitrine-session : SessionStore, AuthGate                    │
//! │  vitrine-admin   : OrderedCollection, ReorderController,     │
//! │                    Backoffice                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate carries no behavior beyond the types themselves: identity
//! is separated from authorization logic, records are separated from
//! the collections that order them, and errors share the [`ErrorCode`]
//! contract so every layer reports failures the same way.
//!
//! # Identifier Design
//!
//! User and record identifiers are **opaque strings**: they are minted
//! by the remote store and must survive round-trips through it
//! unchanged, so nothing here assumes a UUID shape. Locally minted
//! identifiers (notices, reorder transactions) are UUID v4.
//!
//! # Example
//!
//! ```
//! use vitrine_types::{AuthStatus, Identity, RecordId, UserId};
//!
//! let identity = Identity::new(UserId::new("usr_181"), "tok_a1b2");
//! assert_eq!(identity.user_id.as_str(), "usr_181");
//!
//! // Authorization is a derived fact, never assumed.
//! assert!(!AuthStatus::Unknown.is_admin());
//! assert!(AuthStatus::Admin.is_admin());
//!
//! let card = RecordId::new("card_07");
//! assert_eq!(card.as_str(), "card_07");
//! ```

mod error;
mod id;
mod identity;
mod notice;
mod record;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{NoticeId, RecordId, TransactionId, UserId};
pub use identity::{AuthStatus, Identity, IdentityEvent};
pub use notice::{Notice, Severity};
pub use record::{Orderable, ProjectCard, RecordPatch, SponsorLogo};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_carries_opaque_ids() {
        let id = Identity::new(UserId::new("usr_1"), "token");
        assert_eq!(id.user_id, UserId::new("usr_1"));
        assert_eq!(id.token, "token");
    }

    #[test]
    fn auth_status_is_admin_only_for_admin() {
        assert!(AuthStatus::Admin.is_admin());
        assert!(!AuthStatus::NonAdmin.is_admin());
        assert!(!AuthStatus::Unauthenticated.is_admin());
        assert!(!AuthStatus::Unknown.is_admin());
    }

    #[test]
    fn record_ids_compare_by_value() {
        assert_eq!(RecordId::new("a"), RecordId::new("a"));
        assert_ne!(RecordId::new("a"), RecordId::new("b"));
    }

    #[test]
    fn transaction_ids_are_unique() {
        assert_ne!(TransactionId::new(), TransactionId::new());
    }
}
