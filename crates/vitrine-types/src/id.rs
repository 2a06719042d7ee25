//! Identifier types for Vitrine.
//!
//! Remote-minted identifiers ([`UserId`], [`RecordId`]) are opaque
//! strings: the remote store owns their format and the core only needs
//! stability and equality. Locally minted identifiers ([`NoticeId`],
//! [`TransactionId`]) are UUID v4.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for the authenticated user.
///
/// Minted by the identity provider and treated as opaque: the core
/// never parses it, only compares it and hands it back for role
/// lookups.
///
/// # Example
///
/// ```
/// use vitrine_types::UserId;
///
/// let a = UserId::new("usr_181");
/// let b = UserId::new("usr_181");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "usr_181");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a [`UserId`] from a provider-supplied string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Identifier for an orderable record (project card, sponsor logo).
///
/// Minted by the remote store; stable and unique within a collection.
/// The reorder core keys every transaction snapshot on these, so they
/// must never change across a record's lifetime.
///
/// # Example
///
/// ```
/// use vitrine_types::RecordId;
///
/// let id = RecordId::new("card_07");
/// assert_eq!(id.as_str(), "card_07");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a [`RecordId`] from a store-supplied string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

/// Identifier for a user-visible notice.
///
/// Random per notice so the UI can dismiss a specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeId(pub Uuid);

impl NoticeId {
    /// Creates a new [`NoticeId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoticeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoticeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notice:{}", self.0)
    }
}

/// Identifier for a reorder transaction.
///
/// A collection accepts `commit`/`rollback` only for the transaction
/// it currently has pending; the id is how stale or foreign
/// transactions are refused.
///
/// # Example
///
/// ```
/// use vitrine_types::TransactionId;
///
/// let a = TransactionId::new();
/// let b = TransactionId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

#[allow(clippy::new_without_default)] // Default intentionally not implemented - ids are minted by OrderedCollection::move_item
impl TransactionId {
    /// Creates a new [`TransactionId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}
