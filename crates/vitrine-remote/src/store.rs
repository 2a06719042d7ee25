//! Remote store abstraction.
//!
//! The [`RemoteStore`] trait is the CRUD half of the remote boundary.
//! Rows travel as [`serde_json::Value`]; the layer that owns a
//! collection decodes them into its record type. This keeps the
//! boundary agnostic to wire format and schema, and matches how the
//! store itself is schema-light.

use crate::RemoteError;
use serde_json::Value;
use std::future::Future;
use vitrine_types::{RecordId, RecordPatch};

/// CRUD half of the remote boundary.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// async tasks.
///
/// # Ordering Contract
///
/// [`list`](Self::list) returns rows ordered by their `display_order`
/// field, ascending. The store is the source of truth for order; the
/// core's collections are mirrors.
///
/// # Write Granularity
///
/// [`update`](Self::update) patches a single row. Reorder persistence
/// fans out one update per affected record and treats any member
/// failure as failure of the whole batch; that policy lives in the
/// controller, not here.
pub trait RemoteStore: Send + Sync {
    /// Lists all rows of `collection`, ordered by `display_order`
    /// ascending.
    fn list(&self, collection: &str)
        -> impl Future<Output = Result<Vec<Value>, RemoteError>> + Send;

    /// Applies `patch` to the row with `id` in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if the row does not exist.
    fn update(
        &self,
        collection: &str,
        id: &RecordId,
        patch: RecordPatch,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Deletes the row with `id` from `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if the row does not exist.
    fn delete(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
