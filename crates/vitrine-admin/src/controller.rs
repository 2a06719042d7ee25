//! Reorder controller: drag gestures to persisted order.
//!
//! [`ReorderController`] bridges the UI's drag events to an
//! [`OrderedCollection`] and the remote store:
//!
//! ```text
//! drag end ──► move_item (synchronous, optimistic) ──► re-render
//!                      │
//!                      └──► one write per changed record, concurrent
//!                                │
//!                     all ok ────┤──── any failure
//!                        │                │
//!                     commit          rollback + notice
//! ```
//!
//! The optimistic move happens strictly before any await: the UI never
//! waits on the network to reflect a reorder. Failure of any
//! constituent write fails the whole transaction; the controller
//! enforces all-or-nothing at the UI level by rolling the local view
//! back entirely rather than reconciling a partial order.
//!
//! Everything returns an outcome enum, never an error: failures become
//! notices the view can show and dismiss.

use crate::{LoadOutcome, OrderError, OrderedCollection, ReorderTransaction};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use vitrine_remote::{RemoteError, RemoteStore};
use vitrine_types::{ErrorCode, Notice, Orderable, RecordId, RecordPatch};

/// Outcome of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Nothing to do: dropped on itself, or an id the collection does
    /// not know.
    Noop,

    /// A previous transaction is still in flight; the gesture was
    /// rejected. The UI should disable drag while
    /// [`ReorderController::is_reordering`] is `true`.
    Busy,

    /// The new order is persisted.
    Committed,

    /// Persistence failed; the list snapped back to its prior order.
    /// The notice must be shown to the administrator.
    RolledBack(Notice),
}

/// Outcome of a listing refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fresh listing applied; carries the record count.
    Loaded(usize),

    /// A reorder was pending; the listing was discarded in favor of
    /// the optimistic state.
    KeptPending,

    /// The fetch or decode failed; the previously rendered list was
    /// retained. Never a destructive clear.
    Retained,
}

/// Outcome of a record deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Rejected while a reorder is in flight.
    Busy,

    /// The record is gone remotely and locally.
    Deleted,

    /// The remote refused; nothing changed locally.
    Failed(Notice),
}

/// Outcome of a visibility toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityOutcome {
    /// Persisted and mirrored locally.
    Applied,

    /// The remote refused; the local record is unchanged.
    Failed(Notice),
}

/// Drives one orderable collection: fetch, optimistic reorder with
/// rollback, deletion, visibility.
///
/// Owned by the single view that renders the collection. At most one
/// reorder transaction is in flight at a time; gestures arriving while
/// one is pending come back [`ReorderOutcome::Busy`].
pub struct ReorderController<S, T> {
    store: Arc<S>,
    collection_name: String,
    collection: OrderedCollection<T>,
}

impl<S, T> ReorderController<S, T>
where
    S: RemoteStore,
    T: Orderable + DeserializeOwned,
{
    /// Creates a controller for `collection_name` with an empty local
    /// mirror.
    #[must_use]
    pub fn new(store: Arc<S>, collection_name: impl Into<String>) -> Self {
        Self {
            store,
            collection_name: collection_name.into(),
            collection: OrderedCollection::new(),
        }
    }

    /// The records in render order.
    #[must_use]
    pub fn records(&self) -> &[T] {
        self.collection.records()
    }

    /// Returns `true` while a reorder transaction is in flight. The
    /// UI disables drag interaction while this holds.
    #[must_use]
    pub fn is_reordering(&self) -> bool {
        self.collection.is_pending()
    }

    /// Drops all local records. Used on sign-out.
    pub fn clear(&mut self) {
        self.collection.clear();
    }

    /// Fetches a fresh listing and loads it into the mirror.
    ///
    /// Fails soft: on fetch or decode failure the previously rendered
    /// list is retained and the failure is logged.
    pub async fn refresh(&mut self) -> FetchOutcome {
        let rows = match self.store.list(&self.collection_name).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    code = err.code(),
                    error = %err,
                    collection = %self.collection_name,
                    "listing fetch failed, retaining current list"
                );
                return FetchOutcome::Retained;
            }
        };

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<T>(row) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(
                        error = %err,
                        collection = %self.collection_name,
                        "listing row failed to decode, retaining current list"
                    );
                    return FetchOutcome::Retained;
                }
            }
        }

        match self.collection.load(records) {
            LoadOutcome::Applied => FetchOutcome::Loaded(self.collection.len()),
            LoadOutcome::IgnoredPending => FetchOutcome::KeptPending,
        }
    }

    /// Handles the end of a drag gesture.
    ///
    /// The target index is the destination record's current position.
    /// The local move is applied synchronously before any network
    /// call; persistence then runs one write per changed record, all
    /// concurrently, and any member failure rolls the whole move back.
    pub async fn on_drag_end(
        &mut self,
        source: &RecordId,
        destination: &RecordId,
    ) -> ReorderOutcome {
        if source == destination {
            return ReorderOutcome::Noop;
        }
        if self.collection.is_pending() {
            warn!(collection = %self.collection_name, "drag rejected: reorder already in flight");
            return ReorderOutcome::Busy;
        }
        let Some(target) = self.collection.index_of(destination) else {
            warn!(record = %destination, "drag destination is not in the collection");
            return ReorderOutcome::Noop;
        };

        let txn = match self.collection.move_item(source, target) {
            Ok(Some(txn)) => txn,
            Ok(None) => return ReorderOutcome::Noop,
            Err(OrderError::TransactionPending) => return ReorderOutcome::Busy,
            Err(err) => {
                warn!(code = err.code(), error = %err, "drag source rejected");
                return ReorderOutcome::Noop;
            }
        };

        // The optimistic state is already on screen; now persist it.
        self.persist(txn).await
    }

    async fn persist(&mut self, txn: ReorderTransaction) -> ReorderOutcome {
        let failure = self.write_orders(txn.changed()).await;
        match failure {
            None => {
                if let Err(err) = self.collection.commit(txn) {
                    warn!(code = err.code(), "commit refused a stale transaction");
                }
                debug!(collection = %self.collection_name, "reorder persisted");
                ReorderOutcome::Committed
            }
            Some(err) => {
                warn!(
                    code = err.code(),
                    error = %err,
                    collection = %self.collection_name,
                    "reorder persistence failed, rolling back"
                );
                if let Err(err) = self.collection.rollback(txn) {
                    warn!(code = err.code(), "rollback refused a stale transaction");
                }
                ReorderOutcome::RolledBack(Notice::error("Reordering failed, try again."))
            }
        }
    }

    /// Deletes a record: remote first, then the local mirror, then
    /// persists the dense renumbering of the remainder.
    ///
    /// Renumber writes that fail leave the remote orders sparse; they
    /// are logged and healed by the next successful reorder.
    pub async fn delete(&mut self, id: &RecordId) -> DeleteOutcome {
        if self.collection.is_pending() {
            return DeleteOutcome::Busy;
        }
        if let Err(err) = self.store.delete(&self.collection_name, id).await {
            warn!(
                code = err.code(),
                error = %err,
                record = %id,
                "remote delete failed"
            );
            return DeleteOutcome::Failed(Notice::error("Deleting failed, try again."));
        }

        let before = self.collection.order_snapshot();
        match self.collection.remove(id) {
            Ok(_) => {}
            Err(err) => {
                warn!(code = err.code(), record = %id, "deleted record missing from local mirror");
                return DeleteOutcome::Deleted;
            }
        }

        let changed: Vec<_> = self
            .collection
            .order_snapshot()
            .into_iter()
            .filter(|(rid, order)| {
                before
                    .iter()
                    .any(|(prev_id, prev_order)| prev_id == rid && prev_order != order)
            })
            .collect();
        if let Some(err) = self.write_orders(changed).await {
            warn!(
                code = err.code(),
                error = %err,
                "failed to persist renumbering after delete"
            );
        }
        DeleteOutcome::Deleted
    }

    /// Shows or hides a record. Remote first; the local mirror only
    /// changes once the write is accepted.
    pub async fn set_visibility(&mut self, id: &RecordId, visible: bool) -> VisibilityOutcome {
        match self
            .store
            .update(&self.collection_name, id, RecordPatch::visibility(visible))
            .await
        {
            Ok(()) => {
                if let Some(record) = self.collection.record_mut(id) {
                    record.set_visible(visible);
                }
                VisibilityOutcome::Applied
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, record = %id, "visibility write failed");
                VisibilityOutcome::Failed(Notice::error(
                    "Updating visibility failed, try again.",
                ))
            }
        }
    }

    /// Issues one order write per pair, all concurrently. Returns the
    /// first failure, if any.
    async fn write_orders(&self, pairs: Vec<(RecordId, u32)>) -> Option<RemoteError> {
        let writes = pairs.iter().map(|(id, order)| {
            self.store
                .update(&self.collection_name, id, RecordPatch::order(*order))
        });
        join_all(writes)
            .await
            .into_iter()
            .find_map(Result::err)
    }
}
