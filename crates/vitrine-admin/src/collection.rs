//! Locally-ordered mirror of a remote sort-keyed collection.
//!
//! [`OrderedCollection`] holds the records a view renders, in render
//! order, with at most one reorder transaction pending at a time. The
//! remote store stays the source of truth; this is a cache with one
//! optimistic edit in flight.
//!
//! # Normalization Rule
//!
//! After any move, `display_order` equals the record's index in the
//! new sequence: dense, zero-based, no gaps. Repeated moves can never
//! accumulate gap or float drift because the whole sequence is
//! renumbered every time.

use crate::OrderError;
use tracing::debug;
use vitrine_types::{Orderable, RecordId, TransactionId};

/// Snapshot of `(id, display_order)` pairs, in sequence order.
pub type OrderSnapshot = Vec<(RecordId, u32)>;

/// The previous/proposed ordering pair for one optimistic reorder.
///
/// Created by [`OrderedCollection::move_item`], consumed by exactly
/// one of [`commit`](OrderedCollection::commit) or
/// [`rollback`](OrderedCollection::rollback).
#[derive(Debug, Clone)]
pub struct ReorderTransaction {
    id: TransactionId,
    previous: OrderSnapshot,
    proposed: OrderSnapshot,
}

impl ReorderTransaction {
    /// Transaction identity.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Ordering before the move, verbatim.
    #[must_use]
    pub fn previous(&self) -> &OrderSnapshot {
        &self.previous
    }

    /// Ordering after the move, dense `0..n-1`.
    #[must_use]
    pub fn proposed(&self) -> &OrderSnapshot {
        &self.proposed
    }

    /// The `(id, display_order)` pairs whose order actually changed.
    ///
    /// Persistence only needs to write these.
    #[must_use]
    pub fn changed(&self) -> OrderSnapshot {
        self.proposed
            .iter()
            .filter(|(id, order)| {
                match self.previous.iter().find(|(prev_id, _)| prev_id == id) {
                    Some((_, prev_order)) => prev_order != order,
                    None => true,
                }
            })
            .cloned()
            .collect()
    }
}

/// Outcome of [`OrderedCollection::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fresh listing replaced the local sequence.
    Applied,

    /// A reorder is pending; the stale listing was ignored. The
    /// in-flight optimistic state wins over a concurrently completing
    /// fetch.
    IgnoredPending,
}

/// An ordered sequence of records mirroring remote state, plus one
/// optional pending reorder.
///
/// # Example
///
/// ```
/// use vitrine_admin::OrderedCollection;
/// use vitrine_types::{Orderable, ProjectCard, RecordId};
///
/// let mut cards = OrderedCollection::new();
/// cards.load(vec![
///     ProjectCard::new(RecordId::new("a"), "A", 0),
///     ProjectCard::new(RecordId::new("b"), "B", 1),
///     ProjectCard::new(RecordId::new("c"), "C", 2),
/// ]);
///
/// // Drag C to the front.
/// let txn = cards
///     .move_item(&RecordId::new("c"), 0)
///     .expect("valid move")
///     .expect("order changed");
/// let ids: Vec<_> = cards.records().iter().map(|c| c.id.as_str()).collect();
/// assert_eq!(ids, ["c", "a", "b"]);
///
/// // Roll it back.
/// cards.rollback(txn).expect("pending transaction");
/// let ids: Vec<_> = cards.records().iter().map(|c| c.id.as_str()).collect();
/// assert_eq!(ids, ["a", "b", "c"]);
/// ```
#[derive(Debug)]
pub struct OrderedCollection<T> {
    records: Vec<T>,
    pending: Option<TransactionId>,
}

impl<T: Orderable> OrderedCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            pending: None,
        }
    }

    /// The records in render order.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no records are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` while a reorder transaction is uncommitted.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Current index of `id`, if present.
    #[must_use]
    pub fn index_of(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Mutable access to one record, for field edits that do not
    /// change ordering (visibility toggles).
    pub fn record_mut(&mut self, id: &RecordId) -> Option<&mut T> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    /// Current `(id, display_order)` pairs in sequence order.
    #[must_use]
    pub fn order_snapshot(&self) -> OrderSnapshot {
        self.records
            .iter()
            .map(|record| (record.id().clone(), record.display_order()))
            .collect()
    }

    /// Replaces the local sequence with a fresh remote listing.
    ///
    /// Sorted by `display_order` on the way in; the store promises
    /// ascending order but the mirror does not depend on it. If a
    /// reorder is pending the listing is ignored: the optimistic state
    /// must not be overwritten by a stale fetch result.
    pub fn load(&mut self, mut records: Vec<T>) -> LoadOutcome {
        if let Some(txn) = self.pending {
            debug!(%txn, "ignoring fetched listing while a reorder is pending");
            return LoadOutcome::IgnoredPending;
        }
        records.sort_by_key(Orderable::display_order);
        self.records = records;
        LoadOutcome::Applied
    }

    /// Moves `id` to `target_index` and renumbers the whole sequence
    /// densely.
    ///
    /// Returns `Ok(None)` for a move to the record's own position:
    /// nothing changes and no transaction is opened. A successful move
    /// is applied immediately (optimistic) and leaves the returned
    /// transaction pending until [`commit`](Self::commit) or
    /// [`rollback`](Self::rollback).
    ///
    /// `target_index` past the end is clamped to the last position.
    ///
    /// # Errors
    ///
    /// - [`OrderError::TransactionPending`] while another reorder is
    ///   in flight
    /// - [`OrderError::UnknownRecord`] if `id` is not in the
    ///   collection
    pub fn move_item(
        &mut self,
        id: &RecordId,
        target_index: usize,
    ) -> Result<Option<ReorderTransaction>, OrderError> {
        if self.pending.is_some() {
            return Err(OrderError::TransactionPending);
        }
        let from = self
            .index_of(id)
            .ok_or_else(|| OrderError::UnknownRecord(id.clone()))?;
        let target = target_index.min(self.records.len().saturating_sub(1));
        if from == target {
            return Ok(None);
        }

        let previous = self.order_snapshot();
        let record = self.records.remove(from);
        self.records.insert(target, record);
        self.renumber();
        let proposed = self.order_snapshot();

        let txn = ReorderTransaction {
            id: TransactionId::new(),
            previous,
            proposed,
        };
        self.pending = Some(txn.id);
        debug!(txn = %txn.id, from, to = target, "optimistic move applied");
        Ok(Some(txn))
    }

    /// Closes `txn` as permanent. The proposed order already is the
    /// local state, so this only clears the pending flag.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::StaleTransaction`] if `txn` is not the
    /// pending transaction.
    pub fn commit(&mut self, txn: ReorderTransaction) -> Result<(), OrderError> {
        self.take_pending(&txn)?;
        debug!(txn = %txn.id, "reorder committed");
        Ok(())
    }

    /// Restores the pre-move state verbatim: sequence order and every
    /// record's prior `display_order`. Clears the pending flag.
    ///
    /// # Errors
    ///
    /// - [`OrderError::StaleTransaction`] if `txn` is not the pending
    ///   transaction
    /// - [`OrderError::UnknownRecord`] if the collection no longer
    ///   holds a record the snapshot names (cannot happen while the
    ///   pending flag blocks other mutations)
    pub fn rollback(&mut self, txn: ReorderTransaction) -> Result<(), OrderError> {
        self.take_pending(&txn)?;

        // Validate before touching anything so a bad snapshot cannot
        // leave the sequence half-restored.
        for (id, _) in &txn.previous {
            if self.index_of(id).is_none() {
                self.pending = Some(txn.id);
                return Err(OrderError::UnknownRecord(id.clone()));
            }
        }

        let mut pool = std::mem::take(&mut self.records);
        for (id, order) in &txn.previous {
            if let Some(pos) = pool.iter().position(|record| record.id() == id) {
                let mut record = pool.remove(pos);
                record.set_display_order(*order);
                self.records.push(record);
            }
        }
        // Records the snapshot does not know about (none today) keep
        // their relative order at the tail.
        self.records.append(&mut pool);
        debug!(txn = %txn.id, "reorder rolled back");
        Ok(())
    }

    /// Removes `id` and renumbers the remainder densely. Refused while
    /// a reorder is pending.
    ///
    /// # Errors
    ///
    /// - [`OrderError::TransactionPending`] while a reorder is in
    ///   flight
    /// - [`OrderError::UnknownRecord`] if `id` is not present
    pub fn remove(&mut self, id: &RecordId) -> Result<T, OrderError> {
        if self.pending.is_some() {
            return Err(OrderError::TransactionPending);
        }
        let index = self
            .index_of(id)
            .ok_or_else(|| OrderError::UnknownRecord(id.clone()))?;
        let removed = self.records.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Drops all records and any pending flag. Used on sign-out.
    pub fn clear(&mut self) {
        self.records.clear();
        self.pending = None;
    }

    fn renumber(&mut self) {
        for (index, record) in self.records.iter_mut().enumerate() {
            record.set_display_order(index as u32);
        }
    }

    fn take_pending(&mut self, txn: &ReorderTransaction) -> Result<(), OrderError> {
        match self.pending {
            Some(pending) if pending == txn.id => {
                self.pending = None;
                Ok(())
            }
            _ => Err(OrderError::StaleTransaction(txn.id)),
        }
    }
}

impl<T: Orderable> Default for OrderedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}
