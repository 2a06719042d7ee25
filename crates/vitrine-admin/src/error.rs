//! Ordering layer errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`OrderError::UnknownRecord`] | `ORDER_UNKNOWN_RECORD` | No |
//! | [`OrderError::TransactionPending`] | `ORDER_TRANSACTION_PENDING` | Yes |
//! | [`OrderError::StaleTransaction`] | `ORDER_STALE_TRANSACTION` | No |
//!
//! A pending transaction clears once its persistence settles, so
//! retrying later can succeed; the other two indicate the caller is
//! working from an outdated picture of the collection.

use thiserror::Error;
use vitrine_types::{ErrorCode, RecordId, TransactionId};

/// Ordering layer error.
///
/// These stay inside the admin layer: the controller converts every
/// one of them into an outcome or a notice before rendering code can
/// see it.
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    /// The addressed record is not in the collection.
    #[error("record {0} is not in the collection")]
    UnknownRecord(RecordId),

    /// A reorder transaction is already in flight. At most one may be
    /// pending per collection.
    #[error("a reorder transaction is already pending")]
    TransactionPending,

    /// The supplied transaction is not the one currently pending.
    #[error("transaction {0} is not the pending transaction")]
    StaleTransaction(TransactionId),
}

impl ErrorCode for OrderError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownRecord(_) => "ORDER_UNKNOWN_RECORD",
            Self::TransactionPending => "ORDER_TRANSACTION_PENDING",
            Self::StaleTransaction(_) => "ORDER_STALE_TRANSACTION",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::TransactionPending)
    }
}
