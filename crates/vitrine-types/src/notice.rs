//! User-visible notices.
//!
//! Core failures never cross into rendering code as errors; they
//! become [`Notice`]s. A notice is non-fatal and dismissible, and the
//! UI decides how to render it (toast, inline banner).

use crate::NoticeId;
use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational, e.g. "signed out".
    Info,

    /// Something failed but the view carries on, e.g. a rolled-back
    /// reorder.
    Error,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A user-visible, dismissible, non-fatal message.
///
/// # Example
///
/// ```
/// use vitrine_types::{Notice, Severity};
///
/// let notice = Notice::error("Reordering failed, try again.");
/// assert!(notice.severity.is_error());
/// assert_eq!(notice.message, "Reordering failed, try again.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Unique id, used by the UI to dismiss a specific notice.
    pub id: NoticeId,
    /// How loudly to render it.
    pub severity: Severity,
    /// Human-readable text.
    pub message: String,
}

impl Notice {
    /// Creates an informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            id: NoticeId::new(),
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: NoticeId::new(),
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_and_error_severities() {
        assert!(!Notice::info("hi").severity.is_error());
        assert!(Notice::error("uh oh").severity.is_error());
    }

    #[test]
    fn each_notice_gets_its_own_id() {
        let a = Notice::info("x");
        let b = Notice::info("x");
        assert_ne!(a.id, b.id);
    }
}
