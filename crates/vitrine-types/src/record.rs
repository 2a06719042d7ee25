//! Orderable record types.
//!
//! Anything an administrator can drag-reorder implements [`Orderable`]:
//! a stable id plus a mutable `display_order` sort key. The two
//! concrete record kinds of the portfolio back-office, [`ProjectCard`]
//! and [`SponsorLogo`], both implement it.
//!
//! # display_order
//!
//! `display_order` is an integer sort key, zero-based. The collection
//! layer renumbers an entire sequence densely (`0..n-1`) after every
//! move, so gaps or float-style keys never accumulate; duplicates may
//! exist only transiently inside an uncommitted reorder.

use crate::RecordId;
use serde::{Deserialize, Serialize};

/// A record participating in a user-orderable list.
///
/// Implementors expose a stable identity and a mutable sort key. The
/// collection layer owns all ordering decisions; records only store
/// the result.
///
/// # Example
///
/// ```
/// use vitrine_types::{Orderable, ProjectCard, RecordId};
///
/// let mut card = ProjectCard::new(RecordId::new("card_1"), "Synth toy", 4);
/// assert_eq!(card.display_order(), 4);
/// card.set_display_order(0);
/// assert_eq!(card.display_order(), 0);
/// ```
pub trait Orderable {
    /// Stable, unique identity within the collection.
    fn id(&self) -> &RecordId;

    /// Current sort key.
    fn display_order(&self) -> u32;

    /// Overwrites the sort key. Called only by the collection layer.
    fn set_display_order(&mut self, order: u32);

    /// Whether the public surface renders this record.
    fn visible(&self) -> bool;

    /// Shows or hides the record.
    fn set_visible(&mut self, visible: bool);
}

/// A portfolio project card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    /// Store-minted identity.
    pub id: RecordId,
    /// Card title shown on the public surface.
    pub title: String,
    /// Optional short blurb.
    #[serde(default)]
    pub summary: Option<String>,
    /// Optional external link.
    #[serde(default)]
    pub link: Option<String>,
    /// Whether the public surface renders this card.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Sort key, zero-based.
    pub display_order: u32,
}

impl ProjectCard {
    /// Creates a visible card with no summary or link.
    #[must_use]
    pub fn new(id: RecordId, title: impl Into<String>, display_order: u32) -> Self {
        Self {
            id,
            title: title.into(),
            summary: None,
            link: None,
            visible: true,
            display_order,
        }
    }
}

impl Orderable for ProjectCard {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_order(&self) -> u32 {
        self.display_order
    }

    fn set_display_order(&mut self, order: u32) {
        self.display_order = order;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// A sponsor logo shown on the public surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorLogo {
    /// Store-minted identity.
    pub id: RecordId,
    /// Sponsor name, used for alt text.
    pub name: String,
    /// Logo image URL. Upload plumbing is outside the core.
    pub image_url: String,
    /// Whether the public surface renders this logo.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Sort key, zero-based.
    pub display_order: u32,
}

impl SponsorLogo {
    /// Creates a visible logo.
    #[must_use]
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        image_url: impl Into<String>,
        display_order: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: image_url.into(),
            visible: true,
            display_order,
        }
    }
}

impl Orderable for SponsorLogo {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_order(&self) -> u32 {
        self.display_order
    }

    fn set_display_order(&mut self, order: u32) {
        self.display_order = order;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

fn default_visible() -> bool {
    true
}

/// Partial update for a single record.
///
/// Only the set fields are written; the remote store leaves the rest
/// untouched. This is the payload shape for both reorder persistence
/// (`display_order` only) and visibility toggles (`visible` only).
///
/// # Example
///
/// ```
/// use vitrine_types::RecordPatch;
///
/// let patch = RecordPatch::order(3);
/// assert_eq!(patch.display_order, Some(3));
/// assert_eq!(patch.visible, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecordPatch {
    /// New sort key, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,

    /// New visibility, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl RecordPatch {
    /// Patch that only moves the record.
    #[must_use]
    pub fn order(display_order: u32) -> Self {
        Self {
            display_order: Some(display_order),
            visible: None,
        }
    }

    /// Patch that only shows or hides the record.
    #[must_use]
    pub fn visibility(visible: bool) -> Self {
        Self {
            display_order: None,
            visible: Some(visible),
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_order.is_none() && self.visible.is_none()
    }
}
