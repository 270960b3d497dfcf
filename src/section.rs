//! Section representation for scroll-synchronised navigation.
//!
//! A section is one navigable region of a page, typically corresponding to a heading.
//! Sections know their parent by id only; the registry owns every section in a flat
//! sequence and derives children by filtering, so no section ever owns another.

use serde::Serialize;

/// Gap between the order keys of successive root sections.
///
/// Descendants are keyed inside their root's window, so root keys never need
/// renumbering when children are registered.
pub const ORDER_SPACING: i64 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Navigable region of a page with a stable identifier.
pub struct Section {
    /// Stable identity shared with the tracking service and URL fragments.
    pub id: String,
    /// Display label shown in the navigation panel.
    pub name: String,
    /// Id of the containing section, if any.
    pub parent: Option<String>,
    /// Nesting depth in the hierarchy (0 for roots).
    pub level: usize,
    /// Position key; sorting by it yields table-of-contents order.
    pub order: i64,
    /// Whether this section is the one highlighted as in view.
    pub is_active: bool,
}

impl Section {
    #[must_use]
    /// Creates an inactive section; level and order are assigned on registration.
    pub fn new(name: impl Into<String>, id: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent,
            level: 0,
            order: 0,
            is_active: false,
        }
    }

    #[must_use]
    /// True for sections without a parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
