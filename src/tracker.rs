//! The active section tracker keeps at most one section highlighted.
//!
//! Every activation, whether it comes from a click in the navigation panel or from the
//! tracking service reporting a newly centred section, goes through
//! [`ActiveSectionTracker::select_active`]. That single path clears all flags and sets
//! one, so the invariant holds however quickly the two triggers alternate.

use crate::error::RegistryError;
use crate::registry::SectionRegistry;
use crate::section::Section;
use tracing::debug;

/// Receives the "state changed, please redraw" signal.
pub trait Redraw {
    /// Schedules a redraw of whatever renders the sections.
    fn redraw(&mut self);
}

impl<F: FnMut()> Redraw for F {
    fn redraw(&mut self) {
        self();
    }
}

/// Owns the registry and funnels every change of the active flag through one method.
pub struct ActiveSectionTracker {
    registry: SectionRegistry,
    redraw: Box<dyn Redraw>,
}

impl ActiveSectionTracker {
    #[must_use]
    /// Creates a tracker over an empty registry that signals `redraw` on changes.
    pub fn new(redraw: impl Redraw + 'static) -> Self {
        Self {
            registry: SectionRegistry::new(),
            redraw: Box::new(redraw),
        }
    }

    #[must_use]
    /// Read access to the underlying registry.
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    #[must_use]
    /// All sections in registration order.
    pub fn sections(&self) -> &[Section] {
        self.registry.sections()
    }

    #[must_use]
    /// The highlighted section, if any.
    pub fn active_section(&self) -> Option<&Section> {
        self.registry.active_section()
    }

    /// Makes `id` the only active section.
    ///
    /// Empty or unknown ids are ignored; they commonly point at sections that have not
    /// been registered yet. Returns `true` when the active section changed, in which case
    /// the redraw signal has been sent.
    pub fn select_active(&mut self, id: &str) -> bool {
        if id.is_empty() || !self.registry.contains(id) {
            debug!(id, "ignoring activation of unknown section");
            return false;
        }
        let previous = self.registry.active_section().map(|s| s.id.clone());
        self.registry.set_active(id);
        if previous.as_deref() == Some(id) {
            return false;
        }
        debug!(id, previous = previous.as_deref(), "active section changed");
        self.redraw.redraw();
        true
    }

    /// Registers a section, signalling a redraw when `notify` is set.
    ///
    /// # Errors
    ///
    /// Returns the registry's error for empty, duplicate or orphaned ids.
    pub fn add_section(
        &mut self,
        name: &str,
        id: &str,
        parent: Option<&str>,
        notify: bool,
    ) -> Result<&Section, RegistryError> {
        let index = self.registry.insert(name, id, parent)?;
        if notify {
            self.redraw.redraw();
        }
        Ok(&self.registry.sections()[index])
    }

    /// Unregisters a section; if it was active, nothing is active afterwards.
    pub fn remove_section(&mut self, id: &str) -> Option<Section> {
        let removed = self.registry.remove_section(id)?;
        self.redraw.redraw();
        Some(removed)
    }

    /// Sends the redraw signal unconditionally.
    pub fn update(&mut self) {
        self.redraw.redraw();
    }
}

#[cfg(test)]
#[path = "tests/tracker.rs"]
mod tests;
