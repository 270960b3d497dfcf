//! The host state bridging a loaded document, its viewport and the navigation panel.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user
//! scrolls and navigates. The scroll spy coordinator owns the sections and the viewport
//! tracker; this struct adds the panel cursor, status messages and the few host duties the
//! coordinator leaves to its caller: attaching after the first render, registering the
//! document's headings, and pumping centring notifications after every scroll.

use crate::config::{Config, ExpandBehaviour};
use crate::document::Document;
use crate::error::SpyError;
use crate::formats::markdown::MarkdownFormat;
use crate::section::Section;
use crate::spy::{ScrollSpyCoordinator, SpyState};
use crate::viewport::ViewportTracker;
use pollster::block_on;
use serde::Serialize;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

/// Factory producing a viewport tracker over the loaded document.
pub type ViewportFactory = Box<dyn FnMut() -> ViewportTracker>;

/// Scroll spy coordinator driving a terminal viewport.
pub type Spy = ScrollSpyCoordinator<ViewportFactory>;

#[derive(Serialize, Debug)]
/// Navigation state printed when the session ends.
pub struct NavSnapshot {
    /// Panel headline.
    pub headline: String,
    /// Id of the active section, if any.
    pub active: Option<String>,
    /// Sections in table-of-contents order.
    pub sections: Vec<Section>,
}

/// Host state for one document session.
pub struct AppState {
    /// The document being read.
    pub document: Document,
    /// Sections, activation and the viewport tracker.
    pub spy: Spy,
    /// Index of the highlighted entry in [`AppState::visible_sections`].
    pub cursor: usize,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Lines moved per scroll keypress.
    pub scroll_step: usize,
    /// Set by the redraw signal, cleared by the host after drawing.
    pub dirty: Rc<Cell<bool>>,
    viewport_height: Rc<Cell<usize>>,
}

impl AppState {
    #[must_use]
    /// Builds an unattached session over `document`.
    pub fn new(document: Document, config: &Config) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let viewport_height = Rc::new(Cell::new(0));

        let source = document.source.clone();
        let headings = document.headings.clone();
        let height = Rc::clone(&viewport_height);
        let factory: ViewportFactory = Box::new(move || {
            ViewportTracker::new(
                source.clone(),
                Box::new(MarkdownFormat),
                &headings,
                height.get(),
            )
        });

        let redraw_flag = Rc::clone(&dirty);
        let spy = ScrollSpyCoordinator::new(config.nav.clone(), factory, move || {
            redraw_flag.set(true);
        });

        Self {
            document,
            spy,
            cursor: 0,
            message: None,
            scroll_step: config.scroll_step.max(1),
            dirty,
            viewport_height,
        }
    }

    #[must_use]
    /// True until [`AppState::attach`] has run.
    pub fn needs_attach(&self) -> bool {
        self.spy.state() == SpyState::Uninitialized
    }

    /// Starts spying on a viewport of `height` lines, then registers the document's headings.
    ///
    /// The headings are registered even when observation fails to start, so the panel
    /// still lists them and clicks still scroll.
    ///
    /// # Errors
    ///
    /// Returns an error if observation fails to start or a heading cannot be registered.
    pub fn attach(&mut self, height: usize) -> Result<(), SpyError> {
        self.viewport_height.set(height);
        let attached = block_on(self.spy.attach());
        self.register_sections()?;
        if self.spy.config().section_selector.is_empty() {
            self.message = Some("Scroll spy disabled: no section selector".to_string());
        }
        attached
    }

    /// Registers every heading of the document with the coordinator.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects a heading.
    pub fn register_sections(&mut self) -> Result<(), SpyError> {
        for heading in &self.document.headings {
            block_on(self.spy.add_section(
                &heading.title,
                &heading.id,
                heading.parent.as_deref(),
                false,
            ))?;
        }
        self.spy.update();
        Ok(())
    }

    /// Keeps the viewport in step with the rendered document pane.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height.set(height);
        if let Some(viewport) = self.spy.service_mut() {
            viewport.set_height(height);
        }
        self.spy.pump_events();
    }

    #[must_use]
    /// Height of the document pane as last rendered.
    pub fn viewport_height(&self) -> usize {
        self.viewport_height.get()
    }

    /// Scrolls the document and lets the spy react to the new centre.
    pub fn scroll_lines(&mut self, delta: isize) {
        if let Some(viewport) = self.spy.service_mut() {
            viewport.scroll_by(delta);
        }
        if self.spy.pump_events() > 0 {
            self.follow_active();
        }
        self.dirty.set(true);
    }

    /// Scrolls down by the configured step.
    pub fn scroll_down(&mut self) {
        self.scroll_lines(isize::try_from(self.scroll_step).unwrap_or(isize::MAX));
    }

    /// Scrolls up by the configured step.
    pub fn scroll_up(&mut self) {
        self.scroll_lines(-isize::try_from(self.scroll_step).unwrap_or(isize::MAX));
    }

    #[must_use]
    /// First visible document line.
    pub fn viewport_offset(&self) -> usize {
        self.spy.service().map_or(0, ViewportTracker::offset)
    }

    #[must_use]
    /// Navigation entries to list, in table-of-contents order.
    ///
    /// Which entries appear depends on the configured [`ExpandBehaviour`].
    pub fn visible_sections(&self) -> Vec<&Section> {
        let registry = self.spy.tracker().registry();
        let ordered = registry.ordered();

        match self.spy.config().expand_behaviour {
            ExpandBehaviour::Always => ordered,
            ExpandBehaviour::Never => ordered.into_iter().filter(|s| s.is_root()).collect(),
            ExpandBehaviour::WhenActive => {
                let mut expanded: HashSet<&str> = HashSet::new();
                if let Some(active) = registry.active_section() {
                    expanded.insert(active.id.as_str());
                    expanded.extend(
                        registry
                            .ancestors(&active.id)
                            .into_iter()
                            .map(|s| s.id.as_str()),
                    );
                }
                ordered
                    .into_iter()
                    .filter(|s| {
                        s.parent
                            .as_deref()
                            .is_none_or(|parent| expanded.contains(parent))
                    })
                    .collect()
            }
        }
    }

    /// Moves the panel cursor to the next entry.
    pub fn next_entry(&mut self) {
        let count = self.visible_sections().len();
        if self.cursor + 1 < count {
            self.cursor += 1;
        }
    }

    /// Moves the panel cursor to the previous entry.
    pub fn prev_entry(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Clicks the entry under the panel cursor: highlight now, then scroll.
    pub fn click_entry(&mut self) {
        let Some(id) = self
            .visible_sections()
            .get(self.cursor)
            .map(|s| s.id.clone())
        else {
            return;
        };
        match block_on(self.spy.click(&id)) {
            Ok(()) => self.message = None,
            Err(e) => self.message = Some(format!("Cannot scroll to {id}: {e}")),
        }
        self.spy.pump_events();
        self.follow_active();
    }

    /// Moves the panel cursor onto the active entry when it is listed.
    pub fn follow_active(&mut self) {
        let Some(active) = self.spy.active_section().map(|s| s.id.clone()) else {
            return;
        };
        if let Some(index) = self.visible_sections().iter().position(|s| s.id == active) {
            self.cursor = index;
        }
    }

    #[must_use]
    /// Document line of the active section's heading.
    pub fn active_line(&self) -> Option<usize> {
        let active = self.spy.active_section()?;
        self.document.heading(&active.id).map(|h| h.line)
    }

    /// Releases the tracking service at the end of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails to dispose.
    pub fn shutdown(&mut self) -> Result<(), SpyError> {
        block_on(self.spy.dispose())
    }

    #[must_use]
    /// Captures the navigation state for printing.
    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            headline: self.spy.config().headline.clone(),
            active: self.spy.active_section().map(|s| s.id.clone()),
            sections: self
                .spy
                .tracker()
                .registry()
                .ordered()
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
