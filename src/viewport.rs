//! A tracking service for terminal viewports.
//!
//! The viewport is a window of `height` lines starting at `offset` over a document. The
//! centred section is the last observed heading at or above the viewport's middle line.
//! Whenever scrolling moves that boundary, subscribers receive a [`CenteredChanged`].

use crate::document::{matched_lines, Heading};
use crate::error::ViewportError;
use crate::formats::Format;
use crate::tracking::{CenteredChanged, ScrollTarget, SubscriptionId, TrackingService};
use std::sync::mpsc::Sender;
use tracing::{debug, trace};

/// Tracks which document heading is centred in a terminal viewport.
pub struct ViewportTracker {
    source: String,
    format: Box<dyn Format>,
    headings: Vec<(String, usize)>,
    observed: Vec<(String, usize)>,
    line_count: usize,
    offset: usize,
    height: usize,
    centered: String,
    sinks: Vec<(SubscriptionId, Sender<CenteredChanged>)>,
    next_subscription: u64,
    disposed: bool,
}

impl ViewportTracker {
    #[must_use]
    /// Creates a tracker over `source`, whose headings are known by id and line.
    ///
    /// Nothing is observed until [`TrackingService::start_observing`] runs.
    pub fn new(source: String, format: Box<dyn Format>, headings: &[Heading], height: usize) -> Self {
        let line_count = source.lines().count();
        Self {
            source,
            format,
            headings: headings.iter().map(|h| (h.id.clone(), h.line)).collect(),
            observed: Vec::new(),
            line_count,
            offset: 0,
            height,
            centered: String::new(),
            sinks: Vec::new(),
            next_subscription: 0,
            disposed: false,
        }
    }

    #[must_use]
    /// First visible line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    /// Number of visible lines.
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self) -> usize {
        self.line_count.saturating_sub(self.height)
    }

    #[must_use]
    /// Ids and lines of the headings being observed.
    pub fn observed(&self) -> &[(String, usize)] {
        &self.observed
    }

    /// Resizes the viewport, e.g. after a terminal resize.
    pub fn set_height(&mut self, height: usize) {
        if height == self.height {
            return;
        }
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
        self.refresh();
    }

    /// Scrolls by `delta` lines, clamped to the document.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.offset.saturating_add_signed(delta);
        self.scroll_to_line(target);
    }

    /// Scrolls so that `line` is the first visible line, clamped to the document.
    pub fn scroll_to_line(&mut self, line: usize) {
        if self.disposed {
            return;
        }
        self.offset = line.min(self.max_offset());
        trace!(offset = self.offset, "viewport scrolled");
        self.refresh();
    }

    fn locate(&self) -> &str {
        let middle = self.offset + self.height / 2;
        self.observed
            .iter()
            .take_while(|(_, line)| *line <= middle)
            .last()
            .map_or("", |(id, _)| id.as_str())
    }

    fn refresh(&mut self) {
        let located = self.locate().to_string();
        if !located.is_empty() && located != self.centered {
            self.announce(located);
        }
    }

    fn announce(&mut self, id: String) {
        debug!(id = %id, "centred section changed");
        self.sinks.retain(|(_, sink)| {
            sink.send(CenteredChanged { id: id.clone() }).is_ok()
        });
        self.centered = id;
    }

    fn line_of(&self, id: &str) -> Result<usize, ViewportError> {
        self.headings
            .iter()
            .find(|(heading, _)| heading == id)
            .map(|&(_, line)| line)
            .ok_or_else(|| ViewportError::UnknownSection { id: id.to_string() })
    }

    fn ensure_live(&self) -> Result<(), ViewportError> {
        if self.disposed {
            Err(ViewportError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl TrackingService for ViewportTracker {
    type Error = ViewportError;

    async fn start_observing(&mut self, selector: &str) -> Result<(), ViewportError> {
        self.ensure_live()?;
        let lines = matched_lines(&self.source, self.format.as_ref(), selector)?;
        self.observed = self
            .headings
            .iter()
            .filter(|(_, line)| lines.contains(line))
            .cloned()
            .collect();
        debug!(observed = self.observed.len(), selector, "observing sections");
        self.centered = self.locate().to_string();
        Ok(())
    }

    async fn scroll_to_section(&mut self, target: &ScrollTarget) -> Result<(), ViewportError> {
        self.ensure_live()?;
        let id = target.section_id();
        let line = self.line_of(id)?;
        self.offset = line.saturating_sub(self.height / 2).min(self.max_offset());
        // The requested section counts as centred even when clamping keeps it off-middle.
        if self.centered != id {
            self.announce(id.to_string());
        }
        Ok(())
    }

    fn centered_section(&self) -> &str {
        &self.centered
    }

    async fn set_active(&mut self, id: &str) -> Result<(), ViewportError> {
        self.ensure_live()?;
        self.line_of(id)?;
        self.centered = id.to_string();
        Ok(())
    }

    fn subscribe_centered(&mut self, sink: Sender<CenteredChanged>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.sinks.push((id, sink));
        id
    }

    fn unsubscribe_centered(&mut self, subscription: SubscriptionId) {
        self.sinks.retain(|(id, _)| *id != subscription);
    }

    async fn dispose(&mut self) -> Result<(), ViewportError> {
        self.sinks.clear();
        self.observed.clear();
        self.disposed = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/viewport.rs"]
mod tests;
