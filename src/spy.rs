//! The scroll spy coordinator reconciles navigation clicks with viewport reports.
//!
//! Two independent triggers activate sections: the user selecting an entry in the
//! navigation panel, and the tracking service announcing that a different section is now
//! centred in the viewport. Both end in [`ActiveSectionTracker::select_active`]; only the
//! click direction also asks the service to scroll.
//!
//! The coordinator moves through a small lifecycle:
//!
//! ```text
//! Uninitialized --attach--> Spying --dispose--> Disposed
//!       |                                          ^
//!       |__________________dispose_________________|
//! ```
//!
//! `attach` runs once the host has rendered for the first time: it creates the service,
//! subscribes to centring notifications, starts observation when a selector is configured
//! and aligns the highlight with whatever is already centred (a page restored mid-scroll).
//! `dispose` drops the subscription before releasing the service, exactly once.

use crate::config::NavConfig;
use crate::error::SpyError;
use crate::section::Section;
use crate::tracker::{ActiveSectionTracker, Redraw};
use crate::tracking::{
    CenteredChanged, ScrollTarget, SubscriptionId, TrackingService, TrackingServiceFactory,
};
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Lifecycle of a coordinator.
pub enum SpyState {
    /// No service exists yet; the host has not rendered.
    Uninitialized,
    /// The service exists and centring notifications are being consumed.
    Spying,
    /// The subscription and the service have been released.
    Disposed,
}

/// Bridges click intents and centring notifications into section activation.
pub struct ScrollSpyCoordinator<F: TrackingServiceFactory> {
    config: NavConfig,
    tracker: ActiveSectionTracker,
    factory: F,
    service: Option<F::Service>,
    subscription: Option<SubscriptionId>,
    events: Option<Receiver<CenteredChanged>>,
    state: SpyState,
    registered_any: bool,
    pending_hint: Option<String>,
}

impl<F: TrackingServiceFactory> ScrollSpyCoordinator<F> {
    /// Creates an uninitialized coordinator; the service is built on [`Self::attach`].
    pub fn new(config: NavConfig, factory: F, redraw: impl Redraw + 'static) -> Self {
        Self {
            config,
            tracker: ActiveSectionTracker::new(redraw),
            factory,
            service: None,
            subscription: None,
            events: None,
            state: SpyState::Uninitialized,
            registered_any: false,
            pending_hint: None,
        }
    }

    #[must_use]
    /// Current lifecycle state.
    pub fn state(&self) -> SpyState {
        self.state
    }

    #[must_use]
    /// Options this coordinator was built with.
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[must_use]
    /// The tracker holding the registry and the active flag.
    pub fn tracker(&self) -> &ActiveSectionTracker {
        &self.tracker
    }

    #[must_use]
    /// All sections in registration order.
    pub fn sections(&self) -> &[Section] {
        self.tracker.sections()
    }

    #[must_use]
    /// The highlighted section, if any.
    pub fn active_section(&self) -> Option<&Section> {
        self.tracker.active_section()
    }

    #[must_use]
    /// The tracking service while spying.
    pub fn service(&self) -> Option<&F::Service> {
        self.service.as_ref()
    }

    /// Mutable access to the tracking service while spying, e.g. to drive its viewport.
    pub fn service_mut(&mut self) -> Option<&mut F::Service> {
        self.service.as_mut()
    }

    /// Creates the tracking service and starts spying.
    ///
    /// Does nothing unless the coordinator is still uninitialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails to start observing. The coordinator is
    /// spying regardless and still aligns with the service's centred section, so a later
    /// [`Self::dispose`] releases the service.
    pub async fn attach(&mut self) -> Result<(), SpyError> {
        if self.state != SpyState::Uninitialized {
            debug!(state = ?self.state, "attach ignored");
            return Ok(());
        }

        let mut service = self.factory.create();
        let (sink, events) = mpsc::channel();
        self.subscription = Some(service.subscribe_centered(sink));
        self.events = Some(events);
        self.state = SpyState::Spying;
        info!(selector = %self.config.section_selector, "scroll spy attached");

        let service = self.service.insert(service);
        let observing = if self.config.section_selector.is_empty() {
            Ok(())
        } else {
            service
                .start_observing(&self.config.section_selector)
                .await
                .map_err(SpyError::service)
        };
        if let Err(e) = &observing {
            warn!(error = %e, "tracking service failed to start observing");
        }

        let centered = service.centered_section().to_string();
        let aligned = self.tracker.select_active(&centered);

        if let Some(hint) = self.pending_hint.take() {
            let still_active = self.tracker.active_section().is_some_and(|s| s.id == hint);
            if !aligned && centered.is_empty() && still_active {
                if let Some(service) = self.service.as_mut() {
                    if let Err(e) = service.set_active(&hint).await {
                        warn!(id = %hint, error = %e, "failed to send deferred active hint");
                    }
                }
            }
        }

        observing
    }

    /// Registers a section and applies the default-activation rules.
    ///
    /// A section matching the service's centred section is activated through the
    /// centring path. Otherwise, when `activate_first_as_default` is set and this is the
    /// first section ever registered, it is activated and the service is told about it.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the section.
    pub async fn add_section(
        &mut self,
        name: &str,
        id: &str,
        parent: Option<&str>,
        notify: bool,
    ) -> Result<(), SpyError> {
        let first = !self.registered_any;
        self.tracker.add_section(name, id, parent, notify)?;
        self.registered_any = true;

        let centered = self
            .service
            .as_ref()
            .is_some_and(|s| s.centered_section() == id);
        if centered {
            self.handle_centered(id);
            return Ok(());
        }

        if !(first && self.config.activate_first_as_default) {
            return Ok(());
        }

        self.tracker.select_active(id);
        match self.service.as_mut() {
            Some(service) => {
                // A failed hint leaves the local highlight in place.
                if let Err(e) = service.set_active(id).await {
                    warn!(id, error = %e, "failed to inform tracking service of default section");
                }
            }
            None => {
                warn!(id, "default section activated before the tracking service exists");
                if self.state == SpyState::Uninitialized {
                    self.pending_hint = Some(id.to_string());
                }
            }
        }
        Ok(())
    }

    /// Unregisters a section; nothing is auto-activated in its place.
    pub fn remove_section(&mut self, id: &str) -> Option<Section> {
        self.tracker.remove_section(id)
    }

    /// Handles a click on the navigation entry for `id`.
    ///
    /// # Errors
    ///
    /// See [`Self::scroll_to_section`].
    pub async fn click(&mut self, id: &str) -> Result<(), SpyError> {
        self.scroll_to_section(ScrollTarget::Section(id.to_string()))
            .await
    }

    /// Activates the target's section immediately, then scrolls the viewport to it.
    ///
    /// The highlight does not wait for the scroll to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::NotAttached`] when there is no service to scroll with, or the
    /// service's own failure. The activation has happened in either case.
    pub async fn scroll_to_section(&mut self, target: ScrollTarget) -> Result<(), SpyError> {
        self.tracker.select_active(target.section_id());

        let Some(service) = self.service.as_mut() else {
            warn!(scroll_target = ?target, state = ?self.state, "scroll requested without a tracking service");
            return Err(SpyError::NotAttached);
        };
        service
            .scroll_to_section(&target)
            .await
            .map_err(SpyError::service)
    }

    /// Activates the section the tracking service reports as centred. Never scrolls.
    pub fn handle_centered(&mut self, id: &str) -> bool {
        self.tracker.select_active(id)
    }

    /// Drains pending centring notifications, returning how many were received.
    pub fn pump_events(&mut self) -> usize {
        let Some(events) = self.events.as_ref() else {
            return 0;
        };
        let received: Vec<CenteredChanged> = events.try_iter().collect();
        for event in &received {
            self.tracker.select_active(&event.id);
        }
        received.len()
    }

    /// Sends the redraw signal.
    pub fn update(&mut self) {
        self.tracker.update();
    }

    /// Unsubscribes from centring notifications and releases the service.
    ///
    /// Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the service's failure to dispose; the coordinator is disposed regardless.
    pub async fn dispose(&mut self) -> Result<(), SpyError> {
        if self.state == SpyState::Disposed {
            return Ok(());
        }
        self.state = SpyState::Disposed;
        self.events = None;
        self.pending_hint = None;

        let Some(mut service) = self.service.take() else {
            return Ok(());
        };
        if let Some(subscription) = self.subscription.take() {
            service.unsubscribe_centered(subscription);
        }
        info!("scroll spy disposed");
        service.dispose().await.map_err(SpyError::service)
    }
}

impl<F: TrackingServiceFactory> Drop for ScrollSpyCoordinator<F> {
    fn drop(&mut self) {
        if let Some(service) = self.service.as_mut() {
            if let Some(subscription) = self.subscription.take() {
                service.unsubscribe_centered(subscription);
            }
            warn!("scroll spy dropped without dispose");
        }
    }
}

#[cfg(test)]
#[path = "tests/spy.rs"]
mod tests;
