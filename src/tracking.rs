//! Contract between the coordinator and the viewport tracking service.
//!
//! The service observes rendered sections, knows which one sits in the middle of the
//! viewport, and reports changes of that centred section over a channel. The coordinator
//! owns one service instance, created through a [`TrackingServiceFactory`].

use std::future::Future;
use std::sync::mpsc::Sender;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Notification that the viewport settled on a different section.
pub struct CenteredChanged {
    /// Id of the newly centred section.
    pub id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Handle returned by a subscription, needed to unsubscribe.
pub struct SubscriptionId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where to scroll: a section id, or a URI whose fragment names the section.
pub enum ScrollTarget {
    /// A bare section id.
    Section(String),
    /// A URI such as `https://host/page#intro` or `#intro`.
    Uri(String),
}

impl ScrollTarget {
    #[must_use]
    /// The section id this target resolves to (empty for a URI without fragment).
    pub fn section_id(&self) -> &str {
        match self {
            Self::Section(id) => id,
            Self::Uri(uri) => uri.split_once('#').map_or("", |(_, fragment)| fragment),
        }
    }
}

impl From<&str> for ScrollTarget {
    fn from(target: &str) -> Self {
        if target.contains('#') {
            Self::Uri(target.to_string())
        } else {
            Self::Section(target.to_string())
        }
    }
}

/// Viewport observer the coordinator depends on.
pub trait TrackingService {
    /// Failure type of the asynchronous operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Begins watching the elements matched by `selector`.
    fn start_observing(&mut self, selector: &str) -> impl Future<Output = Result<(), Self::Error>>;

    /// Scrolls the viewport so that the target section is in view.
    fn scroll_to_section(
        &mut self,
        target: &ScrollTarget,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Current best guess of the centred section id; empty when there is none.
    fn centered_section(&self) -> &str;

    /// Informs the service which section the core considers active.
    fn set_active(&mut self, id: &str) -> impl Future<Output = Result<(), Self::Error>>;

    /// Registers a sink for [`CenteredChanged`] notifications.
    fn subscribe_centered(&mut self, sink: Sender<CenteredChanged>) -> SubscriptionId;

    /// Removes a sink registered with [`TrackingService::subscribe_centered`].
    fn unsubscribe_centered(&mut self, subscription: SubscriptionId);

    /// Releases whatever the service holds; it is not used afterwards.
    fn dispose(&mut self) -> impl Future<Output = Result<(), Self::Error>>;
}

/// Creates the tracking service when the coordinator first attaches.
pub trait TrackingServiceFactory {
    /// The service type produced.
    type Service: TrackingService;

    /// Builds a fresh service instance.
    fn create(&mut self) -> Self::Service;
}

impl<S, F> TrackingServiceFactory for F
where
    S: TrackingService,
    F: FnMut() -> S,
{
    type Service = S;

    fn create(&mut self) -> S {
        self()
    }
}
