// Navigation shell: owns the active view and reacts to bus and navigation signals

use crate::api::SharedBackend;
use crate::bus::{ConsoleEvent, GroupFilter, NotificationBus};
use crate::config::ConsoleConfig;
use crate::navigation::{ChannelNavigator, Route};
use crate::views::{ActiveView, Alerter, ViewContext};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};


enum Signal {
    Event(Result<ConsoleEvent, broadcast::error::RecvError>),
    Navigate(Option<Route>),
}

/// Console shell
///
/// Every navigation builds a fresh view model and initialises it; nothing is
/// carried over from the previous view.
pub struct Console {
    ctx: ViewContext,
    events: broadcast::Receiver<ConsoleEvent>,
    navigation: mpsc::UnboundedReceiver<Route>,
    filter: GroupFilter,
    active: Option<ActiveView>,
}

impl Console {
    pub fn new(backend: SharedBackend, config: Arc<ConsoleConfig>, alerter: Arc<dyn Alerter>) -> Self {
        let bus = NotificationBus::default();
        let events = bus.subscribe();
        let (navigator, navigation) = ChannelNavigator::new();

        let ctx = ViewContext {
            backend,
            bus,
            navigator,
            alerter,
            config,
        };

        Self {
            ctx,
            events,
            navigation,
            filter: GroupFilter::new(),
            active: None,
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub fn active(&self) -> Option<&ActiveView> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveView> {
        self.active.as_mut()
    }

    pub fn current_route(&self) -> Option<Route> {
        self.active.as_ref().map(ActiveView::route)
    }

    pub fn group_filter(&self) -> &GroupFilter {
        &self.filter
    }

    /// Build and initialise the view for `route`, replacing the active one
    pub async fn open(&mut self, route: Route) {
        info!(path = %route, "Opening view");
        let mut view = ActiveView::for_route(self.ctx.clone(), &route);
        view.init().await;
        self.active = Some(view);
    }

    /// User changed the group context in the filter control
    pub fn select_groups(&mut self, groups: &str) {
        self.filter.select(groups, &self.ctx.bus);
    }

    pub async fn handle_event(&mut self, event: ConsoleEvent) {
        self.filter.apply(&event);

        if let ConsoleEvent::ReloadRequested { groups } = event {
            match &self.active {
                Some(view) => {
                    let next = view.reload_route(&groups);
                    info!(view = view.name(), groups = %groups, path = %next, "Reloading view");
                    self.open(next).await;
                }
                None => debug!(groups = %groups, "Reload requested with no active view"),
            }
        }
    }

    /// Wait for the next bus event or navigation request and handle it
    ///
    /// Returns false once the signal sources are closed.
    pub async fn step(&mut self) -> bool {
        let signal = tokio::select! {
            result = self.events.recv() => Signal::Event(result),
            route = self.navigation.recv() => Signal::Navigate(route),
        };

        match signal {
            Signal::Event(Ok(event)) => self.handle_event(event).await,
            Signal::Event(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                warn!(skipped = skipped, "Console lagged, skipped events");
            }
            Signal::Event(Err(broadcast::error::RecvError::Closed)) => {
                error!("Console event bus closed");
                return false;
            }
            Signal::Navigate(Some(route)) => self.open(route).await,
            Signal::Navigate(None) => return false,
        }
        true
    }

    /// Handle every signal already queued, including those raised while handling
    ///
    /// Returns how many signals were handled.
    pub async fn drain(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.handle_event(event).await;
                    handled += 1;
                    continue;
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Console lagged, skipped events");
                    continue;
                }
                Err(_) => {}
            }

            match self.navigation.try_recv() {
                Ok(route) => {
                    self.open(route).await;
                    handled += 1;
                }
                Err(_) => return handled,
            }
        }
    }
}
