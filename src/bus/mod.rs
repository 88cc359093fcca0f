// Cross-view notifications (group filter visibility and reload requests)

use tokio::sync::broadcast;
use tracing::{debug, info};

/// Messages broadcast between sibling views
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// Show the group filter scoped to `groups`, or hide it when `None`
    ShowFilterControl {
        groups: Option<String>,
        sender: String,
    },
    /// The active group context changed; views re-open under `groups`
    ReloadRequested { groups: String },
}

/// Typed publish/subscribe bus over a broadcast channel
///
/// Every subscriber sees every event published after it subscribed.
#[derive(Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<ConsoleEvent>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish to current subscribers, returning how many received it
    pub fn publish(&self, event: ConsoleEvent) -> usize {
        debug!(event = ?event, "Publishing console event");
        // No subscribers is not an error: nobody is listening yet
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.tx.subscribe()
    }

    pub fn show_filter(&self, groups: Option<&str>, sender: &str) -> usize {
        self.publish(ConsoleEvent::ShowFilterControl {
            groups: groups.map(str::to_string),
            sender: sender.to_string(),
        })
    }

    pub fn request_reload(&self, groups: &str) -> usize {
        self.publish(ConsoleEvent::ReloadRequested {
            groups: groups.to_string(),
        })
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// State of the group filter control shared by all views
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupFilter {
    visible: bool,
    groups: Option<String>,
}

impl GroupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn groups(&self) -> Option<&str> {
        self.groups.as_deref()
    }

    /// Track `ShowFilterControl` events; other events are ignored
    pub fn apply(&mut self, event: &ConsoleEvent) {
        if let ConsoleEvent::ShowFilterControl { groups, sender } = event {
            debug!(sender = %sender, groups = ?groups, "Group filter visibility changed");
            self.visible = groups.is_some();
            if groups.is_some() {
                self.groups = groups.clone();
            }
        }
    }

    /// User picked a new group context
    pub fn select(&mut self, groups: &str, bus: &NotificationBus) {
        info!(groups = %groups, "Group filter changed, requesting reload");
        self.groups = Some(groups.to_string());
        bus.request_reload(groups);
    }
}
