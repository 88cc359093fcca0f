use crate::api::SharedBackend;
use crate::bus::NotificationBus;
use crate::config::ConsoleConfig;
use crate::navigation::Navigator;
use std::sync::Arc;
use tracing::warn;

/// Blocking user acknowledgment of an error message
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// Alerter writing to stderr (terminal consoles)
pub struct StderrAlerter;

impl Alerter for StderrAlerter {
    fn alert(&self, message: &str) {
        warn!(message = %message, "Alerting user");
        eprintln!("{}", message);
    }
}

/// Collaborators shared by every view model
#[derive(Clone)]
pub struct ViewContext {
    pub backend: SharedBackend,
    pub bus: NotificationBus,
    pub navigator: Arc<dyn Navigator>,
    pub alerter: Arc<dyn Alerter>,
    pub config: Arc<ConsoleConfig>,
}
