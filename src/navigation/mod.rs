// Console routes and navigation

use crate::api::ALL;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{info, warn};


/// Path-segment filters of the stats view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsFilter {
    pub groups: String,
    pub environment: String,
    pub min_date: String,
    pub max_date: String,
    pub code: String,
}

impl Default for StatsFilter {
    fn default() -> Self {
        Self {
            groups: ALL.to_string(),
            environment: ALL.to_string(),
            min_date: ALL.to_string(),
            max_date: ALL.to_string(),
            code: ALL.to_string(),
        }
    }
}

/// A navigable console view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    ServicesList { environment: String, groups: String },
    ServiceNew { environment: String, groups: String },
    ServiceEdit { environment: String, groups: String, id: String },
    Environments { group: String },
    EnvironmentNew,
    EnvironmentEdit { id: String },
    Stats(StatsFilter),
}

/// Route parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    Empty,
    /// First segment names no known view
    UnknownView(String),
    /// Known view with the wrong segment count
    InvalidSegments(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Empty => write!(f, "route is empty"),
            RouteError::UnknownView(view) => write!(f, "unknown view '{}'", view),
            RouteError::InvalidSegments(path) => write!(f, "invalid route '{}'", path),
        }
    }
}

impl std::error::Error for RouteError {}

impl Route {
    /// Parse a console path such as `/services/list/prod/all`
    ///
    /// Leading/trailing slashes are ignored. Stats segments missing from the
    /// end default to `all`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockconsole::navigation::Route;
    ///
    /// let route = Route::parse("/services/edit/prod/all/42").unwrap();
    /// assert_eq!(route.path(), "/services/edit/prod/all/42");
    /// ```
    pub fn parse(path: &str) -> Result<Route, RouteError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let invalid = || RouteError::InvalidSegments(path.to_string());

        match segments.as_slice() {
            [] => Err(RouteError::Empty),
            ["services", "list", env, groups] => Ok(Route::ServicesList {
                environment: env.to_string(),
                groups: groups.to_string(),
            }),
            ["services", "new", env, groups] => Ok(Route::ServiceNew {
                environment: env.to_string(),
                groups: groups.to_string(),
            }),
            ["services", "edit", env, groups, id] => Ok(Route::ServiceEdit {
                environment: env.to_string(),
                groups: groups.to_string(),
                id: id.to_string(),
            }),
            ["services", ..] => Err(invalid()),
            ["environments", "new"] => Ok(Route::EnvironmentNew),
            ["environments", "edit", id] => Ok(Route::EnvironmentEdit { id: id.to_string() }),
            ["environments", "list", group] => Ok(Route::Environments {
                group: group.to_string(),
            }),
            ["environments"] => Ok(Route::Environments {
                group: ALL.to_string(),
            }),
            ["environments", group] => Ok(Route::Environments {
                group: group.to_string(),
            }),
            ["environments", ..] => Err(invalid()),
            ["stats", rest @ ..] if rest.len() <= 5 => {
                let segment = |i: usize| rest.get(i).unwrap_or(&ALL).to_string();
                Ok(Route::Stats(StatsFilter {
                    groups: segment(0),
                    environment: segment(1),
                    min_date: segment(2),
                    max_date: segment(3),
                    code: segment(4),
                }))
            }
            ["stats", ..] => Err(invalid()),
            [view, ..] => Err(RouteError::UnknownView(view.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::ServicesList { environment, groups } => {
                format!("/services/list/{}/{}", environment, groups)
            }
            Route::ServiceNew { environment, groups } => {
                format!("/services/new/{}/{}", environment, groups)
            }
            Route::ServiceEdit {
                environment,
                groups,
                id,
            } => format!("/services/edit/{}/{}/{}", environment, groups, id),
            // Long form only, so groups named "new" or "edit" survive a round trip
            Route::Environments { group } => format!("/environments/list/{}", group),
            Route::EnvironmentNew => "/environments/new".to_string(),
            Route::EnvironmentEdit { id } => format!("/environments/edit/{}", id),
            Route::Stats(f) => format!(
                "/stats/{}/{}/{}/{}/{}",
                f.groups, f.environment, f.min_date, f.max_date, f.code
            ),
        }
    }

    /// The equivalent route under a new group context
    ///
    /// Routes without a group context are returned unchanged.
    pub fn with_groups(&self, new_groups: &str) -> Route {
        let new_groups = new_groups.to_string();
        match self {
            Route::ServicesList { environment, .. } => Route::ServicesList {
                environment: environment.clone(),
                groups: new_groups,
            },
            Route::ServiceNew { environment, .. } => Route::ServiceNew {
                environment: environment.clone(),
                groups: new_groups,
            },
            Route::ServiceEdit { environment, id, .. } => Route::ServiceEdit {
                environment: environment.clone(),
                groups: new_groups,
                id: id.clone(),
            },
            Route::Environments { .. } => Route::Environments { group: new_groups },
            Route::Stats(filter) => Route::Stats(StatsFilter {
                groups: new_groups,
                ..filter.clone()
            }),
            Route::EnvironmentNew | Route::EnvironmentEdit { .. } => self.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the console to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records the visited routes
#[derive(Default)]
pub struct Location {
    history: Mutex<Vec<Route>>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for Location {
    fn navigate(&self, route: Route) {
        info!(path = %route, "Navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

/// Navigator forwarding requests to the console loop
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        info!(path = %route, "Navigation requested");
        if self.tx.send(route).is_err() {
            warn!("Console loop stopped, navigation dropped");
        }
    }
}
