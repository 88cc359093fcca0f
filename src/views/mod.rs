// View models for the console screens

mod context;
mod edit;
mod enrich;
mod environments;
mod list;
mod new_form;
mod services;
mod stats;

#[cfg(test)]
mod tests;

pub use context::{Alerter, StderrAlerter, ViewContext};
pub use edit::{EditForm, FormError, FormState, Normalizer};
pub use enrich::{Enrichment, EnrichmentReport};
pub use environments::{
    new_environment_defaults, yes_no_flags, EnvironmentEdit, EnvironmentNew, EnvironmentsList,
};
pub use list::{ListState, ListView};
pub use new_form::{DefaultRule, NewForm};
pub use services::{new_service_defaults, ServiceEdit, ServiceNew, ServicesList, DEFAULT_TIMEOUT_MS};
pub use stats::StatsList;

use crate::navigation::Route;

/// The view model behind the current route
pub enum ActiveView {
    ServicesList(ServicesList),
    ServiceEdit(ServiceEdit),
    ServiceNew(ServiceNew),
    EnvironmentsList(EnvironmentsList),
    EnvironmentEdit(EnvironmentEdit),
    EnvironmentNew(EnvironmentNew),
    Stats(StatsList),
}

impl ActiveView {
    /// Build (but do not initialise) the view model for `route`
    pub fn for_route(ctx: ViewContext, route: &Route) -> Self {
        match route {
            Route::ServicesList {
                environment,
                groups,
            } => ActiveView::ServicesList(ServicesList::new(ctx, environment, groups)),
            Route::ServiceEdit {
                environment,
                groups,
                id,
            } => ActiveView::ServiceEdit(ServiceEdit::new(ctx, environment, groups, id)),
            Route::ServiceNew {
                environment,
                groups,
            } => ActiveView::ServiceNew(ServiceNew::new(ctx, environment, groups)),
            Route::Environments { group } => {
                ActiveView::EnvironmentsList(EnvironmentsList::new(ctx, group))
            }
            Route::EnvironmentEdit { id } => {
                ActiveView::EnvironmentEdit(EnvironmentEdit::new(ctx, id))
            }
            Route::EnvironmentNew => ActiveView::EnvironmentNew(EnvironmentNew::new(ctx)),
            Route::Stats(filter) => ActiveView::Stats(StatsList::new(ctx, filter.clone())),
        }
    }

    /// Announce filter visibility and issue the initial fetches
    pub async fn init(&mut self) {
        match self {
            ActiveView::ServicesList(v) => v.init().await,
            ActiveView::ServiceEdit(v) => v.init().await,
            ActiveView::ServiceNew(v) => v.init().await,
            ActiveView::EnvironmentsList(v) => v.init().await,
            ActiveView::EnvironmentEdit(v) => v.init().await,
            ActiveView::EnvironmentNew(v) => v.init().await,
            ActiveView::Stats(v) => v.init().await,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            ActiveView::ServicesList(v) => v.route(),
            ActiveView::ServiceEdit(v) => v.route(),
            ActiveView::ServiceNew(v) => v.route(),
            ActiveView::EnvironmentsList(v) => v.route(),
            ActiveView::EnvironmentEdit(v) => v.route(),
            ActiveView::EnvironmentNew(v) => v.route(),
            ActiveView::Stats(v) => v.route(),
        }
    }

    /// Route this view re-opens under when the group context changes
    pub fn reload_route(&self, groups: &str) -> Route {
        self.route().with_groups(groups)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActiveView::ServicesList(_) => ServicesList::NAME,
            ActiveView::ServiceEdit(_) => ServiceEdit::NAME,
            ActiveView::ServiceNew(_) => ServiceNew::NAME,
            ActiveView::EnvironmentsList(_) => EnvironmentsList::NAME,
            ActiveView::EnvironmentEdit(_) => EnvironmentEdit::NAME,
            ActiveView::EnvironmentNew(_) => EnvironmentNew::NAME,
            ActiveView::Stats(_) => StatsList::NAME,
        }
    }

    /// List projection for list-type views
    pub fn list(&self) -> Option<&ListView> {
        match self {
            ActiveView::ServicesList(v) => Some(v.list()),
            ActiveView::EnvironmentsList(v) => Some(v.list()),
            ActiveView::Stats(v) => Some(v.list()),
            _ => None,
        }
    }
}
