// Service views: list with mock-group enrichment, edit, and creation

use super::context::ViewContext;
use super::edit::{EditForm, FormState};
use super::enrich::{Enrichment, EnrichmentReport};
use super::list::ListView;
use super::new_form::{DefaultRule, NewForm};
use crate::api::{ListQuery, Resource, ALL};
use crate::entity::Entity;
use crate::navigation::Route;
use crate::table::TableParams;
use serde_json::json;
use tracing::warn;

/// Default timeout for new services (milliseconds)
pub const DEFAULT_TIMEOUT_MS: i64 = 60_000;

fn services_list_route(environment: &str, groups: &str) -> Route {
    Route::ServicesList {
        environment: environment.to_string(),
        groups: groups.to_string(),
    }
}

/// Mock groups for a group context, logged and empty on failure
async fn load_mock_groups(ctx: &ViewContext, groups: &str) -> Vec<Entity> {
    let query = ListQuery::new().with("groups", groups);
    match ctx.backend.list(&Resource::MockGroups, &query).await {
        Ok(groups) => groups,
        Err(e) => {
            warn!(groups = %groups, error = %e, "Failed to load mock groups");
            Vec::new()
        }
    }
}

/// Services of one environment
pub struct ServicesList {
    ctx: ViewContext,
    environment: String,
    groups: String,
    list: ListView,
    enrichment: Option<Enrichment>,
}

impl ServicesList {
    pub const NAME: &'static str = "ServicesList";

    pub fn new(ctx: ViewContext, environment: impl Into<String>, groups: impl Into<String>) -> Self {
        let table = &ctx.config.table;
        let params = TableParams::new(table.page_size, &table.sort_key);
        Self {
            environment: environment.into(),
            groups: groups.into(),
            list: ListView::new("services", params),
            enrichment: None,
            ctx,
        }
    }

    /// Show the group filter, fetch the services, start enrichment
    pub async fn init(&mut self) {
        self.ctx.bus.show_filter(Some(&self.groups), Self::NAME);

        let resource = Resource::services(&self.environment);
        self.list
            .load(self.ctx.backend.list(&resource, &ListQuery::new()))
            .await;
        self.enrichment = Some(self.list.enrich_mock_groups(self.ctx.backend.clone()));
    }

    /// Wait until every mock-group lookup started by `init` has finished
    pub async fn wait_enriched(&mut self) -> EnrichmentReport {
        match self.enrichment.take() {
            Some(enrichment) => enrichment.wait().await,
            None => EnrichmentReport::default(),
        }
    }

    pub fn route(&self) -> Route {
        services_list_route(&self.environment, &self.groups)
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView {
        &mut self.list
    }
}

/// Edit form of one service
pub struct ServiceEdit {
    ctx: ViewContext,
    environment: String,
    groups: String,
    form: EditForm,
    environments: Vec<Entity>,
    mock_groups: Vec<Entity>,
}

impl ServiceEdit {
    pub const NAME: &'static str = "ServiceEdit";
    pub const TITLE: &'static str = "Update a service";

    pub fn new(
        ctx: ViewContext,
        environment: impl Into<String>,
        groups: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        let environment = environment.into();
        let groups = groups.into();
        let parent = services_list_route(&environment, &groups);

        // The service payload does not carry its environment; the route does
        let env_name = environment.clone();
        let form = EditForm::new(ctx.clone(), Resource::services(&environment), id, parent)
            .with_normalizer(Box::new(move |service| {
                service.set("environmentName", env_name.clone());
            }));

        Self {
            ctx,
            environment,
            groups,
            form,
            environments: Vec::new(),
            mock_groups: Vec::new(),
        }
    }

    /// Hide the group filter, load the service, then its select options
    pub async fn init(&mut self) {
        self.ctx.bus.show_filter(None, Self::NAME);

        self.form.load().await;
        if *self.form.state() != FormState::Ready {
            return;
        }

        let options_query = ListQuery::new().with("groups", self.groups.as_str());
        let (environments, mock_groups) = futures::join!(
            self.ctx
                .backend
                .list(&Resource::EnvironmentOptions, &options_query),
            load_mock_groups(&self.ctx, &self.groups),
        );
        self.environments = environments.unwrap_or_else(|e| {
            warn!(groups = %self.groups, error = %e, "Failed to load environment options");
            Vec::new()
        });
        self.mock_groups = mock_groups;
    }

    pub fn route(&self) -> Route {
        Route::ServiceEdit {
            environment: self.environment.clone(),
            groups: self.groups.clone(),
            id: self.form.id().to_string(),
        }
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditForm {
        &mut self.form
    }

    pub fn environments(&self) -> &[Entity] {
        &self.environments
    }

    pub fn mock_groups(&self) -> &[Entity] {
        &self.mock_groups
    }

    /// Mock server address shown next to the form
    pub fn host_and_port(&self) -> (&str, u16) {
        let location = &self.ctx.config.location;
        (&location.host, location.port)
    }
}

/// Defaults for a service created under `environment`
pub fn new_service_defaults(environment: &str) -> Entity {
    Entity::from_fields([
        ("useMockGroup", json!(false)),
        ("timeoutms", json!(DEFAULT_TIMEOUT_MS)),
        ("recordContentData", json!(true)),
        ("recordData", json!(true)),
        ("environmentName", json!(environment)),
        ("typeRequest", json!("SOAP")),
        ("httpMethod", json!("POST")),
    ])
}

/// Creation form of a service
pub struct ServiceNew {
    ctx: ViewContext,
    environment: String,
    groups: String,
    form: NewForm,
    mock_groups: Vec<Entity>,
}

impl ServiceNew {
    pub const NAME: &'static str = "ServiceNew";
    pub const TITLE: &'static str = "Insert new service";

    pub fn new(ctx: ViewContext, environment: impl Into<String>, groups: impl Into<String>) -> Self {
        let environment = environment.into();
        let groups = groups.into();
        let form = NewForm::new(
            ctx.clone(),
            Resource::services(&environment),
            services_list_route(&environment, &groups),
            new_service_defaults(&environment),
        )
        // SOAP is always carried over POST
        .with_rule(DefaultRule::new("typeRequest", "SOAP", "httpMethod", "POST"));

        Self {
            ctx,
            environment,
            groups,
            form,
            mock_groups: Vec::new(),
        }
    }

    /// Hide the group filter and load every mock group for the select box
    pub async fn init(&mut self) {
        self.ctx.bus.show_filter(None, Self::NAME);
        self.mock_groups = load_mock_groups(&self.ctx, ALL).await;
    }

    pub fn route(&self) -> Route {
        Route::ServiceNew {
            environment: self.environment.clone(),
            groups: self.groups.clone(),
        }
    }

    pub fn form(&self) -> &NewForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewForm {
        &mut self.form
    }

    pub fn mock_groups(&self) -> &[Entity] {
        &self.mock_groups
    }

    pub fn host_and_port(&self) -> (&str, u16) {
        let location = &self.ctx.config.location;
        (&location.host, location.port)
    }
}
