// Environment views: list, edit, and creation

use super::context::ViewContext;
use super::edit::EditForm;
use super::list::ListView;
use super::new_form::NewForm;
use crate::api::{ListQuery, Resource, ALL};
use crate::entity::Entity;
use crate::navigation::Route;
use crate::table::TableParams;
use serde_json::json;
use tracing::warn;

/// Retention flags edited as "yes"/"no" selects
pub const YES_NO_FIELDS: [&str; 2] = ["recordXmlData", "recordData"];

fn parent_route() -> Route {
    Route::Environments {
        group: ALL.to_string(),
    }
}

/// Convert boolean retention flags to the "yes"/"no" form values
///
/// Values that are already strings (or absent) are left as they are.
pub fn yes_no_flags(environment: &mut Entity) {
    for field in YES_NO_FIELDS {
        if let Some(flag) = environment.get_bool(field) {
            let text = if flag { "yes" } else { "no" };
            environment.set(field, text);
        }
    }
}

/// Group list for the environment forms, logged and empty on failure
async fn load_groups(ctx: &ViewContext) -> Vec<Entity> {
    match ctx.backend.list(&Resource::Groups, &ListQuery::new()).await {
        Ok(groups) => groups,
        Err(e) => {
            warn!(error = %e, "Failed to load groups");
            Vec::new()
        }
    }
}

/// Environments of one group
pub struct EnvironmentsList {
    ctx: ViewContext,
    group: String,
    list: ListView,
}

impl EnvironmentsList {
    pub const NAME: &'static str = "EnvironmentsList";

    pub fn new(ctx: ViewContext, group: impl Into<String>) -> Self {
        let table = &ctx.config.table;
        let params = TableParams::new(table.page_size, &table.sort_key);
        Self {
            group: group.into(),
            list: ListView::new("environments", params),
            ctx,
        }
    }

    pub async fn init(&mut self) {
        self.ctx.bus.show_filter(Some(&self.group), Self::NAME);

        let query = ListQuery::new().with("group", self.group.as_str());
        self.list
            .load(self.ctx.backend.list(&Resource::Environments, &query))
            .await;
    }

    pub fn route(&self) -> Route {
        Route::Environments {
            group: self.group.clone(),
        }
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView {
        &mut self.list
    }
}

/// Edit form of one environment
pub struct EnvironmentEdit {
    ctx: ViewContext,
    form: EditForm,
    groups: Vec<Entity>,
}

impl EnvironmentEdit {
    pub const NAME: &'static str = "EnvironmentEdit";

    pub fn new(ctx: ViewContext, id: impl Into<String>) -> Self {
        let form = EditForm::new(ctx.clone(), Resource::Environments, id, parent_route())
            .with_normalizer(Box::new(yes_no_flags));
        Self {
            ctx,
            form,
            groups: Vec::new(),
        }
    }

    pub async fn init(&mut self) {
        self.ctx.bus.show_filter(None, Self::NAME);
        self.form.load().await;
        self.groups = load_groups(&self.ctx).await;
    }

    pub fn route(&self) -> Route {
        Route::EnvironmentEdit {
            id: self.form.id().to_string(),
        }
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditForm {
        &mut self.form
    }

    pub fn groups(&self) -> &[Entity] {
        &self.groups
    }
}

/// Retention defaults for a new environment
pub fn new_environment_defaults() -> Entity {
    Entity::from_fields([
        ("hourRecordXmlDataMin", json!(6)),
        ("hourRecordXmlDataMax", json!(22)),
        ("nbDayKeepXmlData", json!(2)),
        ("nbDayKeepAllData", json!(4)),
        ("recordXmlData", json!("yes")),
        ("recordData", json!("yes")),
    ])
}

/// Creation form of an environment
pub struct EnvironmentNew {
    ctx: ViewContext,
    form: NewForm,
    groups: Vec<Entity>,
}

impl EnvironmentNew {
    pub const NAME: &'static str = "EnvironmentNew";

    /// Defaults are set synchronously; nothing is fetched
    pub fn new(ctx: ViewContext) -> Self {
        let form = NewForm::new(
            ctx.clone(),
            Resource::Environments,
            parent_route(),
            new_environment_defaults(),
        );
        Self {
            ctx,
            form,
            groups: Vec::new(),
        }
    }

    pub async fn init(&mut self) {
        self.ctx.bus.show_filter(None, Self::NAME);
        self.load_groups().await;
    }

    pub async fn load_groups(&mut self) {
        self.groups = load_groups(&self.ctx).await;
    }

    pub fn route(&self) -> Route {
        Route::EnvironmentNew
    }

    pub fn form(&self) -> &NewForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewForm {
        &mut self.form
    }

    pub fn groups(&self) -> &[Entity] {
        &self.groups
    }
}
