use super::context::ViewContext;
use super::edit::{FormError, FormState};
use crate::api::Resource;
use crate::entity::Entity;
use crate::navigation::Route;
use serde_json::Value;
use tracing::{debug, info, warn};

/// One-way conditional default: `trigger_field` changing to `trigger_value`
/// forces `target_field` to `forced_value`
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultRule {
    pub trigger_field: String,
    pub trigger_value: Value,
    pub target_field: String,
    pub forced_value: Value,
}

impl DefaultRule {
    pub fn new(
        trigger_field: impl Into<String>,
        trigger_value: impl Into<Value>,
        target_field: impl Into<String>,
        forced_value: impl Into<Value>,
    ) -> Self {
        Self {
            trigger_field: trigger_field.into(),
            trigger_value: trigger_value.into(),
            target_field: target_field.into(),
            forced_value: forced_value.into(),
        }
    }
}

/// Creation form initialised from defaults
pub struct NewForm {
    ctx: ViewContext,
    resource: Resource,
    parent: Route,
    entity: Entity,
    rules: Vec<DefaultRule>,
    state: FormState,
}

impl NewForm {
    pub fn new(ctx: ViewContext, resource: Resource, parent: Route, defaults: Entity) -> Self {
        Self {
            ctx,
            resource,
            parent,
            entity: defaults,
            rules: Vec::new(),
            state: FormState::Ready,
        }
    }

    pub fn with_rule(mut self, rule: DefaultRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn parent(&self) -> &Route {
        &self.parent
    }

    /// Edit one field, then fire the rules watching it
    ///
    /// Rules fire only on an actual change: setting a field to its current
    /// value is not a change event.
    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) {
        let value = value.into();
        let previous = self.entity.set(field, value.clone());
        if previous.as_ref() == Some(&value) {
            return;
        }

        for rule in self.rules.iter().filter(|r| r.trigger_field == field) {
            if rule.trigger_value == value {
                debug!(
                    trigger = %rule.trigger_field,
                    target = %rule.target_field,
                    "Applying conditional default"
                );
                self.entity
                    .set(rule.target_field.clone(), rule.forced_value.clone());
            }
        }
    }

    /// `POST` the entity; navigate to the parent on success, alert on failure
    pub async fn save(&mut self) -> Result<(), FormError> {
        if self.state != FormState::Ready {
            warn!(state = ?self.state, "Form not ready");
            return Err(FormError::NotReady {
                action: "save",
                state: self.state.clone(),
            });
        }

        self.state = FormState::Saving;
        match self.ctx.backend.create(&self.resource, &self.entity).await {
            Ok(()) => {
                info!(resource = %self.resource, "Entity created");
                self.state = FormState::Navigated;
                self.ctx.navigator.navigate(self.parent.clone());
                Ok(())
            }
            Err(e) => {
                warn!(resource = %self.resource, error = %e, "Failed to create entity");
                self.ctx.alerter.alert(&e.user_message());
                self.state = FormState::Ready;
                Err(FormError::Api(e))
            }
        }
    }
}
