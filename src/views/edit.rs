use super::context::ViewContext;
use crate::api::{ApiError, ApiResult, Resource};
use crate::draft::Draft;
use crate::entity::Entity;
use crate::navigation::Route;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

/// Lifecycle of a form view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormState {
    Loading,
    /// The entity could not be fetched; `load` may be called again
    LoadFailed(String),
    Ready,
    Saving,
    Destroying,
    /// A save or destroy succeeded and the console moved to the parent route
    Navigated,
}

/// Why a form submission did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("cannot {action} while form is {state:?}")]
    NotReady {
        action: &'static str,
        state: FormState,
    },
    /// The backend rejected the request; the user has been alerted
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Adjusts a freshly fetched entity before its snapshot is taken
pub type Normalizer = Box<dyn Fn(&mut Entity) + Send + Sync>;

/// Edit form over one existing entity
///
/// ```text
/// Loading → Ready → Saving → Ready | Navigated
///                 → Destroying → Ready | Navigated
/// ```
pub struct EditForm {
    ctx: ViewContext,
    resource: Resource,
    id: String,
    parent: Route,
    normalize: Option<Normalizer>,
    draft: Option<Draft<Entity>>,
    state: FormState,
}

impl EditForm {
    pub fn new(ctx: ViewContext, resource: Resource, id: impl Into<String>, parent: Route) -> Self {
        Self {
            ctx,
            resource,
            id: id.into(),
            parent,
            normalize: None,
            draft: None,
            state: FormState::Loading,
        }
    }

    pub fn with_normalizer(mut self, normalize: Normalizer) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> &Route {
        &self.parent
    }

    /// Live (editable) copy, once loaded
    pub fn entity(&self) -> Option<&Entity> {
        self.draft.as_ref().map(Draft::live)
    }

    pub fn draft(&self) -> Option<&Draft<Entity>> {
        self.draft.as_ref()
    }

    /// Fetch the entity and snapshot it
    pub async fn load(&mut self) {
        self.state = FormState::Loading;
        match self.ctx.backend.get(&self.resource, &self.id).await {
            Ok(mut entity) => {
                if let Some(normalize) = &self.normalize {
                    normalize(&mut entity);
                }
                info!(resource = %self.resource, id = %self.id, "Entity loaded");
                self.draft = Some(Draft::new(entity));
                self.state = FormState::Ready;
            }
            Err(e) => {
                error!(resource = %self.resource, id = %self.id, error = %e, "Failed to load entity");
                self.state = FormState::LoadFailed(e.user_message());
            }
        }
    }

    /// True when the live copy equals the loaded snapshot (or nothing is loaded)
    pub fn is_clean(&self) -> bool {
        self.draft.as_ref().map_or(true, Draft::is_clean)
    }

    /// Edit one field of the live copy; ignored unless the form is ready
    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) -> bool {
        match (&self.state, self.draft.as_mut()) {
            (FormState::Ready, Some(draft)) => {
                draft.live_mut().set(field, value);
                true
            }
            _ => {
                warn!(field = %field, state = ?self.state, "Edit ignored, form not ready");
                false
            }
        }
    }

    /// `PUT` the live copy; navigate to the parent on success, alert on failure
    pub async fn save(&mut self) -> Result<(), FormError> {
        let (id, live) = match (&self.state, &self.draft) {
            (FormState::Ready, Some(draft)) => (
                draft.base().id().unwrap_or_else(|| self.id.clone()),
                draft.live().clone(),
            ),
            _ => return Err(self.not_ready("save")),
        };

        self.state = FormState::Saving;
        let result = self.ctx.backend.update(&self.resource, &id, &live).await;
        self.finish("save", result)
    }

    /// `DELETE` the snapshot's identity; navigate on success, alert on failure
    pub async fn destroy(&mut self) -> Result<(), FormError> {
        let id = match (&self.state, &self.draft) {
            (FormState::Ready, Some(draft)) => draft.base().id().unwrap_or_else(|| self.id.clone()),
            _ => return Err(self.not_ready("destroy")),
        };

        self.state = FormState::Destroying;
        let result = self.ctx.backend.delete(&self.resource, &id).await;
        self.finish("destroy", result)
    }

    fn finish(&mut self, action: &str, result: ApiResult<()>) -> Result<(), FormError> {
        match result {
            Ok(()) => {
                info!(resource = %self.resource, id = %self.id, action = %action, "Form submitted");
                self.state = FormState::Navigated;
                self.ctx.navigator.navigate(self.parent.clone());
                Ok(())
            }
            Err(e) => {
                warn!(resource = %self.resource, id = %self.id, action = %action, error = %e, "Form submit failed");
                self.ctx.alerter.alert(&e.user_message());
                self.state = FormState::Ready;
                Err(FormError::Api(e))
            }
        }
    }

    fn not_ready(&self, action: &'static str) -> FormError {
        warn!(action = %action, state = ?self.state, "Form not ready");
        FormError::NotReady {
            action,
            state: self.state.clone(),
        }
    }
}
