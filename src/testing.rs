// In-memory collaborators for view-model tests

use crate::api::{ApiError, ApiResult, ConsoleBackend, ListQuery, Resource, StatsQuery};
use crate::bus::NotificationBus;
use crate::config::ConsoleConfig;
use crate::entity::Entity;
use crate::navigation::Location;
use crate::views::{Alerter, ViewContext};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    collections: HashMap<String, Vec<Entity>>,
    entities: HashMap<String, Entity>,
    stats: Vec<Entity>,
    failures: HashMap<String, ApiError>,
    calls: Vec<String>,
    writes: Vec<(String, Entity)>,
}

/// Backend answering from canned data; failures keyed by `"METHOD path"`
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_collection(&self, resource: &Resource, items: Vec<Entity>) {
        self.state
            .lock()
            .unwrap()
            .collections
            .insert(resource.path(), items);
    }

    pub fn with_entity(&self, resource: &Resource, id: &str, entity: Entity) {
        self.state
            .lock()
            .unwrap()
            .entities
            .insert(resource.member_path(id), entity);
    }

    pub fn with_stats(&self, records: Vec<Entity>) {
        self.state.lock().unwrap().stats = records;
    }

    /// Make `"METHOD path"` answer with a server error
    pub fn fail(&self, call: &str, status: u16, message: &str) {
        self.state.lock().unwrap().failures.insert(
            call.to_string(),
            ApiError::Server {
                status,
                message: message.to_string(),
            },
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Bodies sent by create/update, as `("METHOD path", entity)`
    pub fn writes(&self) -> Vec<(String, Entity)> {
        self.state.lock().unwrap().writes.clone()
    }

    fn record(&self, method: &str, path: &str, query: &ListQuery) -> ApiResult<()> {
        let key = format!("{} {}", method, path);
        let mut state = self.state.lock().unwrap();
        let logged = if query.is_empty() {
            key.clone()
        } else {
            let pairs: Vec<String> = query
                .params()
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{}?{}", key, pairs.join("&"))
        };
        state.calls.push(logged);
        match state.failures.get(&key) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConsoleBackend for FakeBackend {
    async fn list(&self, resource: &Resource, query: &ListQuery) -> ApiResult<Vec<Entity>> {
        let path = resource.path();
        self.record("GET", &path, query)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .collections
            .get(&path)
            .cloned()
            .unwrap_or_default())
    }

    async fn get(&self, resource: &Resource, id: &str) -> ApiResult<Entity> {
        let path = resource.member_path(id);
        self.record("GET", &path, &ListQuery::new())?;
        self.state
            .lock()
            .unwrap()
            .entities
            .get(&path)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: format!("{} not found", path),
            })
    }

    async fn create(&self, resource: &Resource, entity: &Entity) -> ApiResult<()> {
        let path = resource.path();
        self.record("POST", &path, &ListQuery::new())?;
        self.state
            .lock()
            .unwrap()
            .writes
            .push((format!("POST {}", path), entity.clone()));
        Ok(())
    }

    async fn update(&self, resource: &Resource, id: &str, entity: &Entity) -> ApiResult<()> {
        let path = resource.member_path(id);
        self.record("PUT", &path, &ListQuery::new())?;
        self.state
            .lock()
            .unwrap()
            .writes
            .push((format!("PUT {}", path), entity.clone()));
        Ok(())
    }

    async fn delete(&self, resource: &Resource, id: &str) -> ApiResult<()> {
        let path = resource.member_path(id);
        self.record("DELETE", &path, &ListQuery::new())
    }

    async fn stats(&self, query: &StatsQuery) -> ApiResult<Vec<Entity>> {
        self.record("GET", &query.path(), &ListQuery::new())?;
        Ok(self.state.lock().unwrap().stats.clone())
    }
}

/// Alerter remembering every message
#[derive(Default)]
pub struct RecordingAlerter {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub struct TestContext {
    pub ctx: ViewContext,
    pub backend: Arc<FakeBackend>,
    pub location: Arc<Location>,
    pub alerter: Arc<RecordingAlerter>,
}

pub fn test_context() -> TestContext {
    let backend = FakeBackend::new();
    let location = Arc::new(Location::new());
    let alerter = Arc::new(RecordingAlerter::default());
    let ctx = ViewContext {
        backend: backend.clone(),
        bus: NotificationBus::default(),
        navigator: location.clone(),
        alerter: alerter.clone(),
        config: Arc::new(ConsoleConfig::default()),
    };
    TestContext {
        ctx,
        backend,
        location,
        alerter,
    }
}
