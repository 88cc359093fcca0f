// REST backend contract and HTTP implementation

mod error;
mod http;
mod resource;

pub use error::{ApiError, ApiResult};
pub use http::HttpBackend;
pub use resource::{ListQuery, Resource, StatsQuery, ALL};

use crate::entity::Entity;
use async_trait::async_trait;
use std::sync::Arc;

/// Console backend operations used by the view models
///
/// Implemented over HTTP by [`HttpBackend`]; tests substitute an in-memory fake.
#[async_trait]
pub trait ConsoleBackend: Send + Sync {
    /// `GET /{resource}?{query}` → `{"data": [...]}`
    async fn list(&self, resource: &Resource, query: &ListQuery) -> ApiResult<Vec<Entity>>;

    /// `GET /{resource}/{id}`
    async fn get(&self, resource: &Resource, id: &str) -> ApiResult<Entity>;

    /// `POST /{resource}`
    async fn create(&self, resource: &Resource, entity: &Entity) -> ApiResult<()>;

    /// `PUT /{resource}/{id}`
    async fn update(&self, resource: &Resource, id: &str, entity: &Entity) -> ApiResult<()>;

    /// `DELETE /{resource}/{id}`
    async fn delete(&self, resource: &Resource, id: &str) -> ApiResult<()>;

    /// Request-log listing (read-only)
    async fn stats(&self, query: &StatsQuery) -> ApiResult<Vec<Entity>>;
}

pub type SharedBackend = Arc<dyn ConsoleBackend>;

/// Resolve a mock group's display name (`GET /mockgroups/{id}` → `{"name": ...}`)
pub async fn mock_group_name(backend: &dyn ConsoleBackend, group_id: &str) -> ApiResult<String> {
    let group = backend.get(&Resource::MockGroups, group_id).await?;
    group
        .get_str("name")
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode {
            url: Resource::MockGroups.member_path(group_id),
            message: "mock group has no name".to_string(),
        })
}
