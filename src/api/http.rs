use super::{ApiError, ApiResult, ConsoleBackend, ListQuery, Resource, StatsQuery};
use crate::config::BackendConfig;
use crate::entity::{Entity, ListBody};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the console's REST backend
pub struct HttpBackend {
    http_client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against a custom base URL (for testing with a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&BackendConfig {
            base_url: base_url.into(),
            ..BackendConfig::default()
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        check_response_status(response).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(url, request).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Decode a collection body, enveloped or bare
    async fn fetch_list(&self, url: &str, request: RequestBuilder) -> ApiResult<Vec<Entity>> {
        let body: ListBody = self.fetch_json(url, request).await?;
        body.into_items().ok_or_else(|| ApiError::Decode {
            url: url.to_string(),
            message: "response carries no list".to_string(),
        })
    }
}

#[async_trait]
impl ConsoleBackend for HttpBackend {
    async fn list(&self, resource: &Resource, query: &ListQuery) -> ApiResult<Vec<Entity>> {
        let url = self.url(&resource.path());
        debug!(url = %url, params = ?query.params(), "GET collection");

        let mut request = self.http_client.get(&url);
        if !query.is_empty() {
            request = request.query(query.params());
        }
        self.fetch_list(&url, request).await
    }

    async fn get(&self, resource: &Resource, id: &str) -> ApiResult<Entity> {
        let url = self.url(&resource.member_path(id));
        debug!(url = %url, "GET entity");
        self.fetch_json(&url, self.http_client.get(&url)).await
    }

    async fn create(&self, resource: &Resource, entity: &Entity) -> ApiResult<()> {
        let url = self.url(&resource.path());
        debug!(url = %url, "POST entity");
        self.send(&url, self.http_client.post(&url).json(entity)).await?;
        Ok(())
    }

    async fn update(&self, resource: &Resource, id: &str, entity: &Entity) -> ApiResult<()> {
        let url = self.url(&resource.member_path(id));
        debug!(url = %url, "PUT entity");
        self.send(&url, self.http_client.put(&url).json(entity)).await?;
        Ok(())
    }

    async fn delete(&self, resource: &Resource, id: &str) -> ApiResult<()> {
        let url = self.url(&resource.member_path(id));
        debug!(url = %url, "DELETE entity");
        self.send(&url, self.http_client.delete(&url)).await?;
        Ok(())
    }

    async fn stats(&self, query: &StatsQuery) -> ApiResult<Vec<Entity>> {
        let url = self.url(&query.path());
        // Unix millis; every call gets a fresh URL so intermediaries never cache
        let call = chrono::Utc::now().timestamp_millis().to_string();
        let request = self.http_client.get(&url).query(&[
            ("sSearch", query.search.clone()),
            ("iDisplayStart", query.display_start.to_string()),
            ("iDisplayLength", query.display_length.to_string()),
            ("call", call),
        ]);
        debug!(url = %url, "GET stats");
        self.fetch_list(&url, request).await
    }
}

/// Map non-2xx responses to `ApiError::Server`, keeping the body as the user-facing message
async fn check_response_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };

    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}
