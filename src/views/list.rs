use super::enrich::Enrichment;
use crate::api::{ApiResult, SharedBackend};
use crate::entity::Entity;
use crate::table::{project, PageResult, SortSpec, TableParams};
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{error, info};

/// Load state of a list view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready,
    /// The fetch failed; the view stays empty
    Failed(String),
}

/// Fetched collection bound to table controls
///
/// The projection is recomputed from the current items and params on every
/// `page()` call, so enrichment results show up without a reload.
pub struct ListView {
    label: String,
    items: Arc<RwLock<Vec<Entity>>>,
    params: TableParams,
    state: ListState,
}

impl ListView {
    pub fn new(label: impl Into<String>, params: TableParams) -> Self {
        Self {
            label: label.into(),
            items: Arc::new(RwLock::new(Vec::new())),
            params,
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Await a single collection fetch and store the result
    ///
    /// Failures are logged only; there is no retry.
    pub async fn load<F>(&mut self, fetch: F)
    where
        F: Future<Output = ApiResult<Vec<Entity>>>,
    {
        self.state = ListState::Loading;
        match fetch.await {
            Ok(items) => {
                info!(list = %self.label, count = items.len(), "List loaded");
                *self.items.write().unwrap_or_else(PoisonError::into_inner) = items;
                self.state = ListState::Ready;
            }
            Err(e) => {
                error!(list = %self.label, error = %e, "Failed to load list");
                self.state = ListState::Failed(e.to_string());
            }
        }
    }

    /// Start resolving mock-group names for the loaded items
    pub fn enrich_mock_groups(&self, backend: SharedBackend) -> Enrichment {
        Enrichment::spawn_mock_groups(Arc::clone(&self.items), backend)
    }

    /// Copy of the full (unfiltered) collection
    pub fn items(&self) -> Vec<Entity> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current page of the filtered, sorted collection
    pub fn page(&self) -> PageResult {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        project(&items, &self.params.request())
    }

    pub fn params(&self) -> &TableParams {
        &self.params
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.params.set_filter(filter);
    }

    pub fn set_page(&mut self, page: usize) {
        self.params.set_page(page);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.params.set_page_size(page_size);
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.params.set_sort(sort);
    }
}
