use crate::api::{mock_group_name, SharedBackend};
use crate::entity::Entity;
use futures::future::join_all;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Outcome of a completed enrichment pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub resolved: usize,
    pub failed: usize,
}

/// In-flight mock-group name lookups for a list
///
/// Lookups run detached: dropping this handle does not cancel them, it only
/// gives up the ability to wait for the "fully enriched" point.
pub struct Enrichment {
    tasks: Vec<JoinHandle<bool>>,
}

impl Enrichment {
    /// Spawn one `GET mockgroups/{mockGroupId}` per item with `useMockGroup: true`
    ///
    /// On success the item's `mockName` is set. A failed lookup is logged and
    /// leaves the item untouched.
    pub fn spawn_mock_groups(items: Arc<RwLock<Vec<Entity>>>, backend: SharedBackend) -> Self {
        let targets: Vec<(usize, Value)> = items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .enumerate()
            .filter(|(_, item)| item.get_bool("useMockGroup") == Some(true))
            .filter_map(|(index, item)| {
                item.get("mockGroupId")
                    .filter(|v| !v.is_null())
                    .map(|v| (index, v.clone()))
            })
            .collect();

        let tasks = targets
            .into_iter()
            .map(|(index, group_ref)| {
                let items = Arc::clone(&items);
                let backend = Arc::clone(&backend);
                tokio::spawn(async move { resolve_one(items, backend, index, group_ref).await })
            })
            .collect();

        Self { tasks }
    }

    /// Number of lookups launched
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every lookup to finish
    pub async fn wait(self) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();
        for outcome in join_all(self.tasks).await {
            match outcome {
                Ok(true) => report.resolved += 1,
                Ok(false) => report.failed += 1,
                Err(e) => {
                    warn!(error = %e, "Mock group lookup task failed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

async fn resolve_one(
    items: Arc<RwLock<Vec<Entity>>>,
    backend: SharedBackend,
    index: usize,
    group_ref: Value,
) -> bool {
    let group_id = match &group_ref {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match mock_group_name(backend.as_ref(), &group_id).await {
        Ok(name) => {
            let mut items = items.write().unwrap_or_else(PoisonError::into_inner);
            // The list may have been reloaded meanwhile; only touch the same item
            match items.get_mut(index) {
                Some(item) if item.get("mockGroupId") == Some(&group_ref) => {
                    debug!(mock_group_id = %group_id, name = %name, "Resolved mock group");
                    item.set("mockName", name);
                    true
                }
                _ => false,
            }
        }
        Err(e) => {
            warn!(mock_group_id = %group_id, error = %e, "Failed to resolve mock group");
            false
        }
    }
}
