use anyhow::{Context, Result};
use mockconsole::api::HttpBackend;
use mockconsole::config::{apply_overrides, load_config, ConsoleConfig};
use mockconsole::console::Console;
use mockconsole::navigation::Route;
use mockconsole::views::{ActiveView, StderrAlerter};
use std::sync::Arc;
use tracing::info;

const DEFAULT_ROUTE: &str = "services/list/all/all";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mockconsole=info".into()),
        )
        .init();

    info!("Mock console starting...");

    let mut config = match std::env::var("CONSOLE_CONFIG") {
        Ok(path) => load_config(&path)?,
        Err(_) => ConsoleConfig::default(),
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    info!(backend = %config.backend.base_url, "Configuration loaded");

    let path = std::env::var("CONSOLE_ROUTE").unwrap_or_else(|_| DEFAULT_ROUTE.to_string());
    let route = Route::parse(&path).with_context(|| format!("Invalid route {}", path))?;

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let mut console = Console::new(backend, Arc::new(config), Arc::new(StderrAlerter));
    console.open(route).await;
    console.drain().await;

    if let Some(ActiveView::ServicesList(view)) = console.active_mut() {
        let report = view.wait_enriched().await;
        info!(resolved = report.resolved, failed = report.failed, "Mock groups resolved");
    }

    match console.active() {
        Some(ActiveView::ServiceEdit(view)) => print_entity(view.form().entity())?,
        Some(ActiveView::EnvironmentEdit(view)) => print_entity(view.form().entity())?,
        Some(ActiveView::ServiceNew(view)) => print_entity(Some(view.form().entity()))?,
        Some(ActiveView::EnvironmentNew(view)) => print_entity(Some(view.form().entity()))?,
        Some(view) => {
            if let Some(list) = view.list() {
                let page = list.page();
                for item in &page.items {
                    let row = serde_json::to_string(item)?;
                    info!(row = %row, "Row");
                }
                info!(
                    total = page.total_matching,
                    page = page.page,
                    pages = page.page_count(),
                    "Page rendered"
                );
            }
        }
        None => {}
    }

    Ok(())
}

fn print_entity(entity: Option<&mockconsole::entity::Entity>) -> Result<()> {
    match entity {
        Some(entity) => {
            let json = serde_json::to_string(entity)?;
            info!(entity = %json, "Form loaded");
        }
        None => info!("Nothing loaded"),
    }
    Ok(())
}
