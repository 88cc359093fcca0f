use super::*;
use crate::api::{Resource, StatsQuery};
use crate::bus::ConsoleEvent;
use crate::entity::Entity;
use crate::navigation::{Route, StatsFilter};
use crate::testing::test_context;
use serde_json::json;

fn service(id: &str, name: &str) -> Entity {
    Entity::from_fields([
        ("id", json!(id)),
        ("name", json!(name)),
        ("useMockGroup", json!(false)),
    ])
}

fn grouped_service(id: &str, name: &str, group: &str) -> Entity {
    Entity::from_fields([
        ("id", json!(id)),
        ("name", json!(name)),
        ("useMockGroup", json!(true)),
        ("mockGroupId", json!(group)),
    ])
}

// ─── ServicesList ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_services_list_loads_once_and_pages() {
    let t = test_context();
    let services: Vec<Entity> = (1..=25)
        .rev()
        .map(|i| service(&format!("s{}", i), &format!("service-{:02}", i)))
        .collect();
    t.backend.with_collection(&Resource::services("prod"), services);

    let mut view = ServicesList::new(t.ctx.clone(), "prod", "all");
    view.init().await;

    assert_eq!(t.backend.call_count("GET services/prod"), 1);
    assert_eq!(*view.list().state(), ListState::Ready);

    let page = view.list().page();
    assert_eq!(page.total_matching, 25);
    assert_eq!(page.items[0].get_str("name"), Some("service-01"));
    assert_eq!(page.items[9].get_str("name"), Some("service-10"));

    view.list_mut().set_page(3);
    let page = view.list().page();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[4].get_str("name"), Some("service-25"));
}

#[tokio::test]
async fn test_services_list_filter_recomputes() {
    let t = test_context();
    t.backend.with_collection(
        &Resource::services("prod"),
        vec![service("1", "checkout"), service("2", "billing"), service("3", "Checkout-v2")],
    );

    let mut view = ServicesList::new(t.ctx.clone(), "prod", "all");
    view.init().await;

    view.list_mut().set_filter("CHECKOUT");
    let page = view.list().page();
    assert_eq!(page.total_matching, 2);
    assert_eq!(view.list().len(), 3);

    view.list_mut().set_filter("");
    assert_eq!(view.list().page().total_matching, 3);
}

#[tokio::test]
async fn test_services_list_enrichment_resolves_names() {
    let t = test_context();
    t.backend.with_collection(
        &Resource::services("prod"),
        vec![
            grouped_service("1", "checkout", "g1"),
            service("2", "billing"),
            grouped_service("3", "refund", "g2"),
        ],
    );
    t.backend.with_entity(
        &Resource::MockGroups,
        "g1",
        Entity::from_fields([("name", json!("Payments"))]),
    );
    t.backend.with_entity(
        &Resource::MockGroups,
        "g2",
        Entity::from_fields([("name", json!("Refunds"))]),
    );

    let mut view = ServicesList::new(t.ctx.clone(), "prod", "all");
    view.init().await;
    let report = view.wait_enriched().await;

    assert_eq!(report, EnrichmentReport { resolved: 2, failed: 0 });
    let items = view.list().items();
    assert_eq!(items[0].get_str("mockName"), Some("Payments"));
    assert_eq!(items[1].get("mockName"), None);
    assert_eq!(items[2].get_str("mockName"), Some("Refunds"));
    // Only flagged services trigger a lookup
    assert_eq!(t.backend.call_count("GET mockgroups/"), 2);
}

#[tokio::test]
async fn test_services_list_enrichment_failure_keeps_item() {
    let t = test_context();
    t.backend.with_collection(
        &Resource::services("prod"),
        vec![grouped_service("1", "checkout", "g1"), grouped_service("2", "refund", "gone")],
    );
    t.backend.with_entity(
        &Resource::MockGroups,
        "g1",
        Entity::from_fields([("name", json!("Payments"))]),
    );
    t.backend.fail("GET mockgroups/gone", 500, "boom");

    let mut view = ServicesList::new(t.ctx.clone(), "prod", "all");
    view.init().await;
    let report = view.wait_enriched().await;

    assert_eq!(report, EnrichmentReport { resolved: 1, failed: 1 });
    let page = view.list().page();
    assert_eq!(page.total_matching, 2);
    let refund = page
        .items
        .iter()
        .find(|s| s.get_str("name") == Some("refund"))
        .unwrap();
    assert_eq!(refund.get("mockName"), None);
    // Enrichment failures are never shown to the user
    assert!(t.alerter.messages().is_empty());
}

#[tokio::test]
async fn test_services_list_fetch_failure_is_logged_only() {
    let t = test_context();
    t.backend.fail("GET services/prod", 503, "backend down");

    let mut view = ServicesList::new(t.ctx.clone(), "prod", "all");
    view.init().await;

    assert!(matches!(view.list().state(), ListState::Failed(_)));
    assert!(view.list().is_empty());
    assert_eq!(view.list().page().total_matching, 0);
    assert!(t.alerter.messages().is_empty());
    assert_eq!(view.wait_enriched().await, EnrichmentReport::default());
    assert_eq!(t.backend.call_count("GET services/prod"), 1);
}

#[tokio::test]
async fn test_services_list_shows_group_filter() {
    let t = test_context();
    let mut rx = t.ctx.bus.subscribe();

    let mut view = ServicesList::new(t.ctx.clone(), "prod", "payments");
    view.init().await;

    assert_eq!(
        rx.try_recv().unwrap(),
        ConsoleEvent::ShowFilterControl {
            groups: Some("payments".to_string()),
            sender: "ServicesList".to_string(),
        }
    );
}

// ─── ServiceEdit ────────────────────────────────────────────────────────────

fn stored_service() -> Entity {
    Entity::from_fields([
        ("id", json!("s1")),
        ("description", json!("checkout")),
        ("timeoutms", json!(60000)),
        ("recordData", json!(true)),
    ])
}

#[tokio::test]
async fn test_service_edit_clean_after_load() {
    let t = test_context();
    t.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "all", "s1");
    assert!(view.form().is_clean());
    view.init().await;

    assert_eq!(*view.form().state(), FormState::Ready);
    assert!(view.form().is_clean());
    // Route environment is part of the snapshot
    assert_eq!(
        view.form().entity().unwrap().get_str("environmentName"),
        Some("prod")
    );
}

#[tokio::test]
async fn test_service_edit_dirty_for_each_field_type() {
    for (field, value) in [
        ("description", json!("checkout v2")),
        ("timeoutms", json!(1500)),
        ("recordData", json!(false)),
    ] {
        let t = test_context();
        t.backend
            .with_entity(&Resource::services("prod"), "s1", stored_service());
        let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "all", "s1");
        view.init().await;

        assert!(view.form_mut().set_field(field, value));
        assert!(!view.form().is_clean(), "{} change should be dirty", field);
    }
}

#[tokio::test]
async fn test_service_edit_loads_select_options() {
    let t = test_context();
    t.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());
    t.backend.with_collection(
        &Resource::EnvironmentOptions,
        vec![Entity::from_fields([("name", json!("prod"))])],
    );
    t.backend.with_collection(
        &Resource::MockGroups,
        vec![Entity::from_fields([("name", json!("Payments"))])],
    );

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "payments", "s1");
    view.init().await;

    assert_eq!(view.environments().len(), 1);
    assert_eq!(view.mock_groups().len(), 1);
    let calls = t.backend.calls();
    assert!(calls.contains(&"GET environments/options?groups=payments".to_string()));
    assert!(calls.contains(&"GET mockgroups?groups=payments".to_string()));
}

#[tokio::test]
async fn test_service_edit_save_navigates_to_list() {
    let t = test_context();
    t.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "payments", "s1");
    view.init().await;
    view.form_mut().set_field("description", "renamed");
    view.form_mut().save().await.unwrap();

    assert_eq!(*view.form().state(), FormState::Navigated);
    assert_eq!(
        t.location.current().unwrap().path(),
        "/services/list/prod/payments"
    );
    let writes = t.backend.writes();
    assert_eq!(writes[0].0, "PUT services/prod/s1");
    assert_eq!(writes[0].1.get_str("description"), Some("renamed"));
}

#[tokio::test]
async fn test_service_edit_save_failure_keeps_edits() {
    let t = test_context();
    t.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());
    t.backend
        .fail("PUT services/prod/s1", 409, "localTarget already used");

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "all", "s1");
    view.init().await;
    view.form_mut().set_field("description", "renamed");
    view.form_mut().set_field("timeoutms", 1000);

    let err = view.form_mut().save().await.unwrap_err();

    assert!(matches!(err, FormError::Api(_)));
    assert_eq!(t.alerter.messages(), vec!["localTarget already used".to_string()]);
    assert_eq!(*view.form().state(), FormState::Ready);
    assert_eq!(t.location.current(), None);
    let live = view.form().entity().unwrap();
    assert_eq!(live.get_str("description"), Some("renamed"));
    assert_eq!(live.get_i64("timeoutms"), Some(1000));
    assert!(!view.form().is_clean());
}

#[tokio::test]
async fn test_service_edit_destroy() {
    let t = test_context();
    t.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "all", "s1");
    view.init().await;
    // Destroy targets the snapshot identity even if the live id was edited
    view.form_mut().set_field("id", "other");
    view.form_mut().destroy().await.unwrap();

    assert_eq!(t.backend.call_count("DELETE services/prod/s1"), 1);
    assert_eq!(t.location.current().unwrap().path(), "/services/list/prod/all");
}

#[tokio::test]
async fn test_service_edit_destroy_failure_alerts() {
    let t = test_context();
    t.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());
    t.backend.fail("DELETE services/prod/s1", 500, "cannot delete");

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "all", "s1");
    view.init().await;
    assert!(view.form_mut().destroy().await.is_err());

    assert_eq!(t.alerter.messages(), vec!["cannot delete".to_string()]);
    assert_eq!(*view.form().state(), FormState::Ready);
    assert_eq!(t.location.current(), None);
}

#[tokio::test]
async fn test_service_edit_load_failure_is_recoverable() {
    let t = test_context();
    t.backend.fail("GET services/prod/s1", 500, "db offline");

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "all", "s1");
    view.init().await;

    assert_eq!(
        *view.form().state(),
        FormState::LoadFailed("db offline".to_string())
    );
    assert!(!view.form_mut().set_field("description", "x"));
    assert!(matches!(
        view.form_mut().save().await,
        Err(FormError::NotReady { action: "save", .. })
    ));
    // Side lists are not fetched for a form that failed to load
    assert_eq!(t.backend.call_count("GET mockgroups"), 0);

    // Retry once the backend is back
    let t2 = test_context();
    t2.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());
    let mut retry = EditForm::new(
        t2.ctx.clone(),
        Resource::services("prod"),
        "s1",
        Route::EnvironmentNew,
    );
    retry.load().await;
    assert_eq!(*retry.state(), FormState::Ready);
}

#[tokio::test]
async fn test_service_edit_hides_group_filter() {
    let t = test_context();
    let mut rx = t.ctx.bus.subscribe();
    t.backend
        .with_entity(&Resource::services("prod"), "s1", stored_service());

    let mut view = ServiceEdit::new(t.ctx.clone(), "prod", "all", "s1");
    view.init().await;

    assert_eq!(
        rx.try_recv().unwrap(),
        ConsoleEvent::ShowFilterControl {
            groups: None,
            sender: "ServiceEdit".to_string(),
        }
    );
}

// ─── ServiceNew ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_service_new_defaults() {
    let t = test_context();
    let view = ServiceNew::new(t.ctx.clone(), "prod", "all");
    let service = view.form().entity();

    assert_eq!(service.get_bool("useMockGroup"), Some(false));
    assert_eq!(service.get_i64("timeoutms"), Some(DEFAULT_TIMEOUT_MS));
    assert_eq!(service.get_bool("recordContentData"), Some(true));
    assert_eq!(service.get_bool("recordData"), Some(true));
    assert_eq!(service.get_str("environmentName"), Some("prod"));
    assert_eq!(service.get_str("typeRequest"), Some("SOAP"));
    assert_eq!(service.get_str("httpMethod"), Some("POST"));
    assert!(t.backend.calls().is_empty());
}

#[tokio::test]
async fn test_service_new_soap_forces_post_once_per_change() {
    let t = test_context();
    let mut view = ServiceNew::new(t.ctx.clone(), "prod", "all");
    let form = view.form_mut();

    form.set_field("typeRequest", "REST");
    form.set_field("httpMethod", "GET");
    assert_eq!(form.entity().get_str("httpMethod"), Some("GET"));

    // Change event to SOAP forces POST
    form.set_field("typeRequest", "SOAP");
    assert_eq!(form.entity().get_str("httpMethod"), Some("POST"));

    // Manual override afterwards is kept
    form.set_field("httpMethod", "PUT");
    assert_eq!(form.entity().get_str("httpMethod"), Some("PUT"));

    // Re-setting SOAP is not a change event
    form.set_field("typeRequest", "SOAP");
    assert_eq!(form.entity().get_str("httpMethod"), Some("PUT"));
}

#[tokio::test]
async fn test_service_new_save_creates() {
    let t = test_context();
    let mut view = ServiceNew::new(t.ctx.clone(), "prod", "payments");
    view.init().await;
    view.form_mut().set_field("localTarget", "checkout");
    view.form_mut().save().await.unwrap();

    let writes = t.backend.writes();
    assert_eq!(writes[0].0, "POST services/prod");
    assert_eq!(writes[0].1.get_str("localTarget"), Some("checkout"));
    assert_eq!(
        t.location.current().unwrap().path(),
        "/services/list/prod/payments"
    );
    assert!(t
        .backend
        .calls()
        .contains(&"GET mockgroups?groups=all".to_string()));
}

#[tokio::test]
async fn test_service_new_save_failure_keeps_values() {
    let t = test_context();
    t.backend.fail("POST services/prod", 400, "localTarget is required");

    let mut view = ServiceNew::new(t.ctx.clone(), "prod", "all");
    view.form_mut().set_field("description", "draft");
    assert!(view.form_mut().save().await.is_err());

    assert_eq!(t.alerter.messages(), vec!["localTarget is required".to_string()]);
    assert_eq!(*view.form().state(), FormState::Ready);
    assert_eq!(view.form().entity().get_str("description"), Some("draft"));
    assert_eq!(t.location.current(), None);
}

#[test]
fn test_host_and_port_from_config() {
    let t = test_context();
    let view = ServiceNew::new(t.ctx.clone(), "prod", "all");
    assert_eq!(view.host_and_port(), ("localhost", 9010));
}

// ─── Environments ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_environment_new_defaults_without_network() {
    let t = test_context();
    let view = EnvironmentNew::new(t.ctx.clone());
    let env = view.form().entity();

    assert_eq!(env.get_i64("hourRecordXmlDataMin"), Some(6));
    assert_eq!(env.get_i64("hourRecordXmlDataMax"), Some(22));
    assert_eq!(env.get_i64("nbDayKeepXmlData"), Some(2));
    assert_eq!(env.get_i64("nbDayKeepAllData"), Some(4));
    assert_eq!(env.get_str("recordXmlData"), Some("yes"));
    assert_eq!(env.get_str("recordData"), Some("yes"));
    assert!(t.backend.calls().is_empty());
}

#[tokio::test]
async fn test_environment_new_save() {
    let t = test_context();
    let mut view = EnvironmentNew::new(t.ctx.clone());
    view.init().await;
    view.form_mut().set_field("name", "staging");
    view.form_mut().save().await.unwrap();

    assert_eq!(t.backend.writes()[0].0, "POST environments");
    assert_eq!(t.location.current().unwrap().path(), "/environments/list/all");
}

#[tokio::test]
async fn test_environment_edit_yes_no_normalized_in_snapshot() {
    let t = test_context();
    t.backend.with_entity(
        &Resource::Environments,
        "7",
        Entity::from_fields([
            ("id", json!(7)),
            ("name", json!("prod")),
            ("recordXmlData", json!(true)),
            ("recordData", json!(false)),
        ]),
    );

    let mut view = EnvironmentEdit::new(t.ctx.clone(), "7");
    view.init().await;

    let env = view.form().entity().unwrap();
    assert_eq!(env.get_str("recordXmlData"), Some("yes"));
    assert_eq!(env.get_str("recordData"), Some("no"));
    assert!(view.form().is_clean());

    view.form_mut().set_field("recordData", "yes");
    assert!(!view.form().is_clean());
    view.form_mut().save().await.unwrap();
    assert_eq!(t.backend.writes()[0].0, "PUT environments/7");
    assert_eq!(t.location.current().unwrap().path(), "/environments/list/all");
}

#[test]
fn test_yes_no_leaves_strings_alone() {
    let mut env = Entity::from_fields([("recordXmlData", json!("no"))]);
    yes_no_flags(&mut env);
    assert_eq!(env.get_str("recordXmlData"), Some("no"));
    assert!(!env.contains("recordData"));
}

#[tokio::test]
async fn test_environments_list_group_query() {
    let t = test_context();
    t.backend.with_collection(
        &Resource::Environments,
        vec![
            Entity::from_fields([("name", json!("prod"))]),
            Entity::from_fields([("name", json!("dev"))]),
        ],
    );

    let mut view = EnvironmentsList::new(t.ctx.clone(), "billing");
    view.init().await;

    assert_eq!(t.backend.calls(), vec!["GET environments?group=billing".to_string()]);
    let page = view.list().page();
    assert_eq!(page.items[0].get_str("name"), Some("dev"));
}

// ─── Stats ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_stats_query_from_filter() {
    let t = test_context();
    t.backend.with_stats(vec![
        Entity::from_fields([("serviceAction", json!("checkout")), ("status", json!(200))]),
        Entity::from_fields([("serviceAction", json!("refund")), ("status", json!(500))]),
    ]);

    let filter = StatsFilter {
        environment: "prod".to_string(),
        code: "500".to_string(),
        ..StatsFilter::default()
    };
    let mut view = StatsList::new(t.ctx.clone(), filter);
    assert_eq!(
        view.query(),
        StatsQuery {
            environment: "prod".to_string(),
            code: "500".to_string(),
            ..StatsQuery::default()
        }
    );

    view.init().await;
    assert_eq!(
        t.backend.calls(),
        vec!["GET stats/all/prod/all/all/500/listDatatable".to_string()]
    );

    view.list_mut().set_filter("refund");
    assert_eq!(view.list().page().total_matching, 1);
}

// ─── ActiveView ─────────────────────────────────────────────────────────────

#[test]
fn test_active_view_for_route_round_trips() {
    let t = test_context();
    let routes = [
        "/services/list/prod/all",
        "/services/new/prod/all",
        "/services/edit/prod/all/s1",
        "/environments/list/all",
        "/environments/new",
        "/environments/edit/3",
        "/stats/all/prod/all/all/all",
    ];
    for path in routes {
        let route = Route::parse(path).unwrap();
        let view = ActiveView::for_route(t.ctx.clone(), &route);
        assert_eq!(view.route(), route);
    }
}

#[test]
fn test_active_view_reload_routes() {
    let t = test_context();
    let list = ActiveView::for_route(t.ctx.clone(), &Route::parse("/services/list/prod/all").unwrap());
    assert_eq!(list.reload_route("payments").path(), "/services/list/prod/payments");
    assert!(list.list().is_some());

    let new = ActiveView::for_route(t.ctx.clone(), &Route::parse("/services/new/prod/all").unwrap());
    assert_eq!(new.reload_route("payments").path(), "/services/new/prod/payments");
    assert!(new.list().is_none());
    assert_eq!(new.name(), "ServiceNew");
}
