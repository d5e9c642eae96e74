//! Run reporting across the stack
//!
//! Checks that what the engine observed survives aggregation and JSON
//! serialization: failure isolation, scope misses, and the wire shape a
//! downstream consumer of the JSON report would rely on.

use pretty_assertions::assert_eq;

use alertsync_core::{
    ItemDisposition, ReconcileEngine, RunOptions, RunStatus, ScopeFilter, Selector,
};
use alertsync_meta::load_document_str;
use alertsync_test_utils::MockDashboard;

const CONFIG: &str = r#"{
    "organizations": [
        {
            "org": "Acme Corp",
            "networks": {
                "Branch-01": { "alerts": [{ "type": "gatewayDown", "enabled": true }] },
                "Branch-02": { "alerts": [{ "type": "rogueAp", "enabled": true }] }
            }
        }
    ]
}"#;

fn dashboard() -> MockDashboard {
    MockDashboard::new()
        .with_org("O1", "Acme Corp")
        .with_network("O1", "N1", "Branch-01")
        .with_network("O1", "N2", "Branch-02")
}

#[test]
fn test_failed_network_is_isolated_in_report() {
    let doc = load_document_str(CONFIG).unwrap();
    let client = dashboard().fail_alert_fetch("N1");

    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let result = engine.run(&doc, &ScopeFilter::all(), &RunOptions::default());

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.networks.len(), 2);

    let failed = &result.networks[0];
    assert_eq!(failed.network_name, "Branch-01");
    assert!(failed.items.is_empty());
    assert_eq!(failed.errors.len(), 1);
    assert!(failed.errors[0].contains("failed to fetch alert rules"));

    // The sibling network was still fully processed.
    let ok = &result.networks[1];
    assert_eq!(ok.network_name, "Branch-02");
    assert_eq!(ok.items.len(), 1);
    assert_eq!(ok.items[0].disposition, ItemDisposition::Applied);
}

#[test]
fn test_scope_misses_surface_in_report() {
    let doc = load_document_str(CONFIG).unwrap();
    let client = dashboard();

    let filter = ScopeFilter {
        orgs: Selector::Named(vec!["Acme Corp".into()]),
        networks: Selector::Named(vec!["Branch-01".into(), "Ghost-Net".into()]),
    };
    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let result = engine.run(&doc, &filter, &RunOptions::default());

    assert_eq!(result.networks.len(), 1);
    assert_eq!(result.unresolved_scope.len(), 1);
    assert_eq!(result.unresolved_scope[0].selector, "Ghost-Net");
    assert_eq!(result.unresolved_scope[0].org.as_deref(), Some("Acme Corp"));
    assert!(!result.summary().is_noop());
}

#[test]
fn test_report_json_wire_shape() {
    let doc = load_document_str(CONFIG).unwrap();
    let client = dashboard();

    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let result = engine.run(&doc, &ScopeFilter::all(), &RunOptions { dry_run: true });

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["status"], "completed");
    let first = &value["networks"][0];
    assert_eq!(first["org_name"], "Acme Corp");
    assert_eq!(first["network_id"], "N1");
    assert_eq!(first["items"][0]["alert_type"], "gatewayDown");
    assert_eq!(first["items"][0]["action"], "create");
    assert_eq!(first["items"][0]["disposition"]["result"], "previewed");
    // Empty collections are omitted from the wire form.
    assert!(value.get("errors").is_none());
    assert!(first.get("errors").is_none());
}

#[test]
fn test_catalog_failure_reported_at_run_level() {
    let doc = load_document_str(CONFIG).unwrap();
    let client = MockDashboard::new().fail_org_listing();

    let engine = ReconcileEngine::new(Box::new(client));
    let result = engine.run(&doc, &ScopeFilter::all(), &RunOptions::default());

    assert!(result.networks.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("failed to list organizations"));
}
