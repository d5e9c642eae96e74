//! End-to-end integration test for the vertical slice
//!
//! Exercises the complete flow: document loading -> scope resolution ->
//! webhook provisioning -> diff -> apply, against the in-memory dashboard.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use alertsync_core::{ReconcileEngine, RunOptions, RunStatus, ScopeFilter, WebhookReport};
use alertsync_meta::load_document;
use alertsync_test_utils::MockDashboard;

const CONFIG: &str = r#"{
    "organizations": [
        {
            "org": "Acme Corp",
            "networks": {
                "Branch-01": {
                    "alerts": [
                        {
                            "type": "gatewayDown",
                            "enabled": true,
                            "alertDestinations": {
                                "emails": ["noc@acme.example"],
                                "webhooks": ["ops-hook"]
                            }
                        },
                        {
                            "type": "usageAlert",
                            "enabled": true,
                            "filters": { "threshold": 104857600 }
                        }
                    ],
                    "webhook": {
                        "name": "ops-hook",
                        "url": "https://hooks.acme.example/meraki"
                    }
                },
                "Branch-02": {
                    "alerts": [
                        { "type": "dhcpNoLeases", "enabled": true }
                    ]
                }
            }
        }
    ]
}"#;

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("alerts.json");
    fs::write(&path, CONFIG).unwrap();
    path
}

fn dashboard() -> MockDashboard {
    MockDashboard::new()
        .with_org("O1", "Acme Corp")
        .with_network("O1", "N1", "Branch-01")
        .with_network("O1", "N2", "Branch-02")
}

#[test]
fn test_full_run_from_document_file() {
    let dir = TempDir::new().unwrap();
    let doc = load_document(&write_config(&dir)).unwrap();

    let client = dashboard();
    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let result = engine.run(&doc, &ScopeFilter::all(), &RunOptions::default());

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.networks.len(), 2);
    assert!(result.errors.is_empty());

    // Branch-01: webhook created, then both rules created with the webhook
    // id folded into the destinations.
    let branch1 = &result.networks[0];
    assert_eq!(branch1.network_name, "Branch-01");
    assert!(matches!(branch1.webhook, Some(WebhookReport::Created { .. })));
    assert_eq!(branch1.items.len(), 2);

    let webhooks = client.created_webhooks();
    assert_eq!(webhooks.len(), 1);
    assert_eq!(webhooks[0].1.name, "ops-hook");
    // The loader filled the default secret before the engine saw the webhook.
    assert_eq!(
        webhooks[0].1.shared_secret.as_deref(),
        Some("defaultSecret123")
    );

    let created = client.created_rules();
    assert_eq!(created.len(), 3);
    let gateway = created
        .iter()
        .find(|(_, r)| r.alert_type == "gatewayDown")
        .unwrap();
    let webhook_id = match &branch1.webhook {
        Some(WebhookReport::Created { id }) => id.clone(),
        other => panic!("unexpected webhook report: {:?}", other),
    };
    assert_eq!(gateway.1.alert_destinations.http_server_ids, vec![webhook_id]);
    assert!(gateway.1.alert_destinations.webhooks.is_empty());

    // Branch-02 has no webhook section and one plain rule.
    let branch2 = &result.networks[1];
    assert_eq!(branch2.network_name, "Branch-02");
    assert!(branch2.webhook.is_none());
    assert_eq!(branch2.items.len(), 1);
}

#[test]
fn test_second_run_is_noop() {
    let dir = TempDir::new().unwrap();
    let doc = load_document(&write_config(&dir)).unwrap();
    let client = dashboard();

    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let first = engine.run(&doc, &ScopeFilter::all(), &RunOptions::default());
    assert!(first.summary().applied > 0);

    let mutations_after_first = client.mutation_count();
    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let second = engine.run(&doc, &ScopeFilter::all(), &RunOptions::default());

    assert!(second.summary().is_noop());
    assert_eq!(client.mutation_count(), mutations_after_first);
}

#[test]
fn test_dry_run_from_document_file_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let doc = load_document(&write_config(&dir)).unwrap();
    let client = dashboard();

    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let result = engine.run(&doc, &ScopeFilter::all(), &RunOptions { dry_run: true });

    assert_eq!(client.mutation_count(), 0);
    let summary = result.summary();
    assert_eq!(summary.applied, 0);
    assert!(summary.previewed > 0);
    assert!(matches!(
        result.networks[0].webhook,
        Some(WebhookReport::WouldCreate)
    ));
}

#[test]
fn test_run_then_drift_then_reconverge() {
    let dir = TempDir::new().unwrap();
    let doc = load_document(&write_config(&dir)).unwrap();
    let client = dashboard();

    let engine = ReconcileEngine::new(Box::new(client.clone()));
    engine.run(&doc, &ScopeFilter::all(), &RunOptions::default());

    // Simulate out-of-band drift: disable a rule remotely.
    let drifted = {
        let mut rules = client.rules("N2");
        rules[0].spec.enabled = false;
        rules.remove(0)
    };
    let client = dashboard().with_rule("N2", &drifted.id, drifted.spec);
    let engine = ReconcileEngine::new(Box::new(client.clone()));
    let result = engine.run(&doc, &ScopeFilter::all(), &RunOptions::default());

    let updates = client.updated_rules();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "N2");
    assert_eq!(updates[0].2.enabled, Some(true));
    assert!(result.summary().failed == 0);
}
