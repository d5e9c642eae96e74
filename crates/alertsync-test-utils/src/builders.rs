//! Terse constructors for configuration documents
//!
//! Keeps test setup readable: a full document in a handful of lines instead
//! of a page of struct literals.

use std::collections::BTreeMap;

use alertsync_meta::{
    AlertDestinations, AlertRuleSpec, ConfigDocument, NetworkConfig, OrgConfig, WebhookSpec,
};

/// An enabled rule with email destinations only.
pub fn alert_rule(alert_type: &str, emails: &[&str]) -> AlertRuleSpec {
    AlertRuleSpec {
        alert_type: alert_type.into(),
        enabled: true,
        alert_destinations: AlertDestinations {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        },
        filters: BTreeMap::new(),
    }
}

/// A rule whose destinations reference a declared webhook by name.
pub fn alert_rule_with_webhook(alert_type: &str, webhook_name: &str) -> AlertRuleSpec {
    AlertRuleSpec {
        alert_type: alert_type.into(),
        enabled: true,
        alert_destinations: AlertDestinations {
            webhooks: vec![webhook_name.into()],
            ..Default::default()
        },
        filters: BTreeMap::new(),
    }
}

pub fn webhook_spec(name: &str, url: &str) -> WebhookSpec {
    let mut spec = WebhookSpec::new(name, url);
    spec.shared_secret = Some("testSecret".into());
    spec
}

pub fn network_config(alerts: Vec<AlertRuleSpec>) -> NetworkConfig {
    NetworkConfig {
        alerts,
        webhook: None,
    }
}

pub fn network_config_with_webhook(
    alerts: Vec<AlertRuleSpec>,
    webhook: WebhookSpec,
) -> NetworkConfig {
    NetworkConfig {
        alerts,
        webhook: Some(webhook),
    }
}

/// A document with a single organization.
pub fn document(org: &str, networks: Vec<(&str, NetworkConfig)>) -> ConfigDocument {
    ConfigDocument {
        organizations: vec![org_config(org, networks)],
    }
}

pub fn org_config(org: &str, networks: Vec<(&str, NetworkConfig)>) -> OrgConfig {
    OrgConfig {
        org: org.into(),
        networks: networks
            .into_iter()
            .map(|(key, cfg)| (key.to_string(), cfg))
            .collect(),
    }
}
