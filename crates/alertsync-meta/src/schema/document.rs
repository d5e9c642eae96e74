//! Configuration document root types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AlertRuleSpec, WebhookSpec};

/// Root of the declarative configuration document.
///
/// Read-only input for the whole run; the reconciliation core never mutates
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Organization-scoped configuration, in declaration order
    pub organizations: Vec<OrgConfig>,
}

/// Desired state for the networks of one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgConfig {
    /// Organization id (case-sensitive) or name (case-insensitive)
    pub org: String,

    /// Per-network desired state, keyed by network id or name
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// Desired state for a single network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Desired alert rules, in precedence order
    #[serde(default)]
    pub alerts: Vec<AlertRuleSpec>,

    /// Webhook receiver to provision for this network, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_parses_nested_structure() {
        let json = r#"{
            "organizations": [
                {
                    "org": "Acme Corp",
                    "networks": {
                        "Branch-01": {
                            "alerts": [
                                { "type": "gatewayDown", "enabled": true }
                            ],
                            "webhook": { "name": "ops", "url": "https://h.example.com" }
                        },
                        "Branch-02": { "alerts": [] }
                    }
                }
            ]
        }"#;
        let doc: ConfigDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.organizations.len(), 1);
        let org = &doc.organizations[0];
        assert_eq!(org.org, "Acme Corp");
        assert_eq!(org.networks.len(), 2);
        assert!(org.networks["Branch-01"].webhook.is_some());
        assert!(org.networks["Branch-02"].alerts.is_empty());
    }
}
