//! Wire types shared between the core and collaborator implementations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use alertsync_meta::{AlertDestinations, AlertRuleSpec};

/// An organization visible to the operator's credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A network within an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
}

/// One live alert rule as reported by the platform.
///
/// Same shape as a desired [`AlertRuleSpec`] plus the remote identifier used
/// to address updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteAlertRule {
    /// Remote rule identifier
    pub id: String,

    /// The rule's current configuration
    #[serde(flatten)]
    pub spec: AlertRuleSpec,
}

/// Acknowledgement of a mutating call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    /// Remote id of the created/updated rule, when the platform reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

/// Partial update for an existing alert rule.
///
/// Only the fields that actually changed are populated; `None` means "leave
/// as-is". Update calls carry exactly this, never a full rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_destinations: Option<AlertDestinations>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<BTreeMap<String, Value>>,
}

impl RuleFieldPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.alert_destinations.is_none() && self.filters.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remote_rule_flattens_spec() {
        let json = r#"{
            "id": "ar_42",
            "type": "gatewayDown",
            "enabled": false,
            "alertDestinations": { "emails": ["noc@acme.com"] }
        }"#;
        let rule: RemoteAlertRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.id, "ar_42");
        assert_eq!(rule.spec.alert_type, "gatewayDown");
        assert_eq!(rule.spec.alert_destinations.emails, vec!["noc@acme.com"]);
    }

    #[test]
    fn test_patch_serializes_only_changed_fields() {
        let patch = RuleFieldPatch {
            enabled: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "enabled": true }));
    }

    #[test]
    fn test_empty_patch() {
        assert!(RuleFieldPatch::default().is_empty());
        let patch = RuleFieldPatch {
            filters: Some(BTreeMap::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
