//! Alert rule specification types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single desired alert rule.
///
/// `alert_type` selects the alert category (e.g. `"gatewayDown"`); the set of
/// known categories lives in [`crate::registry::AlertTypeRegistry`]. Category
/// specific tuning knobs (timeouts, thresholds) go into `filters` as opaque
/// JSON values — they are compared field-by-field during diffing but never
/// interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRuleSpec {
    /// Alert category, e.g. "gatewayDown"
    #[serde(rename = "type")]
    pub alert_type: String,

    /// Whether the rule should be active
    pub enabled: bool,

    /// Where notifications for this rule are delivered
    #[serde(default)]
    pub alert_destinations: AlertDestinations,

    /// Category-specific filter parameters (opaque key/value pairs)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, Value>,
}

/// Notification destinations for an alert rule.
///
/// `http_server_ids` carries already-provisioned webhook receiver ids and is
/// passed through untouched. `webhooks` names webhook receivers declared in
/// the same network's configuration; those names are resolved to receiver ids
/// at provision time and never merged into `emails`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDestinations {
    /// Email recipients
    #[serde(default)]
    pub emails: Vec<String>,

    /// Send via SNMP trap
    #[serde(default)]
    pub snmp: bool,

    /// Notify all organization admins
    #[serde(default)]
    pub all_admins: bool,

    /// Webhook receiver ids (already provisioned on the platform)
    #[serde(default)]
    pub http_server_ids: Vec<String>,

    /// Webhook receiver names to resolve to ids before applying
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhooks: Vec<String>,
}

impl AlertDestinations {
    /// True when no destination channel is configured at all.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && !self.snmp
            && !self.all_admins
            && self.http_server_ids.is_empty()
            && self.webhooks.is_empty()
    }
}
