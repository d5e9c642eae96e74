//! The collaborator capability trait

use alertsync_meta::{AlertRuleSpec, WebhookSpec};

use crate::error::ApiError;
use crate::types::{Ack, Network, Organization, RemoteAlertRule, RuleFieldPatch};

/// Narrow capability interface to the remote management platform.
///
/// Implementations own their transport concerns (auth, pagination, retry,
/// backoff, rate limiting). The reconciliation engine performs no retries of
/// its own: a returned error is a terminal outcome for the item or network
/// being processed.
///
/// The trait is synchronous and object-safe; the engine holds it as
/// `Box<dyn DashboardClient>` and processes networks strictly one at a time.
pub trait DashboardClient {
    /// All organizations visible to the credentials in use.
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError>;

    /// All networks of one organization.
    fn list_networks(&self, org_id: &str) -> Result<Vec<Network>, ApiError>;

    /// The network's current alert rules.
    fn get_alert_rules(&self, network_id: &str) -> Result<Vec<RemoteAlertRule>, ApiError>;

    /// Create a new alert rule on the network.
    fn create_alert_rule(&self, network_id: &str, rule: &AlertRuleSpec) -> Result<Ack, ApiError>;

    /// Update an existing alert rule, sending only the changed fields.
    fn update_alert_rule(
        &self,
        network_id: &str,
        rule_id: &str,
        fields: &RuleFieldPatch,
    ) -> Result<Ack, ApiError>;

    /// The network's registered webhook receivers (ids populated).
    fn list_webhooks(&self, network_id: &str) -> Result<Vec<WebhookSpec>, ApiError>;

    /// Register a webhook receiver; returns the new receiver's id.
    fn create_webhook(&self, network_id: &str, spec: &WebhookSpec) -> Result<String, ApiError>;
}
