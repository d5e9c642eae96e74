//! Webhook receiver specification

use serde::{Deserialize, Serialize};

/// A webhook receiver, either declared in the configuration document or
/// returned from the platform's webhook listing.
///
/// `id` is absent on declared specs and present on remote ones; provisioning
/// resolves a declared name to a remote id. `shared_secret` is never returned
/// by the platform, so a remote spec carries `None` there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSpec {
    /// Receiver name, unique per network among managed webhooks
    pub name: String,

    /// Delivery endpoint; must be a well-formed HTTPS URL
    pub url: String,

    /// Shared secret sent with deliveries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,

    /// Remote receiver id, present once provisioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl WebhookSpec {
    /// Declared spec with no remote id yet.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            shared_secret: None,
            id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_spec_parses_without_id() {
        let json = r#"{"name": "ops-hook", "url": "https://hooks.example.com/a"}"#;
        let spec: WebhookSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.name, "ops-hook");
        assert!(spec.id.is_none());
        assert!(spec.shared_secret.is_none());
    }

    #[test]
    fn test_webhook_spec_serializes_shared_secret_camel_case() {
        let mut spec = WebhookSpec::new("ops-hook", "https://hooks.example.com/a");
        spec.shared_secret = Some("s3cret".into());
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["sharedSecret"], "s3cret");
    }
}
