//! Webhook validation and provisioning
//!
//! Ensures a declared webhook receiver exists on a network, creating it when
//! absent. Provisioning is idempotent by name: a remote receiver with the
//! same name and url is reused, and an existing receiver is never mutated —
//! a name collision with a different url is a conflict, not an update.

use url::Url;

use alertsync_api::DashboardClient;
use alertsync_meta::WebhookSpec;

use crate::error::WebhookError;

/// Outcome of ensuring a webhook receiver exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A receiver with this name and url already existed
    Existing { id: String },
    /// The receiver was created during this run
    Created { id: String },
    /// Dry run: the receiver is missing and would be created. No id exists
    /// yet, so rules referencing it stay invalid for this run.
    WouldCreate,
}

impl WebhookOutcome {
    /// The resolved receiver id, when one exists.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Existing { id } | Self::Created { id } => Some(id),
            Self::WouldCreate => None,
        }
    }
}

/// Validate `spec` and make sure a matching receiver exists on the network.
///
/// `existing` is the network's current receiver list as fetched from the
/// collaborator. At most one create call is issued, and only when the name
/// is absent and `dry_run` is false.
pub fn ensure_webhook(
    client: &dyn DashboardClient,
    network_id: &str,
    spec: &WebhookSpec,
    existing: &[WebhookSpec],
    dry_run: bool,
) -> Result<WebhookOutcome, WebhookError> {
    validate_url(&spec.url)?;

    if let Some(found) = existing.iter().find(|w| w.name == spec.name) {
        if found.url != spec.url {
            return Err(WebhookError::WebhookNameConflict {
                name: spec.name.clone(),
                existing_url: found.url.clone(),
                requested_url: spec.url.clone(),
            });
        }
        let id = found.id.clone().ok_or_else(|| {
            WebhookError::Api(alertsync_api::ApiError::decode(format!(
                "remote webhook '{}' has no id",
                found.name
            )))
        })?;
        tracing::debug!(name = %spec.name, %id, "webhook already exists, reusing");
        return Ok(WebhookOutcome::Existing { id });
    }

    if dry_run {
        return Ok(WebhookOutcome::WouldCreate);
    }

    let id = client.create_webhook(network_id, spec)?;
    tracing::info!(name = %spec.name, %id, network = network_id, "webhook created");
    Ok(WebhookOutcome::Created { id })
}

/// The receiver url must be well-formed and HTTPS.
fn validate_url(raw: &str) -> Result<(), WebhookError> {
    let url = Url::parse(raw).map_err(|e| WebhookError::InvalidWebhookUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "https" {
        return Err(WebhookError::InvalidWebhookUrl {
            url: raw.to_string(),
            reason: format!("scheme must be https, got {}", url.scheme()),
        });
    }
    Ok(())
}
