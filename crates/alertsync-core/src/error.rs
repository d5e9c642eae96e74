//! Error types for alertsync-core
//!
//! Almost nothing here propagates to the caller of a run: per-network and
//! per-item failures are captured into the `RunResult` and the run continues.
//! These types exist so that capture sites have something structured to
//! record.

pub type Result<T> = std::result::Result<T, Error>;

/// Errors recorded during a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured organization matched nothing in the catalog
    #[error("Organization not found in catalog: {selector}")]
    OrgNotFound { selector: String },

    /// A configured network matched nothing in its organization
    #[error("Network not found in organization {org}: {selector}")]
    NetworkNotFound { org: String, selector: String },

    /// Collaborator call failed
    #[error(transparent)]
    Api(#[from] alertsync_api::ApiError),

    /// Webhook validation or provisioning failed
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

/// Webhook validation and provisioning failures.
///
/// Recorded at network granularity; alert rules depending on the failed
/// webhook are marked invalid for the rest of the run.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The configured url is not a well-formed HTTPS URL
    #[error("Invalid webhook url '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    /// A webhook with this name exists remotely but points elsewhere
    #[error(
        "Webhook name conflict for '{name}': remote url {existing_url} differs from configured {requested_url}"
    )]
    WebhookNameConflict {
        name: String,
        existing_url: String,
        requested_url: String,
    },

    /// The create call failed
    #[error(transparent)]
    Api(#[from] alertsync_api::ApiError),
}
