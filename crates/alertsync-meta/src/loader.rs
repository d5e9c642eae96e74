//! Loading and structural validation of the configuration document
//!
//! Structural problems caught here are the only fatal errors in the system:
//! a run cannot meaningfully proceed without a well-formed document, so these
//! surface before scope resolution begins. Semantic problems (unknown alert
//! categories, unresolved webhook references) are not checked here — the
//! differ reports them per-rule without aborting the run.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::schema::ConfigDocument;

/// Shared secret used when a webhook spec omits one.
const DEFAULT_SHARED_SECRET: &str = "defaultSecret123";

/// Load and validate a configuration document from a JSON file.
pub fn load_document(path: &Path) -> Result<ConfigDocument> {
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_document_str(&content)
}

/// Parse and validate a configuration document from a JSON string.
pub fn load_document_str(content: &str) -> Result<ConfigDocument> {
    let mut doc: ConfigDocument = serde_json::from_str(content)?;
    validate(&mut doc)?;
    tracing::debug!(
        organizations = doc.organizations.len(),
        "configuration document loaded"
    );
    Ok(doc)
}

/// Structural validation plus defaulting.
///
/// Fills the default shared secret on webhook specs that omit one.
fn validate(doc: &mut ConfigDocument) -> Result<()> {
    if doc.organizations.is_empty() {
        return Err(Error::invalid("document declares no organizations"));
    }

    for org in &mut doc.organizations {
        if org.org.trim().is_empty() {
            return Err(Error::invalid("organization entry with empty selector"));
        }
        if org.networks.is_empty() {
            return Err(Error::invalid(format!(
                "organization '{}' declares no networks",
                org.org
            )));
        }
        for (key, network) in &mut org.networks {
            if key.trim().is_empty() {
                return Err(Error::invalid(format!(
                    "organization '{}' has a network entry with an empty key",
                    org.org
                )));
            }
            for rule in &network.alerts {
                if rule.alert_type.trim().is_empty() {
                    return Err(Error::invalid(format!(
                        "network '{}' has an alert rule with an empty type",
                        key
                    )));
                }
            }
            if let Some(webhook) = &mut network.webhook {
                if webhook.name.trim().is_empty() {
                    return Err(Error::invalid(format!(
                        "network '{}' declares a webhook with an empty name",
                        key
                    )));
                }
                if webhook.url.trim().is_empty() {
                    return Err(Error::invalid(format!(
                        "webhook '{}' has an empty url",
                        webhook.name
                    )));
                }
                if webhook.shared_secret.is_none() {
                    webhook.shared_secret = Some(DEFAULT_SHARED_SECRET.to_string());
                }
            }
        }
    }

    Ok(())
}
