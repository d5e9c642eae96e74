//! Configuration document schema and loading for alertsync.
//!
//! This crate owns the declarative configuration document that describes the
//! desired alert-rule and webhook state for a set of organizations and
//! networks. The document is parsed and structurally validated here, at the
//! load boundary, so that the reconciliation core only ever operates on
//! already-valid, strongly-typed structures.

pub mod error;
pub mod loader;
pub mod registry;
pub mod schema;

pub use error::{Error, Result};
pub use loader::{load_document, load_document_str};
pub use registry::AlertTypeRegistry;
pub use schema::{
    AlertDestinations, AlertRuleSpec, ConfigDocument, NetworkConfig, OrgConfig, WebhookSpec,
};
