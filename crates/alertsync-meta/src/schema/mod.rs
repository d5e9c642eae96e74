//! Schema for the declarative alert configuration document
//!
//! The document is a single JSON file describing, per organization and per
//! network, the alert rules that should exist and (optionally) a webhook
//! receiver to provision:
//!
//! ```json
//! {
//!   "organizations": [
//!     {
//!       "org": "Acme Corp",
//!       "networks": {
//!         "Branch-01": {
//!           "alerts": [
//!             {
//!               "type": "gatewayDown",
//!               "enabled": true,
//!               "alertDestinations": { "emails": ["noc@acme.com"] }
//!             }
//!           ],
//!           "webhook": { "name": "ops-hook", "url": "https://hooks.acme.com/alerts" }
//!         }
//!       }
//!     }
//!   ]
//! }
//! ```

pub mod alert;
pub mod document;
pub mod webhook;

pub use alert::{AlertDestinations, AlertRuleSpec};
pub use document::{ConfigDocument, NetworkConfig, OrgConfig};
pub use webhook::WebhookSpec;
