//! Dashboard collaborator interface for alertsync.
//!
//! The reconciliation core never talks to the management platform directly;
//! it goes through the [`DashboardClient`] trait defined here. Concrete
//! implementations (the HTTP adapter in the CLI, the in-memory mock in
//! alertsync-test-utils) own authentication, pagination, retry and rate
//! limiting — the core treats any error they surface as terminal for the
//! item or network it was working on.

pub mod client;
pub mod error;
pub mod types;

pub use client::DashboardClient;
pub use error::ApiError;
pub use types::{Ack, Network, Organization, RemoteAlertRule, RuleFieldPatch};
