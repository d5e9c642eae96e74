//! Reconciliation engine for alertsync.
//!
//! Takes a desired-state configuration document plus the live alert/webhook
//! state of a scope of organizations and networks, computes the minimal set
//! of create/update operations, and applies them — or just records them in
//! dry-run mode. All remote access goes through the `DashboardClient`
//! capability trait from `alertsync-api`.
//!
//! # Architecture
//!
//! ```text
//!                  CLI / embedder
//!                        |
//!                 ReconcileEngine
//!        +---------+-----+------+----------+
//!        |         |            |          |
//!      scope     diff        webhook    report
//!   (resolver) (differ)  (provisioner) (aggregation)
//! ```
//!
//! Processing is strictly sequential per network, in scope order, and every
//! per-network or per-item failure is captured into the run's `RunResult`
//! instead of aborting the run.

pub mod diff;
pub mod engine;
pub mod error;
pub mod events;
pub mod report;
pub mod scope;
pub mod webhook;

pub use diff::{DiffAction, DiffItem, FieldDelta, InvalidReason, PendingWebhooks, ResolvedWebhooks};
pub use engine::{CancelToken, ReconcileEngine, RunOptions};
pub use error::{Error, Result, WebhookError};
pub use events::{EngineEvent, EventSink, NullSink, TracingSink};
pub use report::{
    ActionKind, ItemDisposition, ItemOutcome, NetworkOutcome, RunResult, RunStatus, RunSummary,
    WebhookReport,
};
pub use scope::{ScopeFilter, ScopeMiss, ScopePair, ScopeResolution, Selector, resolve};
pub use webhook::{WebhookOutcome, ensure_webhook};
