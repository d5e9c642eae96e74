//! Structured engine events
//!
//! The engine narrates a run through typed events handed to a caller-supplied
//! [`EventSink`], keeping reconciliation logic free of any direct console or
//! log writes. The CLI renders them; embedders can bridge them to `tracing`
//! with [`TracingSink`] or drop them with [`NullSink`].

use crate::report::RunSummary;

/// One step in a reconciliation run.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    RunStarted {
        dry_run: bool,
    },
    ScopeResolved {
        selected: usize,
        unresolved: usize,
    },
    NetworkStarted {
        org: String,
        network: String,
    },
    WebhookResolved {
        network: String,
        name: String,
        /// "existing", "created" or "would-create"
        outcome: String,
    },
    DiffComputed {
        network: String,
        creates: usize,
        updates: usize,
        unchanged: usize,
        invalid: usize,
    },
    ItemApplied {
        network: String,
        alert_type: String,
    },
    ItemPreviewed {
        network: String,
        alert_type: String,
    },
    ItemFailed {
        network: String,
        alert_type: String,
        error: String,
    },
    NetworkFailed {
        network: String,
        error: String,
    },
    NetworkFinished {
        network: String,
    },
    RunCancelled,
    RunFinished {
        summary: RunSummary,
    },
}

/// Receives engine events as they happen.
///
/// Implementations must not panic; the engine calls them inline on its single
/// thread of control.
pub trait EventSink {
    fn emit(&self, event: &EngineEvent);
}

/// Discards all events.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &EngineEvent) {}
}

/// Bridges events onto the `tracing` subscriber.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &EngineEvent) {
        match event {
            EngineEvent::RunStarted { dry_run } => {
                tracing::info!(dry_run, "reconciliation run started");
            }
            EngineEvent::ScopeResolved {
                selected,
                unresolved,
            } => {
                tracing::info!(selected, unresolved, "scope resolved");
            }
            EngineEvent::NetworkStarted { org, network } => {
                tracing::info!(%org, %network, "processing network");
            }
            EngineEvent::WebhookResolved {
                network,
                name,
                outcome,
            } => {
                tracing::info!(%network, %name, %outcome, "webhook resolved");
            }
            EngineEvent::DiffComputed {
                network,
                creates,
                updates,
                unchanged,
                invalid,
            } => {
                tracing::info!(%network, creates, updates, unchanged, invalid, "diff computed");
            }
            EngineEvent::ItemApplied {
                network,
                alert_type,
            } => {
                tracing::info!(%network, %alert_type, "alert rule applied");
            }
            EngineEvent::ItemPreviewed {
                network,
                alert_type,
            } => {
                tracing::info!(%network, %alert_type, "alert rule change previewed");
            }
            EngineEvent::ItemFailed {
                network,
                alert_type,
                error,
            } => {
                tracing::warn!(%network, %alert_type, %error, "alert rule apply failed");
            }
            EngineEvent::NetworkFailed { network, error } => {
                tracing::warn!(%network, %error, "network processing failed");
            }
            EngineEvent::NetworkFinished { network } => {
                tracing::debug!(%network, "network finished");
            }
            EngineEvent::RunCancelled => {
                tracing::warn!("run cancelled, returning partial result");
            }
            EngineEvent::RunFinished { summary } => {
                tracing::info!(
                    applied = summary.applied,
                    previewed = summary.previewed,
                    failed = summary.failed,
                    unchanged = summary.unchanged,
                    invalid = summary.invalid,
                    "reconciliation run finished"
                );
            }
        }
    }
}
