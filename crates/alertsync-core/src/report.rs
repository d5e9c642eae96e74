//! Run result aggregation
//!
//! Collects per-network, per-rule outcomes into a serializable run summary.
//! The engine builds a `RunResult` incrementally while it owns it and hands
//! it back by value; nothing mutates it after that.

use serde::{Deserialize, Serialize};

use crate::diff::{DiffAction, DiffItem, FieldDelta};
use crate::scope::ScopeMiss;
use crate::webhook::WebhookOutcome;

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// Every selected network was processed
    Completed,
    /// The caller cancelled; networks after the in-flight one were skipped
    Cancelled,
}

/// What kind of action the differ planned for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Create,
    Update,
    NoChange,
    Invalid,
}

/// What actually happened to a planned item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "result")]
pub enum ItemDisposition {
    /// Mutating call issued and acknowledged
    Applied,
    /// Dry run: recorded without calling the collaborator
    Previewed,
    /// Already in the desired state, nothing to do
    Unchanged,
    /// Invalid item, no call issued
    Skipped,
    /// Mutating call failed; sibling items were still processed
    Failed { error: String },
}

/// Outcome for one desired alert rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub alert_type: String,
    pub action: ActionKind,
    /// Field-level changes, populated for updates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldDelta>,
    /// Why the item is invalid, when it is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub disposition: ItemDisposition,
}

impl ItemOutcome {
    /// Build the report entry for a diff item plus its disposition.
    pub fn from_item(item: &DiffItem, disposition: ItemDisposition) -> Self {
        let (action, changes, reason) = match &item.action {
            DiffAction::Create { .. } => (ActionKind::Create, Vec::new(), None),
            DiffAction::Update { changes, .. } => (ActionKind::Update, changes.clone(), None),
            DiffAction::NoChange => (ActionKind::NoChange, Vec::new(), None),
            DiffAction::Invalid { reason } => {
                (ActionKind::Invalid, Vec::new(), Some(reason.to_string()))
            }
        };
        Self {
            alert_type: item.alert_type.clone(),
            action,
            changes,
            reason,
            disposition,
        }
    }
}

/// Webhook provisioning outcome for a network, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum WebhookReport {
    Existing { id: String },
    Created { id: String },
    WouldCreate,
    Failed { error: String },
}

impl From<&WebhookOutcome> for WebhookReport {
    fn from(outcome: &WebhookOutcome) -> Self {
        match outcome {
            WebhookOutcome::Existing { id } => Self::Existing { id: id.clone() },
            WebhookOutcome::Created { id } => Self::Created { id: id.clone() },
            WebhookOutcome::WouldCreate => Self::WouldCreate,
        }
    }
}

/// Everything that happened on one network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOutcome {
    pub org_id: String,
    pub org_name: String,
    pub network_id: String,
    pub network_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemOutcome>,
    /// Network-level failures (fetch errors, scope misses at apply time)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Aggregated result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    pub networks: Vec<NetworkOutcome>,
    /// Filter entries that matched nothing in the catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_scope: Vec<ScopeMiss>,
    /// Run-level failures that prevented scoping (e.g. catalog fetch)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl RunResult {
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for network in &self.networks {
            summary.network_errors += network.errors.len();
            for item in &network.items {
                match &item.disposition {
                    ItemDisposition::Applied => summary.applied += 1,
                    ItemDisposition::Previewed => summary.previewed += 1,
                    ItemDisposition::Unchanged => summary.unchanged += 1,
                    ItemDisposition::Skipped => summary.invalid += 1,
                    ItemDisposition::Failed { .. } => summary.failed += 1,
                }
            }
        }
        summary.network_errors += self.errors.len();
        summary.unresolved_scope = self.unresolved_scope.len();
        summary
    }
}

/// Counts over a finished run, enough for a renderer to distinguish
/// "nothing to do" from "would apply N changes" from "applied N, M failed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub applied: usize,
    pub previewed: usize,
    pub failed: usize,
    pub unchanged: usize,
    pub invalid: usize,
    pub network_errors: usize,
    pub unresolved_scope: usize,
}

impl RunSummary {
    /// Everything already matched the desired state and nothing went wrong.
    pub fn is_noop(&self) -> bool {
        self.applied == 0
            && self.previewed == 0
            && self.failed == 0
            && self.invalid == 0
            && self.network_errors == 0
            && self.unresolved_scope == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(disposition: ItemDisposition) -> ItemOutcome {
        ItemOutcome {
            alert_type: "gatewayDown".into(),
            action: ActionKind::Create,
            changes: Vec::new(),
            reason: None,
            disposition,
        }
    }

    fn network(items: Vec<ItemOutcome>, errors: Vec<String>) -> NetworkOutcome {
        NetworkOutcome {
            org_id: "O1".into(),
            org_name: "Acme".into(),
            network_id: "N1".into(),
            network_name: "Branch-01".into(),
            webhook: None,
            items,
            errors,
        }
    }

    #[test]
    fn test_summary_counts_dispositions() {
        let result = RunResult {
            status: RunStatus::Completed,
            networks: vec![network(
                vec![
                    outcome(ItemDisposition::Applied),
                    outcome(ItemDisposition::Applied),
                    outcome(ItemDisposition::Unchanged),
                    outcome(ItemDisposition::Failed {
                        error: "boom".into(),
                    }),
                ],
                vec![],
            )],
            unresolved_scope: Vec::new(),
            errors: Vec::new(),
        };

        let summary = result.summary();
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_noop());
    }

    #[test]
    fn test_all_unchanged_is_noop() {
        let result = RunResult {
            status: RunStatus::Completed,
            networks: vec![network(vec![outcome(ItemDisposition::Unchanged)], vec![])],
            unresolved_scope: Vec::new(),
            errors: Vec::new(),
        };
        assert!(result.summary().is_noop());
    }

    #[test]
    fn test_unresolved_scope_breaks_noop() {
        let result = RunResult {
            status: RunStatus::Completed,
            networks: Vec::new(),
            unresolved_scope: vec![ScopeMiss {
                selector: "NoSuchOrg".into(),
                org: None,
            }],
            errors: Vec::new(),
        };
        assert!(!result.summary().is_noop());
    }

    #[test]
    fn test_run_result_serializes() {
        let result = RunResult {
            status: RunStatus::Cancelled,
            networks: vec![network(vec![outcome(ItemDisposition::Previewed)], vec![])],
            unresolved_scope: Vec::new(),
            errors: Vec::new(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "cancelled");
        assert_eq!(value["networks"][0]["items"][0]["disposition"]["result"], "previewed");
    }
}
