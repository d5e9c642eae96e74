//! Alert rule diffing
//!
//! Compares the desired rules of one network against its live alert state
//! and produces a typed plan: create, update (with the changed field set),
//! no change, or invalid. Pure function over its inputs; the engine decides
//! what to do with the plan.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use alertsync_api::{RemoteAlertRule, RuleFieldPatch};
use alertsync_meta::{AlertDestinations, AlertRuleSpec, AlertTypeRegistry};

/// Why a desired rule cannot be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidReason {
    /// Alert category outside the known set
    UnknownAlertType,
    /// Same category appeared earlier in the desired sequence
    DuplicateDesiredRuleType,
    /// Remote state carries more than one rule for the category
    DuplicateRemoteRuleType,
    /// A webhook destination name resolved to nothing
    UnresolvedWebhookReference,
    /// The referenced webhook exists only as a dry-run placeholder
    WebhookNotYetProvisioned,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownAlertType => "unknown alert type",
            Self::DuplicateDesiredRuleType => "duplicate desired rule type",
            Self::DuplicateRemoteRuleType => "duplicate remote rule type",
            Self::UnresolvedWebhookReference => "unresolved webhook reference",
            Self::WebhookNotYetProvisioned => "webhook not yet provisioned",
        }
    }
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level difference between desired and current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldDelta {
    Enabled {
        current: bool,
        desired: bool,
    },
    Destinations {
        current: AlertDestinations,
        desired: AlertDestinations,
    },
    Filter {
        key: String,
        current: Option<Value>,
        desired: Option<Value>,
    },
}

/// The action the engine should take for one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffAction {
    /// No matching remote rule; `spec` carries resolved webhook ids and is
    /// ready to send as-is
    Create { spec: AlertRuleSpec },
    /// Remote rule differs; `patch` carries only the changed fields
    Update {
        rule_id: String,
        patch: RuleFieldPatch,
        changes: Vec<FieldDelta>,
    },
    /// Desired and current state already agree
    NoChange,
    /// Nothing will be sent for this rule
    Invalid { reason: InvalidReason },
}

/// One desired rule tagged with its action.
///
/// Immutable once produced; the engine consumes each item exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffItem {
    pub alert_type: String,
    pub action: DiffAction,
}

impl DiffItem {
    fn invalid(alert_type: impl Into<String>, reason: InvalidReason) -> Self {
        Self {
            alert_type: alert_type.into(),
            action: DiffAction::Invalid { reason },
        }
    }
}

/// Webhook names already resolved to remote receiver ids.
pub type ResolvedWebhooks = BTreeMap<String, String>;

/// Webhook names that exist only as dry-run placeholders (would be created).
pub type PendingWebhooks = BTreeSet<String>;

/// Diff one network's desired rules against its live alert state.
///
/// Output preserves desired order; diagnostics for duplicate remote rules
/// are appended after the desired items so they are reported rather than
/// silently dropped. When the same category appears twice in the desired
/// sequence the first occurrence wins and later ones come back invalid.
pub fn diff(
    desired: &[AlertRuleSpec],
    current: &[RemoteAlertRule],
    resolved: &ResolvedWebhooks,
    pending: &PendingWebhooks,
    registry: &AlertTypeRegistry,
) -> Vec<DiffItem> {
    // First remote rule per type wins; extras become diagnostics.
    let mut current_by_type: HashMap<&str, &RemoteAlertRule> = HashMap::new();
    let mut remote_duplicates: Vec<&RemoteAlertRule> = Vec::new();
    for rule in current {
        match current_by_type.entry(rule.spec.alert_type.as_str()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(rule);
            }
            std::collections::hash_map::Entry::Occupied(_) => remote_duplicates.push(rule),
        }
    }

    let mut items = Vec::with_capacity(desired.len() + remote_duplicates.len());
    let mut seen: HashSet<&str> = HashSet::new();

    for rule in desired {
        let alert_type = rule.alert_type.as_str();

        if !registry.is_known(alert_type) {
            items.push(DiffItem::invalid(alert_type, InvalidReason::UnknownAlertType));
            continue;
        }
        if !seen.insert(alert_type) {
            items.push(DiffItem::invalid(
                alert_type,
                InvalidReason::DuplicateDesiredRuleType,
            ));
            continue;
        }

        let effective = match resolve_destinations(rule, resolved, pending) {
            Ok(spec) => spec,
            Err(reason) => {
                items.push(DiffItem::invalid(alert_type, reason));
                continue;
            }
        };

        match current_by_type.get(alert_type) {
            None => items.push(DiffItem {
                alert_type: alert_type.to_string(),
                action: DiffAction::Create { spec: effective },
            }),
            Some(remote) => {
                let changes = compare(&effective, &remote.spec);
                if changes.is_empty() {
                    items.push(DiffItem {
                        alert_type: alert_type.to_string(),
                        action: DiffAction::NoChange,
                    });
                } else {
                    let patch = build_patch(&effective, &changes);
                    items.push(DiffItem {
                        alert_type: alert_type.to_string(),
                        action: DiffAction::Update {
                            rule_id: remote.id.clone(),
                            patch,
                            changes,
                        },
                    });
                }
            }
        }
    }

    for rule in remote_duplicates {
        items.push(DiffItem::invalid(
            rule.spec.alert_type.clone(),
            InvalidReason::DuplicateRemoteRuleType,
        ));
    }

    items
}

/// Fold declared webhook names into concrete receiver ids.
///
/// The returned spec has an empty `webhooks` list and a sorted, deduplicated
/// `http_server_ids` list, making it directly comparable with remote state
/// and directly sendable to the platform.
fn resolve_destinations(
    rule: &AlertRuleSpec,
    resolved: &ResolvedWebhooks,
    pending: &PendingWebhooks,
) -> Result<AlertRuleSpec, InvalidReason> {
    let mut spec = rule.clone();
    let names = std::mem::take(&mut spec.alert_destinations.webhooks);
    for name in &names {
        match resolved.get(name) {
            Some(id) => spec.alert_destinations.http_server_ids.push(id.clone()),
            None if pending.contains(name) => {
                return Err(InvalidReason::WebhookNotYetProvisioned);
            }
            None => return Err(InvalidReason::UnresolvedWebhookReference),
        }
    }
    normalize(&mut spec.alert_destinations);
    Ok(spec)
}

/// Order-insensitive canonical form for destination comparison.
fn normalize(destinations: &mut AlertDestinations) {
    destinations.emails.sort_unstable();
    destinations.emails.dedup();
    destinations.http_server_ids.sort_unstable();
    destinations.http_server_ids.dedup();
}

/// Field-by-field comparison of an effective desired spec against a remote
/// rule of the same category.
fn compare(desired: &AlertRuleSpec, current: &AlertRuleSpec) -> Vec<FieldDelta> {
    let mut changes = Vec::new();

    if desired.enabled != current.enabled {
        changes.push(FieldDelta::Enabled {
            current: current.enabled,
            desired: desired.enabled,
        });
    }

    let mut current_destinations = current.alert_destinations.clone();
    normalize(&mut current_destinations);
    if desired.alert_destinations != current_destinations {
        changes.push(FieldDelta::Destinations {
            current: current_destinations,
            desired: desired.alert_destinations.clone(),
        });
    }

    let keys: BTreeSet<&String> = desired
        .filters
        .keys()
        .chain(current.filters.keys())
        .collect();
    for key in keys {
        let desired_value = desired.filters.get(key);
        let current_value = current.filters.get(key);
        if desired_value != current_value {
            changes.push(FieldDelta::Filter {
                key: key.clone(),
                current: current_value.cloned(),
                desired: desired_value.cloned(),
            });
        }
    }

    changes
}

/// Restrict the desired spec to the fields that actually changed.
fn build_patch(desired: &AlertRuleSpec, changes: &[FieldDelta]) -> RuleFieldPatch {
    let mut patch = RuleFieldPatch::default();
    for change in changes {
        match change {
            FieldDelta::Enabled { .. } => patch.enabled = Some(desired.enabled),
            FieldDelta::Destinations { .. } => {
                patch.alert_destinations = Some(desired.alert_destinations.clone());
            }
            FieldDelta::Filter { .. } => {
                patch.filters = Some(desired.filters.clone());
            }
        }
    }
    patch
}
