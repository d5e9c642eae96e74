//! Property tests for the differ
//!
//! The key invariant: for desired and current states with unique rule types,
//! applying the plan and diffing again yields all NoChange.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use alertsync_api::RemoteAlertRule;
use alertsync_core::diff::{DiffAction, diff};
use alertsync_meta::{AlertDestinations, AlertRuleSpec, AlertTypeRegistry};

const TYPES: &[&str] = &[
    "gatewayDown",
    "gatewayUp",
    "dhcpNoLeases",
    "rogueAp",
    "usageAlert",
    "ipConflict",
];

/// A desired sequence with unique types drawn from the known set.
fn arb_desired() -> impl Strategy<Value = Vec<AlertRuleSpec>> {
    proptest::sample::subsequence(TYPES.to_vec(), 0..TYPES.len())
        .prop_flat_map(|types| {
            let count = types.len();
            let params = proptest::collection::vec(
                (
                    any::<bool>(),
                    proptest::collection::vec("[a-z]{1,8}@x\\.com", 0..3),
                    any::<bool>(),
                ),
                count..=count,
            );
            (Just(types), params)
        })
        .prop_map(|(types, params)| {
            types
                .into_iter()
                .zip(params)
                .map(|(alert_type, (enabled, emails, snmp))| AlertRuleSpec {
                    alert_type: alert_type.to_string(),
                    enabled,
                    alert_destinations: AlertDestinations {
                        emails,
                        snmp,
                        ..Default::default()
                    },
                    filters: BTreeMap::new(),
                })
                .collect()
        })
}

fn apply_plan(
    desired: &[AlertRuleSpec],
    mut current: Vec<RemoteAlertRule>,
    registry: &AlertTypeRegistry,
) -> Vec<RemoteAlertRule> {
    let resolved = BTreeMap::new();
    let pending = BTreeSet::new();
    let plan = diff(desired, &current, &resolved, &pending, registry);
    for (index, item) in plan.into_iter().enumerate() {
        match item.action {
            DiffAction::Create { spec } => current.push(RemoteAlertRule {
                id: format!("ar_new_{}", index),
                spec,
            }),
            DiffAction::Update {
                rule_id, patch, ..
            } => {
                let rule = current
                    .iter_mut()
                    .find(|r| r.id == rule_id)
                    .expect("update must target an existing rule");
                if let Some(enabled) = patch.enabled {
                    rule.spec.enabled = enabled;
                }
                if let Some(destinations) = patch.alert_destinations {
                    rule.spec.alert_destinations = destinations;
                }
                if let Some(filters) = patch.filters {
                    rule.spec.filters = filters;
                }
            }
            DiffAction::NoChange => {}
            DiffAction::Invalid { reason } => {
                panic!("unexpected invalid item in unique-type plan: {}", reason)
            }
        }
    }
    current
}

proptest! {
    #[test]
    fn diff_after_apply_is_all_no_change(desired in arb_desired()) {
        let registry = AlertTypeRegistry::with_builtins();
        let resolved = BTreeMap::new();
        let pending = BTreeSet::new();

        let applied = apply_plan(&desired, Vec::new(), &registry);
        let second = diff(&desired, &applied, &resolved, &pending, &registry);

        prop_assert!(second.iter().all(|i| i.action == DiffAction::NoChange));
    }

    #[test]
    fn diff_converges_from_any_start_state(
        desired in arb_desired(),
        current_seed in arb_desired(),
    ) {
        let registry = AlertTypeRegistry::with_builtins();
        let resolved = BTreeMap::new();
        let pending = BTreeSet::new();

        let current: Vec<RemoteAlertRule> = current_seed
            .into_iter()
            .enumerate()
            .map(|(i, spec)| RemoteAlertRule { id: format!("ar_{}", i), spec })
            .collect();

        let applied = apply_plan(&desired, current, &registry);
        let second = diff(&desired, &applied, &resolved, &pending, &registry);

        // Desired rules all converge; rules only present remotely are
        // untouched and outside the desired sequence.
        prop_assert!(second.iter().all(|i| i.action == DiffAction::NoChange));
    }
}
