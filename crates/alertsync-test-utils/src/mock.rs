//! In-memory `DashboardClient` for tests
//!
//! Mutations are applied to the in-memory state (so diff-after-apply tests
//! see the updated remote picture) and recorded for call-count assertions.
//! Individual operations can be scripted to fail per network.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use alertsync_api::{
    Ack, ApiError, DashboardClient, Network, Organization, RemoteAlertRule, RuleFieldPatch,
};
use alertsync_meta::{AlertRuleSpec, WebhookSpec};

#[derive(Default)]
struct State {
    orgs: Vec<Organization>,
    networks: BTreeMap<String, Vec<Network>>,
    rules: BTreeMap<String, Vec<RemoteAlertRule>>,
    webhooks: BTreeMap<String, Vec<WebhookSpec>>,
    fail_org_listing: bool,
    fail_network_listing: BTreeSet<String>,
    fail_alert_fetch: BTreeSet<String>,
    fail_webhook_listing: BTreeSet<String>,
    fail_mutations: BTreeSet<String>,
    next_id: u64,
    created_rules: Vec<(String, AlertRuleSpec)>,
    updated_rules: Vec<(String, String, RuleFieldPatch)>,
    created_webhooks: Vec<(String, WebhookSpec)>,
}

/// Scriptable in-memory dashboard.
///
/// Single-threaded by design, matching the engine's sequential processing
/// model. Clones share state, so a test can hand one handle to the engine
/// and keep another for assertions.
#[derive(Default, Clone)]
pub struct MockDashboard {
    state: Rc<RefCell<State>>,
}

impl MockDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Fixture building
    // ------------------------------------------------------------------

    pub fn with_org(self, id: &str, name: &str) -> Self {
        self.state.borrow_mut().orgs.push(Organization {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Add a network, creating the organization (named after its id) when it
    /// does not exist yet.
    pub fn with_network(self, org_id: &str, network_id: &str, name: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            if !state.orgs.iter().any(|o| o.id == org_id) {
                state.orgs.push(Organization {
                    id: org_id.into(),
                    name: org_id.into(),
                });
            }
            state
                .networks
                .entry(org_id.into())
                .or_default()
                .push(Network {
                    id: network_id.into(),
                    name: name.into(),
                });
        }
        self
    }

    pub fn with_rule(self, network_id: &str, rule_id: &str, spec: AlertRuleSpec) -> Self {
        self.state
            .borrow_mut()
            .rules
            .entry(network_id.into())
            .or_default()
            .push(RemoteAlertRule {
                id: rule_id.into(),
                spec,
            });
        self
    }

    pub fn with_webhook(self, network_id: &str, name: &str, url: &str, id: &str) -> Self {
        let mut spec = WebhookSpec::new(name, url);
        spec.id = Some(id.into());
        self.state
            .borrow_mut()
            .webhooks
            .entry(network_id.into())
            .or_default()
            .push(spec);
        self
    }

    // ------------------------------------------------------------------
    // Failure scripting
    // ------------------------------------------------------------------

    pub fn fail_org_listing(self) -> Self {
        self.state.borrow_mut().fail_org_listing = true;
        self
    }

    pub fn fail_network_listing(self, org_id: &str) -> Self {
        self.state
            .borrow_mut()
            .fail_network_listing
            .insert(org_id.into());
        self
    }

    pub fn fail_alert_fetch(self, network_id: &str) -> Self {
        self.state
            .borrow_mut()
            .fail_alert_fetch
            .insert(network_id.into());
        self
    }

    pub fn fail_webhook_listing(self, network_id: &str) -> Self {
        self.state
            .borrow_mut()
            .fail_webhook_listing
            .insert(network_id.into());
        self
    }

    /// All mutating calls against this network fail.
    pub fn fail_mutations(self, network_id: &str) -> Self {
        self.state
            .borrow_mut()
            .fail_mutations
            .insert(network_id.into());
        self
    }

    // ------------------------------------------------------------------
    // Recorded calls
    // ------------------------------------------------------------------

    pub fn created_rules(&self) -> Vec<(String, AlertRuleSpec)> {
        self.state.borrow().created_rules.clone()
    }

    pub fn updated_rules(&self) -> Vec<(String, String, RuleFieldPatch)> {
        self.state.borrow().updated_rules.clone()
    }

    pub fn created_webhooks(&self) -> Vec<(String, WebhookSpec)> {
        self.state.borrow().created_webhooks.clone()
    }

    /// Total number of mutating calls issued.
    pub fn mutation_count(&self) -> usize {
        let state = self.state.borrow();
        state.created_rules.len() + state.updated_rules.len() + state.created_webhooks.len()
    }

    /// Current remote rules of a network (after any applies).
    pub fn rules(&self, network_id: &str) -> Vec<RemoteAlertRule> {
        self.state
            .borrow()
            .rules
            .get(network_id)
            .cloned()
            .unwrap_or_default()
    }

    fn fresh_id(state: &mut State, prefix: &str) -> String {
        state.next_id += 1;
        format!("{}_{}", prefix, state.next_id)
    }

    fn scripted_failure(network_id: &str) -> ApiError {
        ApiError::Status {
            status: 500,
            endpoint: format!("/networks/{}", network_id),
            message: "scripted failure".into(),
        }
    }
}

impl DashboardClient for MockDashboard {
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let state = self.state.borrow();
        if state.fail_org_listing {
            return Err(ApiError::transport("scripted failure"));
        }
        Ok(state.orgs.clone())
    }

    fn list_networks(&self, org_id: &str) -> Result<Vec<Network>, ApiError> {
        let state = self.state.borrow();
        if state.fail_network_listing.contains(org_id) {
            return Err(Self::scripted_failure(org_id));
        }
        Ok(state.networks.get(org_id).cloned().unwrap_or_default())
    }

    fn get_alert_rules(&self, network_id: &str) -> Result<Vec<RemoteAlertRule>, ApiError> {
        let state = self.state.borrow();
        if state.fail_alert_fetch.contains(network_id) {
            return Err(Self::scripted_failure(network_id));
        }
        Ok(state.rules.get(network_id).cloned().unwrap_or_default())
    }

    fn create_alert_rule(&self, network_id: &str, rule: &AlertRuleSpec) -> Result<Ack, ApiError> {
        let mut state = self.state.borrow_mut();
        if state.fail_mutations.contains(network_id) {
            return Err(Self::scripted_failure(network_id));
        }
        let id = Self::fresh_id(&mut state, "ar");
        state
            .rules
            .entry(network_id.into())
            .or_default()
            .push(RemoteAlertRule {
                id: id.clone(),
                spec: rule.clone(),
            });
        state.created_rules.push((network_id.into(), rule.clone()));
        Ok(Ack { rule_id: Some(id) })
    }

    fn update_alert_rule(
        &self,
        network_id: &str,
        rule_id: &str,
        fields: &RuleFieldPatch,
    ) -> Result<Ack, ApiError> {
        let mut state = self.state.borrow_mut();
        if state.fail_mutations.contains(network_id) {
            return Err(Self::scripted_failure(network_id));
        }
        let rules = state
            .rules
            .get_mut(network_id)
            .ok_or_else(|| ApiError::NotFound(format!("network {}", network_id)))?;
        let rule = rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| ApiError::NotFound(format!("rule {}", rule_id)))?;
        if let Some(enabled) = fields.enabled {
            rule.spec.enabled = enabled;
        }
        if let Some(destinations) = &fields.alert_destinations {
            rule.spec.alert_destinations = destinations.clone();
        }
        if let Some(filters) = &fields.filters {
            rule.spec.filters = filters.clone();
        }
        state
            .updated_rules
            .push((network_id.into(), rule_id.into(), fields.clone()));
        Ok(Ack {
            rule_id: Some(rule_id.into()),
        })
    }

    fn list_webhooks(&self, network_id: &str) -> Result<Vec<WebhookSpec>, ApiError> {
        let state = self.state.borrow();
        if state.fail_webhook_listing.contains(network_id) {
            return Err(Self::scripted_failure(network_id));
        }
        Ok(state.webhooks.get(network_id).cloned().unwrap_or_default())
    }

    fn create_webhook(&self, network_id: &str, spec: &WebhookSpec) -> Result<String, ApiError> {
        let mut state = self.state.borrow_mut();
        if state.fail_mutations.contains(network_id) {
            return Err(Self::scripted_failure(network_id));
        }
        let id = Self::fresh_id(&mut state, "H");
        let mut stored = spec.clone();
        stored.id = Some(id.clone());
        state
            .webhooks
            .entry(network_id.into())
            .or_default()
            .push(stored);
        state.created_webhooks.push((network_id.into(), spec.clone()));
        Ok(id)
    }
}
