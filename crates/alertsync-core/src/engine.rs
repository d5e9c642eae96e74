//! The reconciliation engine
//!
//! Orchestrates one run: scope resolution, then for each selected network a
//! fetch → provision → diff → apply-or-preview pass, then aggregation into a
//! sealed [`RunResult`]. Networks are processed strictly one at a time in
//! scope order; a failure inside one network is captured into that network's
//! entry and never aborts the run.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use alertsync_api::DashboardClient;
use alertsync_meta::{AlertTypeRegistry, ConfigDocument, NetworkConfig};

use crate::diff::{self, DiffAction, PendingWebhooks, ResolvedWebhooks};
use crate::error::Error;
use crate::events::{EngineEvent, EventSink, NullSink};
use crate::report::{
    ItemDisposition, ItemOutcome, NetworkOutcome, RunResult, RunStatus, WebhookReport,
};
use crate::scope::{self, ScopeFilter, ScopePair, find_network, find_org};
use crate::webhook::{WebhookOutcome, ensure_webhook};

/// Options for a reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute and record the plan without issuing any mutating calls
    pub dry_run: bool,
}

/// Caller-side handle for aborting a run.
///
/// Cancellation is run-granularity: the engine checks the token between
/// networks, always finishing the in-flight network's apply step so no
/// network is left half-updated.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives reconciliation runs against one collaborator handle.
///
/// The handle is passed in explicitly; the engine holds no process-wide
/// state and owns the `RunResult` until it is returned.
pub struct ReconcileEngine {
    client: Box<dyn DashboardClient>,
    sink: Box<dyn EventSink>,
    registry: AlertTypeRegistry,
    cancel: CancelToken,
}

impl ReconcileEngine {
    pub fn new(client: Box<dyn DashboardClient>) -> Self {
        Self {
            client,
            sink: Box::new(NullSink),
            registry: AlertTypeRegistry::with_builtins(),
            cancel: CancelToken::new(),
        }
    }

    /// Replace the event sink (defaults to discarding events).
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Use a caller-provided cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// A clone of the engine's cancellation token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Execute one run to completion (or cancellation).
    ///
    /// All per-entry failures land in the returned `RunResult`; the document
    /// is assumed structurally valid (the loader enforces that before a run
    /// can start).
    pub fn run(
        &self,
        doc: &ConfigDocument,
        filter: &ScopeFilter,
        options: &RunOptions,
    ) -> RunResult {
        self.sink.emit(&EngineEvent::RunStarted {
            dry_run: options.dry_run,
        });

        let mut result = RunResult {
            status: RunStatus::Completed,
            networks: Vec::new(),
            unresolved_scope: Vec::new(),
            errors: Vec::new(),
        };

        let orgs = match self.client.list_organizations() {
            Ok(orgs) => orgs,
            Err(e) => {
                result.errors.push(format!("failed to list organizations: {}", e));
                self.sink.emit(&EngineEvent::RunFinished {
                    summary: result.summary(),
                });
                return result;
            }
        };

        // Network catalogs for the organizations the filter selects.
        let (selected_orgs, _) = scope::resolve_orgs(filter, &orgs);
        let mut networks_per_org = BTreeMap::new();
        for org in &selected_orgs {
            match self.client.list_networks(&org.id) {
                Ok(networks) => {
                    networks_per_org.insert(org.id.clone(), networks);
                }
                Err(e) => {
                    result.errors.push(format!(
                        "failed to list networks for organization {}: {}",
                        org.name, e
                    ));
                }
            }
        }

        let resolution = scope::resolve(filter, &orgs, &networks_per_org);
        result.unresolved_scope = resolution.unresolved;
        self.sink.emit(&EngineEvent::ScopeResolved {
            selected: resolution.pairs.len(),
            unresolved: result.unresolved_scope.len(),
        });

        // Correlate document entries with the catalog. Entries that resolve
        // to nothing fail individually; the run carries on.
        let mut managed: BTreeMap<(String, String), &NetworkConfig> = BTreeMap::new();
        for org_cfg in &doc.organizations {
            let org = match find_org(&orgs, &org_cfg.org) {
                Some(org) => org,
                None => {
                    result
                        .errors
                        .push(Error::OrgNotFound {
                            selector: org_cfg.org.clone(),
                        }
                        .to_string());
                    continue;
                }
            };
            let networks = match networks_per_org.get(&org.id) {
                Some(networks) => networks,
                // Org exists but is outside the filter (or its catalog
                // fetch failed, which is already recorded above).
                None => continue,
            };
            for (key, net_cfg) in &org_cfg.networks {
                match find_network(networks, key) {
                    Some(network) => {
                        managed.insert((org.id.clone(), network.id.clone()), net_cfg);
                    }
                    None => result.networks.push(NetworkOutcome {
                        org_id: org.id.clone(),
                        org_name: org.name.clone(),
                        network_id: String::new(),
                        network_name: key.clone(),
                        webhook: None,
                        items: Vec::new(),
                        errors: vec![
                            Error::NetworkNotFound {
                                org: org.name.clone(),
                                selector: key.clone(),
                            }
                            .to_string(),
                        ],
                    }),
                }
            }
        }

        for pair in &resolution.pairs {
            if self.cancel.is_cancelled() {
                result.status = RunStatus::Cancelled;
                self.sink.emit(&EngineEvent::RunCancelled);
                break;
            }

            let key = (pair.org.id.clone(), pair.network.id.clone());
            let net_cfg = match managed.get(&key) {
                Some(cfg) => *cfg,
                None => {
                    // In scope but not managed by the document.
                    tracing::debug!(network = %pair.network.name, "no configuration declared, skipping");
                    continue;
                }
            };

            let outcome = self.process_network(pair, net_cfg, options);
            self.sink.emit(&EngineEvent::NetworkFinished {
                network: pair.network.name.clone(),
            });
            result.networks.push(outcome);
        }

        self.sink.emit(&EngineEvent::RunFinished {
            summary: result.summary(),
        });
        result
    }

    /// Reconcile a single network. All failures are captured into the
    /// returned outcome.
    fn process_network(
        &self,
        pair: &ScopePair,
        cfg: &NetworkConfig,
        options: &RunOptions,
    ) -> NetworkOutcome {
        self.sink.emit(&EngineEvent::NetworkStarted {
            org: pair.org.name.clone(),
            network: pair.network.name.clone(),
        });

        let mut outcome = NetworkOutcome {
            org_id: pair.org.id.clone(),
            org_name: pair.org.name.clone(),
            network_id: pair.network.id.clone(),
            network_name: pair.network.name.clone(),
            webhook: None,
            items: Vec::new(),
            errors: Vec::new(),
        };

        let mut resolved = ResolvedWebhooks::new();
        let mut pending = PendingWebhooks::new();

        let needs_webhooks = cfg.webhook.is_some()
            || cfg
                .alerts
                .iter()
                .any(|r| !r.alert_destinations.webhooks.is_empty());
        if needs_webhooks {
            let existing = match self.client.list_webhooks(&pair.network.id) {
                Ok(existing) => existing,
                Err(e) => {
                    let message = format!("failed to list webhooks: {}", e);
                    self.sink.emit(&EngineEvent::NetworkFailed {
                        network: pair.network.name.clone(),
                        error: message.clone(),
                    });
                    outcome.errors.push(message);
                    return outcome;
                }
            };
            for webhook in &existing {
                if let Some(id) = &webhook.id {
                    resolved.insert(webhook.name.clone(), id.clone());
                }
            }
            if let Some(spec) = &cfg.webhook {
                match ensure_webhook(
                    self.client.as_ref(),
                    &pair.network.id,
                    spec,
                    &existing,
                    options.dry_run,
                ) {
                    Ok(webhook_outcome) => {
                        self.sink.emit(&EngineEvent::WebhookResolved {
                            network: pair.network.name.clone(),
                            name: spec.name.clone(),
                            outcome: match &webhook_outcome {
                                WebhookOutcome::Existing { .. } => "existing".to_string(),
                                WebhookOutcome::Created { .. } => "created".to_string(),
                                WebhookOutcome::WouldCreate => "would-create".to_string(),
                            },
                        });
                        match &webhook_outcome {
                            WebhookOutcome::Existing { id } | WebhookOutcome::Created { id } => {
                                resolved.insert(spec.name.clone(), id.clone());
                            }
                            WebhookOutcome::WouldCreate => {
                                pending.insert(spec.name.clone());
                            }
                        }
                        outcome.webhook = Some(WebhookReport::from(&webhook_outcome));
                    }
                    Err(e) => {
                        // Rules referencing this webhook come back invalid
                        // from the differ; the rest still get processed.
                        let message = e.to_string();
                        resolved.remove(&spec.name);
                        self.sink.emit(&EngineEvent::NetworkFailed {
                            network: pair.network.name.clone(),
                            error: message.clone(),
                        });
                        outcome.webhook = Some(WebhookReport::Failed {
                            error: message.clone(),
                        });
                        outcome.errors.push(message);
                    }
                }
            }
        }

        let current = match self.client.get_alert_rules(&pair.network.id) {
            Ok(current) => current,
            Err(e) => {
                let message = format!("failed to fetch alert rules: {}", e);
                self.sink.emit(&EngineEvent::NetworkFailed {
                    network: pair.network.name.clone(),
                    error: message.clone(),
                });
                outcome.errors.push(message);
                return outcome;
            }
        };

        let items = diff::diff(&cfg.alerts, &current, &resolved, &pending, &self.registry);
        self.sink.emit(&EngineEvent::DiffComputed {
            network: pair.network.name.clone(),
            creates: items
                .iter()
                .filter(|i| matches!(i.action, DiffAction::Create { .. }))
                .count(),
            updates: items
                .iter()
                .filter(|i| matches!(i.action, DiffAction::Update { .. }))
                .count(),
            unchanged: items
                .iter()
                .filter(|i| i.action == DiffAction::NoChange)
                .count(),
            invalid: items
                .iter()
                .filter(|i| matches!(i.action, DiffAction::Invalid { .. }))
                .count(),
        });

        for item in items {
            let disposition = match &item.action {
                DiffAction::NoChange => ItemDisposition::Unchanged,
                DiffAction::Invalid { .. } => ItemDisposition::Skipped,
                DiffAction::Create { spec } => {
                    if options.dry_run {
                        self.sink.emit(&EngineEvent::ItemPreviewed {
                            network: pair.network.name.clone(),
                            alert_type: item.alert_type.clone(),
                        });
                        ItemDisposition::Previewed
                    } else {
                        match self.client.create_alert_rule(&pair.network.id, spec) {
                            Ok(_) => {
                                self.sink.emit(&EngineEvent::ItemApplied {
                                    network: pair.network.name.clone(),
                                    alert_type: item.alert_type.clone(),
                                });
                                ItemDisposition::Applied
                            }
                            Err(e) => {
                                let error = e.to_string();
                                self.sink.emit(&EngineEvent::ItemFailed {
                                    network: pair.network.name.clone(),
                                    alert_type: item.alert_type.clone(),
                                    error: error.clone(),
                                });
                                ItemDisposition::Failed { error }
                            }
                        }
                    }
                }
                DiffAction::Update { rule_id, patch, .. } => {
                    if options.dry_run {
                        self.sink.emit(&EngineEvent::ItemPreviewed {
                            network: pair.network.name.clone(),
                            alert_type: item.alert_type.clone(),
                        });
                        ItemDisposition::Previewed
                    } else {
                        match self
                            .client
                            .update_alert_rule(&pair.network.id, rule_id, patch)
                        {
                            Ok(_) => {
                                self.sink.emit(&EngineEvent::ItemApplied {
                                    network: pair.network.name.clone(),
                                    alert_type: item.alert_type.clone(),
                                });
                                ItemDisposition::Applied
                            }
                            Err(e) => {
                                let error = e.to_string();
                                self.sink.emit(&EngineEvent::ItemFailed {
                                    network: pair.network.name.clone(),
                                    alert_type: item.alert_type.clone(),
                                    error: error.clone(),
                                });
                                ItemDisposition::Failed { error }
                            }
                        }
                    }
                }
            };
            outcome.items.push(ItemOutcome::from_item(&item, disposition));
        }

        outcome
    }
}
