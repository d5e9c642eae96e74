//! Scope resolution
//!
//! Expands an operator-supplied filter into the concrete ordered set of
//! (organization, network) pairs a run acts on. Pure lookup over the catalog
//! fetched from the collaborator; a named entry that matches nothing becomes
//! a [`ScopeMiss`] in the output rather than an error, so partial scope never
//! aborts a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use alertsync_api::{Network, Organization};

/// Selects organizations or networks by id/name, or everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Match every entry in the catalog
    All,
    /// Match the listed entries (id exact-match first, then name
    /// case-insensitive)
    Named(Vec<String>),
}

impl Selector {
    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

/// Operator scope filter for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    pub orgs: Selector,
    pub networks: Selector,
}

impl ScopeFilter {
    /// Everything visible to the credentials.
    pub fn all() -> Self {
        Self {
            orgs: Selector::All,
            networks: Selector::All,
        }
    }
}

/// One (organization, network) pair selected for processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopePair {
    pub org: Organization,
    pub network: Network,
}

/// A named filter entry that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeMiss {
    /// The selector text that failed to match
    pub selector: String,
    /// The organization searched, `None` when the miss is at org level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
}

/// Outcome of scope resolution: the pairs to process plus every filter entry
/// that resolved to nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeResolution {
    pub pairs: Vec<ScopePair>,
    pub unresolved: Vec<ScopeMiss>,
}

/// Find an organization by selector: id match is case-sensitive and wins
/// over the case-insensitive name match.
pub fn find_org<'a>(orgs: &'a [Organization], selector: &str) -> Option<&'a Organization> {
    orgs.iter()
        .find(|o| o.id == selector)
        .or_else(|| orgs.iter().find(|o| o.name.eq_ignore_ascii_case(selector)))
}

/// Find a network by selector, same priority order as [`find_org`].
pub fn find_network<'a>(networks: &'a [Network], selector: &str) -> Option<&'a Network> {
    networks
        .iter()
        .find(|n| n.id == selector)
        .or_else(|| {
            networks
                .iter()
                .find(|n| n.name.eq_ignore_ascii_case(selector))
        })
}

/// Organizations selected by the filter, in catalog order, plus misses.
pub fn resolve_orgs<'a>(
    filter: &ScopeFilter,
    orgs: &'a [Organization],
) -> (Vec<&'a Organization>, Vec<ScopeMiss>) {
    match &filter.orgs {
        Selector::All => (orgs.iter().collect(), Vec::new()),
        Selector::Named(names) => {
            let mut selected: Vec<&Organization> = Vec::new();
            let mut misses = Vec::new();
            for name in names {
                match find_org(orgs, name) {
                    Some(org) => {
                        if !selected.iter().any(|o| o.id == org.id) {
                            selected.push(org);
                        }
                    }
                    None => misses.push(ScopeMiss {
                        selector: name.clone(),
                        org: None,
                    }),
                }
            }
            // Preserve catalog order regardless of filter order
            selected.sort_by_key(|org| orgs.iter().position(|o| o.id == org.id));
            (selected, misses)
        }
    }
}

/// Resolve the full filter against the catalog.
///
/// `networks_per_org` maps organization id to that organization's network
/// catalog. Output pair order follows catalog order: organizations first,
/// then each organization's networks. Deterministic and side-effect free.
pub fn resolve(
    filter: &ScopeFilter,
    orgs: &[Organization],
    networks_per_org: &BTreeMap<String, Vec<Network>>,
) -> ScopeResolution {
    let (selected_orgs, mut unresolved) = resolve_orgs(filter, orgs);
    let mut pairs = Vec::new();

    for org in selected_orgs {
        let networks = match networks_per_org.get(&org.id) {
            Some(networks) => networks,
            None => continue,
        };
        match &filter.networks {
            Selector::All => {
                for network in networks {
                    pairs.push(ScopePair {
                        org: org.clone(),
                        network: network.clone(),
                    });
                }
            }
            Selector::Named(names) => {
                let mut selected: Vec<&Network> = Vec::new();
                for name in names {
                    match find_network(networks, name) {
                        Some(network) => {
                            if !selected.iter().any(|n| n.id == network.id) {
                                selected.push(network);
                            }
                        }
                        None => unresolved.push(ScopeMiss {
                            selector: name.clone(),
                            org: Some(org.name.clone()),
                        }),
                    }
                }
                selected.sort_by_key(|net| networks.iter().position(|n| n.id == net.id));
                for network in selected {
                    pairs.push(ScopePair {
                        org: org.clone(),
                        network: network.clone(),
                    });
                }
            }
        }
    }

    ScopeResolution { pairs, unresolved }
}
