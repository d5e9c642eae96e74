//! Registry of known alert categories

use std::collections::HashSet;

/// Registry of alert categories the platform understands.
///
/// Desired rules with a category outside this set are flagged invalid by the
/// differ rather than sent to the platform.
pub struct AlertTypeRegistry {
    known: HashSet<&'static str>,
}

impl AlertTypeRegistry {
    pub fn with_builtins() -> Self {
        let known = [
            "gatewayDown",
            "gatewayUp",
            "repeaterDown",
            "repeaterUp",
            "dhcpNoLeases",
            "rogueAp",
            "ipConflict",
            "usageAlert",
            "clientConnectivity",
            "vpnConnectivityChange",
            "failoverEvent",
            "ampMalwareDetected",
            "ampMalwareBlocked",
            "settingsChanged",
            "uplinkStatusChange",
        ]
        .into_iter()
        .collect();
        Self { known }
    }

    pub fn is_known(&self, alert_type: &str) -> bool {
        self.known.contains(alert_type)
    }

    pub fn list_known(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.known.iter().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for AlertTypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_knows_builtins() {
        let registry = AlertTypeRegistry::with_builtins();
        assert!(registry.is_known("gatewayDown"));
        assert!(registry.is_known("usageAlert"));
        assert!(registry.is_known("rogueAp"));
        assert!(!registry.is_known("bogusType"));
    }

    #[test]
    fn test_list_known_is_sorted() {
        let registry = AlertTypeRegistry::with_builtins();
        let names = registry.list_known();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
