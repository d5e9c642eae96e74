//! HTTP `DashboardClient` implementation
//!
//! The dashboard exposes alert rules as a single settings blob per network,
//! so rule creation and field updates are mapped onto a read-modify-write of
//! that blob. Rule ids reported upward are the alert types themselves, which
//! the platform keys the blob by.

use std::time::Duration;

use backoff::{Error as BackoffError, ExponentialBackoff, retry};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use alertsync_api::{
    Ack, ApiError, DashboardClient, Network, Organization, RemoteAlertRule, RuleFieldPatch,
};
use alertsync_meta::{AlertRuleSpec, WebhookSpec};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RETRY_CEILING: Duration = Duration::from_secs(60);

/// The alerts settings blob as the dashboard stores it.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct AlertSettings {
    alerts: Vec<AlertRuleSpec>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct CreatedWebhook {
    id: String,
}

#[derive(Clone)]
pub struct HttpDashboard {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpDashboard {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request with retries on rate limiting and server errors.
    fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        build: impl Fn(&Client, &str) -> RequestBuilder,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let policy = ExponentialBackoff {
            max_elapsed_time: Some(RETRY_CEILING),
            ..ExponentialBackoff::default()
        };
        let outcome = retry(policy, || {
            let response = build(&self.http, &url)
                .header("X-Cisco-Meraki-API-Key", &self.api_key)
                .send()
                .map_err(|e| BackoffError::transient(ApiError::transport(e.to_string())))?;
            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                debug!(%status, endpoint = path, "retrying request");
                return Err(BackoffError::transient(Self::status_error(
                    status, path, response,
                )));
            }
            if status == StatusCode::NOT_FOUND {
                return Err(BackoffError::permanent(ApiError::NotFound(path.to_string())));
            }
            if !status.is_success() {
                return Err(BackoffError::permanent(Self::status_error(
                    status, path, response,
                )));
            }
            response
                .json::<T>()
                .map_err(|e| BackoffError::permanent(ApiError::decode(e.to_string())))
        });
        outcome.map_err(|e| match e {
            BackoffError::Transient { err, .. } | BackoffError::Permanent(err) => err,
        })
    }

    fn status_error(
        status: StatusCode,
        endpoint: &str,
        response: reqwest::blocking::Response,
    ) -> ApiError {
        let message = response.text().unwrap_or_else(|_| String::new());
        ApiError::Status {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(path, |http, url| http.get(url))
    }

    fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let payload = serde_json::to_value(body).map_err(|e| ApiError::decode(e.to_string()))?;
        self.execute(path, move |http, url| http.put(url).json(&payload))
    }

    fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let payload = serde_json::to_value(body).map_err(|e| ApiError::decode(e.to_string()))?;
        self.execute(path, move |http, url| http.post(url).json(&payload))
    }

    fn alert_settings(&self, network_id: &str) -> Result<AlertSettings, ApiError> {
        self.get(&format!("/networks/{}/alerts/settings", network_id))
    }

    fn write_alert_settings(
        &self,
        network_id: &str,
        settings: &AlertSettings,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value =
            self.put(&format!("/networks/{}/alerts/settings", network_id), settings)?;
        Ok(())
    }
}

impl DashboardClient for HttpDashboard {
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.get("/organizations")
    }

    fn list_networks(&self, org_id: &str) -> Result<Vec<Network>, ApiError> {
        self.get(&format!("/organizations/{}/networks", org_id))
    }

    fn get_alert_rules(&self, network_id: &str) -> Result<Vec<RemoteAlertRule>, ApiError> {
        let settings = self.alert_settings(network_id)?;
        Ok(settings
            .alerts
            .into_iter()
            .map(|spec| RemoteAlertRule {
                id: spec.alert_type.clone(),
                spec,
            })
            .collect())
    }

    fn create_alert_rule(&self, network_id: &str, rule: &AlertRuleSpec) -> Result<Ack, ApiError> {
        let mut settings = self.alert_settings(network_id)?;
        settings.alerts.retain(|r| r.alert_type != rule.alert_type);
        settings.alerts.push(rule.clone());
        self.write_alert_settings(network_id, &settings)?;
        Ok(Ack {
            rule_id: Some(rule.alert_type.clone()),
        })
    }

    fn update_alert_rule(
        &self,
        network_id: &str,
        rule_id: &str,
        fields: &RuleFieldPatch,
    ) -> Result<Ack, ApiError> {
        let mut settings = self.alert_settings(network_id)?;
        let rule = settings
            .alerts
            .iter_mut()
            .find(|r| r.alert_type == rule_id)
            .ok_or_else(|| ApiError::NotFound(format!("alert rule {}", rule_id)))?;
        if let Some(enabled) = fields.enabled {
            rule.enabled = enabled;
        }
        if let Some(destinations) = &fields.alert_destinations {
            rule.alert_destinations = destinations.clone();
        }
        if let Some(filters) = &fields.filters {
            rule.filters = filters.clone();
        }
        self.write_alert_settings(network_id, &settings)?;
        Ok(Ack {
            rule_id: Some(rule_id.to_string()),
        })
    }

    fn list_webhooks(&self, network_id: &str) -> Result<Vec<WebhookSpec>, ApiError> {
        self.get(&format!("/networks/{}/webhooks/httpServers", network_id))
    }

    fn create_webhook(&self, network_id: &str, spec: &WebhookSpec) -> Result<String, ApiError> {
        let created: CreatedWebhook =
            self.post(&format!("/networks/{}/webhooks/httpServers", network_id), spec)?;
        Ok(created.id)
    }
}
