//! HTTP client for the relay's `/api/huawei/*` endpoints

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{DashboardError, Session};
use crate::models::{FailCode, Plant, TelemetrySnapshot, VendorEnvelope};

/// FusionSolar accepts at most 100 station codes per real-time KPI query
const MAX_CODES_PER_QUERY: usize = 100;

pub struct RelayClient {
    base_url: String,
    http_client: Client,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: relay_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Log in through the relay and capture the session token it hands back
    pub async fn login(&self, user_name: &str, system_code: &str) -> Result<Session, DashboardError> {
        let body = self
            .post(
                "login",
                serde_json::json!({
                    "userName": user_name,
                    "systemCode": system_code,
                }),
            )
            .await?;

        let token = body
            .get("xsrfToken")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(String::from);

        envelope_data::<Value>(body)?;

        let token = token.ok_or(DashboardError::MissingToken)?;
        tracing::info!("Logged in to FusionSolar as {}", user_name);
        Ok(Session::new(token))
    }

    /// Plant list, fetched once after login
    pub async fn fetch_plants(&self, session: &Session) -> Result<Vec<Plant>, DashboardError> {
        let body = self
            .post(
                "getStationList",
                serde_json::json!({ "xsrfToken": session.token() }),
            )
            .await?;

        // Older accounts return a bare list, newer ones a page object with `list`
        let data = envelope_data::<Value>(body)?.unwrap_or(Value::Null);
        let list = match data {
            Value::Object(mut page) => page.remove("list").unwrap_or(Value::Null),
            other => other,
        };

        match list {
            Value::Null => Ok(Vec::new()),
            list => serde_json::from_value(list).map_err(|e| DashboardError::Malformed(e.to_string())),
        }
    }

    /// Real-time KPIs for the given plants. One vendor call per 100 codes.
    pub async fn fetch_kpis(
        &self,
        session: &Session,
        station_codes: &[String],
    ) -> Result<Vec<TelemetrySnapshot>, DashboardError> {
        let mut snapshots = Vec::with_capacity(station_codes.len());

        for chunk in station_codes.chunks(MAX_CODES_PER_QUERY) {
            let body = self
                .post(
                    "getStationRealKpi",
                    serde_json::json!({
                        "xsrfToken": session.token(),
                        "stationCodes": chunk.join(","),
                    }),
                )
                .await?;

            if let Some(items) = envelope_data::<Vec<TelemetrySnapshot>>(body)? {
                snapshots.extend(items);
            }
        }

        Ok(snapshots)
    }

    /// Ask the vendor to invalidate the token
    pub async fn logout(&self, session: &Session) -> Result<(), DashboardError> {
        let body = self
            .post("logout", serde_json::json!({ "xsrfToken": session.token() }))
            .await?;
        envelope_data::<Value>(body)?;
        Ok(())
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, DashboardError> {
        let url = format!("{}/api/huawei/{}", self.base_url, endpoint);
        tracing::debug!("Relay call {}", url);

        let resp = self.http_client.post(&url).json(&body).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            // Proxies in front of the relay may answer with HTML or nothing at all
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| status.to_string());
            return Err(DashboardError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| DashboardError::Malformed(format!("{}: {}", endpoint, e)))?;

        Ok(body)
    }
}

/// Unwrap the vendor envelope, turning `success: false` into a `Vendor` error
fn envelope_data<T: DeserializeOwned>(body: Value) -> Result<Option<T>, DashboardError> {
    let envelope: VendorEnvelope<T> =
        serde_json::from_value(body).map_err(|e| DashboardError::Malformed(e.to_string()))?;

    if !envelope.success {
        return Err(DashboardError::Vendor {
            code: FailCode::from_code(envelope.fail_code),
            message: envelope.message.unwrap_or_default(),
        });
    }

    Ok(envelope.data)
}
