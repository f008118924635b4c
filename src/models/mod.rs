//! Data models for the FusionSolar relay and dashboard

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Relay request/response models
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "systemCode", default)]
    pub system_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
    pub port: u16,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: String,
    pub environment: String,
    pub timestamp: String,
}

// ============================================================================
// Vendor envelope and fail codes
// ============================================================================

/// Standard FusionSolar response envelope: `{success, failCode, message, data}`
#[derive(Debug, Clone, Deserialize)]
pub struct VendorEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "failCode", default)]
    pub fail_code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Known vendor failure codes reported inside a 2xx body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailCode {
    /// 305: session token expired or missing, log in again
    ReloginRequired,
    /// 407: access frequency too high
    RateLimited,
    /// 20056: station codes not owned by this account
    InvalidStationCodes,
    Other(i64),
}

impl FailCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            305 => FailCode::ReloginRequired,
            407 => FailCode::RateLimited,
            20056 => FailCode::InvalidStationCodes,
            other => FailCode::Other(other),
        }
    }

    /// Extract the fail code from a raw vendor body, if the call failed
    pub fn from_body(body: &Value) -> Option<Self> {
        let success = body.get("success").and_then(Value::as_bool).unwrap_or(true);
        if success {
            return None;
        }
        let code = body.get("failCode").and_then(Value::as_i64).unwrap_or(0);
        Some(Self::from_code(code))
    }
}

impl std::fmt::Display for FailCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailCode::ReloginRequired => write!(f, "305 (relogin required)"),
            FailCode::RateLimited => write!(f, "407 (access frequency too high)"),
            FailCode::InvalidStationCodes => write!(f, "20056 (invalid station codes)"),
            FailCode::Other(code) => write!(f, "{}", code),
        }
    }
}

// ============================================================================
// Plant and telemetry models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    #[serde(rename = "stationCode", alias = "plantCode")]
    pub code: String,
    #[serde(rename = "stationName", alias = "plantName", default)]
    pub name: String,
    /// Rated capacity in kWp
    #[serde(default, deserialize_with = "lenient_f64")]
    pub capacity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthState {
    Disconnected,
    Faulty,
    Healthy,
    Unknown,
}

impl HealthState {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => HealthState::Disconnected,
            2 => HealthState::Faulty,
            3 => HealthState::Healthy,
            _ => HealthState::Unknown,
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Disconnected => write!(f, "disconnected"),
            HealthState::Faulty => write!(f, "faulty"),
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Unknown => write!(f, "unknown"),
        }
    }
}

/// `dataItemMap` of a `getStationRealKpi` entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KpiItems {
    /// Energy yielded today, kWh
    #[serde(default, deserialize_with = "lenient_f64")]
    pub day_power: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub day_income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub month_power: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_power: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub real_health_state: Option<f64>,
}

/// One plant's telemetry from a single poll
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(rename = "stationCode", alias = "plantCode")]
    pub station_code: String,
    #[serde(rename = "dataItemMap", default)]
    pub items: KpiItems,
}

impl TelemetrySnapshot {
    pub fn health(&self) -> HealthState {
        self.items
            .real_health_state
            .map(|v| HealthState::from_code(v as i64))
            .unwrap_or(HealthState::Unknown)
    }
}

/// Accept numbers, numeric strings and null; anything else becomes `None`
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_code_from_body() {
        let body = serde_json::json!({"success": false, "failCode": 407, "data": null});
        assert_eq!(FailCode::from_body(&body), Some(FailCode::RateLimited));

        let body = serde_json::json!({"success": false, "failCode": 20056});
        assert_eq!(FailCode::from_body(&body), Some(FailCode::InvalidStationCodes));

        let body = serde_json::json!({"success": true, "failCode": 0, "data": []});
        assert_eq!(FailCode::from_body(&body), None);

        let body = serde_json::json!({"success": false, "failCode": 20001});
        assert_eq!(FailCode::from_body(&body), Some(FailCode::Other(20001)));
    }

    #[test]
    fn test_snapshot_lenient_numbers() {
        let snapshot: TelemetrySnapshot = serde_json::from_value(serde_json::json!({
            "stationCode": "NE=33554875",
            "dataItemMap": {
                "day_power": "12.5",
                "day_income": 3.75,
                "total_power": null,
                "total_income": "N/A",
                "real_health_state": "3"
            }
        }))
        .unwrap();

        assert_eq!(snapshot.items.day_power, Some(12.5));
        assert_eq!(snapshot.items.day_income, Some(3.75));
        assert_eq!(snapshot.items.total_power, None);
        assert_eq!(snapshot.items.total_income, None);
        assert_eq!(snapshot.items.month_power, None);
        assert_eq!(snapshot.health(), HealthState::Healthy);
    }

    #[test]
    fn test_snapshot_without_item_map() {
        let snapshot: TelemetrySnapshot =
            serde_json::from_value(serde_json::json!({"stationCode": "NE=1"})).unwrap();
        assert_eq!(snapshot.items, KpiItems::default());
        assert_eq!(snapshot.health(), HealthState::Unknown);
    }

    #[test]
    fn test_plant_aliases() {
        let plant: Plant = serde_json::from_value(serde_json::json!({
            "plantCode": "NE=42",
            "plantName": "Roof A",
            "capacity": 9.9
        }))
        .unwrap();
        assert_eq!(plant.code, "NE=42");
        assert_eq!(plant.name, "Roof A");
        assert_eq!(plant.capacity, Some(9.9));
    }
}
