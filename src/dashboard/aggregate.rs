//! Fold per-plant telemetry into dashboard totals

use serde::Serialize;

use crate::models::{HealthState, Plant, TelemetrySnapshot};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardTotals {
    pub plant_count: usize,
    /// Sum of rated capacity, kWp
    pub total_capacity: f64,
    pub day_power: f64,
    pub day_income: f64,
    pub month_power: f64,
    pub total_power: f64,
    pub total_income: f64,
    pub healthy: usize,
    pub faulty: usize,
    pub disconnected: usize,
}

impl DashboardTotals {
    /// Missing or unparsable fields count as zero
    pub fn compute(plants: &[Plant], snapshots: &[TelemetrySnapshot]) -> Self {
        let mut totals = Self {
            plant_count: plants.len(),
            total_capacity: plants.iter().filter_map(|p| p.capacity).sum(),
            ..Self::default()
        };

        for snapshot in snapshots {
            let items = &snapshot.items;
            totals.day_power += items.day_power.unwrap_or(0.0);
            totals.day_income += items.day_income.unwrap_or(0.0);
            totals.month_power += items.month_power.unwrap_or(0.0);
            totals.total_power += items.total_power.unwrap_or(0.0);
            totals.total_income += items.total_income.unwrap_or(0.0);

            match snapshot.health() {
                HealthState::Healthy => totals.healthy += 1,
                HealthState::Faulty => totals.faulty += 1,
                HealthState::Disconnected => totals.disconnected += 1,
                HealthState::Unknown => {}
            }
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KpiItems;

    fn snapshot(code: &str, day_power: Option<f64>, day_income: Option<f64>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            station_code: code.to_string(),
            items: KpiItems {
                day_power,
                day_income,
                ..KpiItems::default()
            },
        }
    }

    fn plant(code: &str, capacity: Option<f64>) -> Plant {
        Plant {
            code: code.to_string(),
            name: format!("Plant {}", code),
            capacity,
        }
    }

    #[test]
    fn test_sums_with_missing_as_zero() {
        let snapshots = vec![
            snapshot("A", Some(10.5), Some(2.0)),
            snapshot("B", None, Some(1.25)),
            snapshot("C", Some(4.5), None),
        ];
        let totals = DashboardTotals::compute(&[], &snapshots);

        assert_eq!(totals.day_power, 15.0);
        assert_eq!(totals.day_income, 3.25);
        assert_eq!(totals.total_power, 0.0);
        assert_eq!(totals.plant_count, 0);
    }

    #[test]
    fn test_empty_snapshot() {
        let plants = vec![plant("A", Some(5.0)), plant("B", None)];
        let totals = DashboardTotals::compute(&plants, &[]);

        assert_eq!(totals.plant_count, 2);
        assert_eq!(totals.total_capacity, 5.0);
        assert_eq!(totals.day_power, 0.0);
        assert_eq!(totals.healthy + totals.faulty + totals.disconnected, 0);
    }

    #[test]
    fn test_health_counts_and_parsed_vendor_payload() {
        let snapshots: Vec<TelemetrySnapshot> = serde_json::from_value(serde_json::json!([
            {"stationCode": "A", "dataItemMap": {"day_power": "3.5", "total_income": 100, "real_health_state": 3}},
            {"stationCode": "B", "dataItemMap": {"day_power": 1.5, "total_income": "50.5", "real_health_state": "2"}},
            {"stationCode": "C", "dataItemMap": {"real_health_state": 1}},
            {"stationCode": "D"}
        ]))
        .unwrap();

        let totals = DashboardTotals::compute(&[], &snapshots);
        assert_eq!(totals.day_power, 5.0);
        assert_eq!(totals.total_income, 150.5);
        assert_eq!(totals.healthy, 1);
        assert_eq!(totals.faulty, 1);
        assert_eq!(totals.disconnected, 1);
    }
}
