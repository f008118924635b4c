//! Plain-text rendering of the dashboard

use std::fmt::Write;

use super::DashboardState;

pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();
    let totals = &state.totals;

    let updated = state
        .last_updated
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    let _ = writeln!(out, "FusionSolar dashboard (updated: {})", updated);
    if let Some(error) = &state.last_error {
        let _ = writeln!(out, "  ! {}", error);
    }
    let _ = writeln!(
        out,
        "  Plants: {}  Capacity: {:.2} kWp  Healthy: {}  Faulty: {}  Disconnected: {}",
        totals.plant_count, totals.total_capacity, totals.healthy, totals.faulty, totals.disconnected
    );
    let _ = writeln!(
        out,
        "  Today: {:.2} kWh / {:.2}  Month: {:.2} kWh  Lifetime: {:.2} kWh / {:.2}",
        totals.day_power, totals.day_income, totals.month_power, totals.total_power, totals.total_income
    );

    for plant in &state.plants {
        let snapshot = state.snapshot.iter().find(|s| s.station_code == plant.code);
        let day_power = snapshot.and_then(|s| s.items.day_power).unwrap_or(0.0);
        let day_income = snapshot.and_then(|s| s.items.day_income).unwrap_or(0.0);
        let health = snapshot
            .map(|s| s.health().to_string())
            .unwrap_or_else(|| "no data".to_string());

        let _ = writeln!(
            out,
            "  - {:<24} {:>10.2} kWh {:>10.2}  {}",
            plant.name, day_power, day_income, health
        );
    }

    out
}
