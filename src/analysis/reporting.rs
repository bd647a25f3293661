//! Human-readable per-year summaries, emitted through `tracing` rather than
//! stdout so they compose with the rest of the engine's structured logging.

use crate::analysis::snapshot::AnnualSnapshot;

pub fn log_annual_summary(snapshot: &AnnualSnapshot) {
    tracing::info!(
        year = snapshot.year,
        co2_ppm = format!("{:.2}", snapshot.co2_ppm),
        bau_co2_ppm = format!("{:.2}", snapshot.bau_co2_ppm),
        co2_avoided_ppm = format!("{:.2}", snapshot.co2_avoided_ppm),
        temperature_c = format!("{:.3}", snapshot.temperature_anomaly_c),
        es_ratio = format!("{:.2}", snapshot.es_ratio),
        "carbon cycle"
    );
    tracing::info!(
        year = snapshot.year,
        cdr = snapshot.operational_cdr_count,
        conventional = snapshot.operational_conventional_count,
        avoided_deforestation = snapshot.operational_avoided_deforestation_count,
        new = snapshot.new_project_count,
        failed = snapshot.failed_project_count,
        net_zero_latched = snapshot.net_zero_latched,
        "project portfolio"
    );
    tracing::info!(
        year = snapshot.year,
        minted = format!("{:.2}", snapshot.xcr_minted_this_tick),
        burned = format!("{:.2}", snapshot.xcr_burned_this_tick),
        circulating = format!("{:.2}", snapshot.circulating_xcr_supply),
        price_usd = format!("{:.2}", snapshot.market_price_usd),
        floor_usd = format!("{:.2}", snapshot.price_floor_usd),
        cqe_spent_usd = format!("{:.0}", snapshot.cqe_spent_usd),
        cqe_budget_utilization = format!("{:.3}", snapshot.cqe_budget_utilization),
        xcr_purchased = format!("{:.2}", snapshot.xcr_purchased),
        "token economy"
    );
    tracing::info!(
        year = snapshot.year,
        brake_factor = format!("{:.3}", snapshot.brake_factor),
        forward_guidance = format!("{:.3}", snapshot.forward_guidance),
        capital_demand_premium_usd = format!("{:.2}", snapshot.capital_demand_premium_usd),
        active_countries = snapshot.active_country_count,
        "policy"
    );
}

pub fn log_final_summary(snapshots: &[AnnualSnapshot]) {
    let Some(last) = snapshots.last() else { return };
    tracing::info!(
        years = snapshots.len(),
        final_co2_ppm = format!("{:.2}", last.co2_ppm),
        final_temperature_c = format!("{:.3}", last.temperature_anomaly_c),
        final_circulating_xcr = format!("{:.2}", last.circulating_xcr_supply),
        net_zero_reached = last.net_zero_latched,
        "simulation complete"
    );
}
