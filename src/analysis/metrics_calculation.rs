//! Assembly of the per-tick `AnnualSnapshot` from engine sub-state (§6).

use crate::analysis::snapshot::AnnualSnapshot;
use crate::climate::carbon_cycle::{CarbonCycleDelta, CarbonCycleState};
use crate::config::constants::ES_RATIO_NO_SEQUESTRATION_CAP;
use crate::config::scenario::ScenarioConfig;
use crate::economy::{ControllerState, MarketState, TokenLedger};
use crate::projects::broker::ProjectsBroker;
use crate::projects::channel::Channel;
use crate::world::pool::CountryPool;

#[allow(clippy::too_many_arguments)]
pub fn build_annual_snapshot(
    year: u32,
    carbon_before: &CarbonCycleState,
    delta: &CarbonCycleDelta,
    bau_carbon: &CarbonCycleState,
    cdr_removal_gtc: f64,
    conventional_mitigation_gtc: f64,
    avoided_deforestation_gtc: f64,
    reversal_gtc: f64,
    climate_risk_multiplier: f64,
    broker: &ProjectsBroker,
    new_project_count: u32,
    failed_project_count: u32,
    cfg: &ScenarioConfig,
    es_ratio_for_cost: f64,
    ledger_before: &TokenLedger,
    ledger_after: &TokenLedger,
    market: &MarketState,
    controller: &ControllerState,
    cqe_spent_usd: f64,
    cqe_budget_usd: f64,
    cqe_budget_cumulative_usd: f64,
    cqe_budget_utilization: f64,
    xcr_purchased: f64,
    cobenefit_bonus_xcr: f64,
    brake_factor: f64,
    realized_inflation: f64,
    net_capital_flow_usd: f64,
    capital_demand_premium_usd: f64,
    forward_guidance: f64,
    countries: &CountryPool,
) -> AnnualSnapshot {
    let sequestration_gtc = cdr_removal_gtc + conventional_mitigation_gtc + avoided_deforestation_gtc;
    // Capped rather than left as +inf: an infinite ratio would propagate
    // into next tick's brake-factor division as NaN (inf / (inf + c)).
    let es_ratio = if sequestration_gtc > 1e-9 {
        delta.net_anthropogenic_flux_gtc / sequestration_gtc
    } else {
        ES_RATIO_NO_SEQUESTRATION_CAP
    };
    let airborne_fraction = if delta.net_anthropogenic_flux_gtc.abs() > 1e-9 {
        delta.atmospheric_delta_gtc / delta.net_anthropogenic_flux_gtc
    } else {
        0.0
    };

    AnnualSnapshot {
        year,
        co2_ppm: delta.new_co2_ppm,
        bau_co2_ppm: bau_carbon.co2_ppm(),
        co2_avoided_ppm: (bau_carbon.co2_ppm() - delta.new_co2_ppm).max(0.0),
        temperature_anomaly_c: delta.new_temperature_c,
        cumulative_emissions_gtc: carbon_before.cumulative_emissions_gtc,
        bau_emissions_gtc: delta.net_anthropogenic_flux_gtc + conventional_mitigation_gtc + avoided_deforestation_gtc,
        net_anthropogenic_flux_gtc: delta.net_anthropogenic_flux_gtc,
        cdr_removal_gtc,
        conventional_mitigation_gtc,
        avoided_deforestation_gtc,
        reversal_gtc,
        sequestration_tonnes: sequestration_gtc * 1.0e9,
        es_ratio,
        ocean_uptake_gtc: delta.ocean_uptake_gtc,
        land_uptake_gtc: delta.land_uptake_gtc,
        permafrost_emissions_gtc: delta.permafrost_emissions_gtc,
        fire_emissions_gtc: delta.fire_emissions_gtc,
        airborne_fraction,
        climate_risk_multiplier,

        operational_cdr_count: broker.operational_projects().filter(|p| p.channel == Channel::Cdr).count() as u32,
        operational_conventional_count: broker
            .operational_projects()
            .filter(|p| p.channel == Channel::Conventional)
            .count() as u32,
        operational_avoided_deforestation_count: broker
            .operational_projects()
            .filter(|p| p.channel == Channel::AvoidedDeforestation)
            .count() as u32,
        new_project_count,
        failed_project_count,
        projects_total: broker.total_project_count(),
        projects_development: broker.development_project_count(),
        net_zero_latched: broker.net_zero_latched(),
        cdr_buildout_stopped: broker.cdr_buildout_stopped(),
        cdr_cumulative_gtco2: broker.cumulative_deployment(Channel::Cdr),
        conventional_cumulative_gtco2: broker.cumulative_deployment(Channel::Conventional),
        cdr_cost_per_tonne_usd: broker.marginal_cost_per_tonne(Channel::Cdr, cfg, es_ratio_for_cost),
        conventional_cost_per_tonne_usd: broker.marginal_cost_per_tonne(Channel::Conventional, cfg, es_ratio_for_cost),
        cdr_r_effective: broker.average_effective_r_value(Channel::Cdr),
        conventional_r_effective: broker.average_effective_r_value(Channel::Conventional),
        conventional_capacity_utilization: broker.capacity_utilization(Channel::Conventional, cfg),
        cdr_material_utilization: broker.capacity_utilization(Channel::Cdr, cfg),

        xcr_minted_this_tick: ledger_after.total_minted - ledger_before.total_minted,
        xcr_burned_this_tick: ledger_after.total_burned - ledger_before.total_burned,
        xcr_burned_cumulative: ledger_after.total_burned,
        circulating_xcr_supply: ledger_after.circulating_supply(),
        cobenefit_bonus_xcr,

        market_price_usd: market.market_price_usd,
        sentiment: market.sentiment,
        price_floor_usd: controller.price_floor_usd,
        net_capital_flow_usd,
        capital_demand_premium_usd,
        forward_guidance,
        cqe_spent_usd,
        cqe_budget_usd,
        cqe_budget_cumulative_usd,
        cqe_budget_utilization,
        xcr_purchased,

        brake_factor,
        realized_inflation,

        active_country_count: countries.active_count() as u32,
    }
}
