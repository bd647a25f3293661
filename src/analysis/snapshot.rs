//! Per-year output record (spec §6 "Output").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnnualSnapshot {
    pub year: u32,

    // Carbon cycle.
    pub co2_ppm: f64,
    pub bau_co2_ppm: f64,
    pub co2_avoided_ppm: f64,
    pub temperature_anomaly_c: f64,
    pub cumulative_emissions_gtc: f64,
    pub bau_emissions_gtc: f64,
    pub net_anthropogenic_flux_gtc: f64,
    pub cdr_removal_gtc: f64,
    pub conventional_mitigation_gtc: f64,
    pub avoided_deforestation_gtc: f64,
    pub reversal_gtc: f64,
    pub sequestration_tonnes: f64,
    pub es_ratio: f64,
    pub ocean_uptake_gtc: f64,
    pub land_uptake_gtc: f64,
    pub permafrost_emissions_gtc: f64,
    pub fire_emissions_gtc: f64,
    pub airborne_fraction: f64,
    pub climate_risk_multiplier: f64,

    // Projects.
    pub operational_cdr_count: u32,
    pub operational_conventional_count: u32,
    pub operational_avoided_deforestation_count: u32,
    pub new_project_count: u32,
    pub failed_project_count: u32,
    pub projects_total: u32,
    pub projects_development: u32,
    pub net_zero_latched: bool,
    pub cdr_buildout_stopped: bool,
    pub cdr_cumulative_gtco2: f64,
    pub conventional_cumulative_gtco2: f64,
    pub cdr_cost_per_tonne_usd: f64,
    pub conventional_cost_per_tonne_usd: f64,
    pub cdr_r_effective: f64,
    pub conventional_r_effective: f64,
    pub conventional_capacity_utilization: f64,
    pub cdr_material_utilization: f64,

    // Token economy.
    pub xcr_minted_this_tick: f64,
    pub xcr_burned_this_tick: f64,
    pub xcr_burned_cumulative: f64,
    pub circulating_xcr_supply: f64,
    pub cobenefit_bonus_xcr: f64,

    // Market and capital.
    pub market_price_usd: f64,
    pub sentiment: f64,
    pub price_floor_usd: f64,
    pub net_capital_flow_usd: f64,
    pub capital_demand_premium_usd: f64,
    pub forward_guidance: f64,
    pub cqe_spent_usd: f64,
    pub cqe_budget_usd: f64,
    pub cqe_budget_cumulative_usd: f64,
    pub cqe_budget_utilization: f64,
    pub xcr_purchased: f64,

    // Policy.
    pub brake_factor: f64,
    pub realized_inflation: f64,

    // World.
    pub active_country_count: u32,
}
