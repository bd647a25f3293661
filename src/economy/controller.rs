//! Carbon Economic Authority: the annual policy brake and price-floor
//! revision cycle (spec §4.6/§4.7). The brake factor dampens minting and
//! project-initiation pace from three independent signals: the stability
//! ratio (XCR market cap against the annual CQE budget), CQE budget
//! utilization, and how far realized inflation sits from target.
//! `PolicyController` is the swappable decision point; `RuleBasedController`
//! is the default, deterministic implementation.

use serde::{Deserialize, Serialize};

use crate::config::const_funcs::{
    brake_inflation_penalty, budget_brake, heavy_brake_floor, inflation_ratio, linear_roadmap_co2_ppm, ratio_brake,
    stability_warning,
};
use crate::config::constants::{
    FLOOR_GROWTH_GAP_SENSITIVITY, FLOOR_GROWTH_INFLATION_PENALTY, FLOOR_GROWTH_MAX, FLOOR_GROWTH_MIN,
    FLOOR_GROWTH_TEMP_PENALTY, FLOOR_REVISION_INTERVAL_YEARS,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControllerState {
    pub price_floor_usd: f64,
    pub years_since_floor_revision: u32,
    /// `mu` locked at the last revision, applied every intervening year so
    /// the floor grows smoothly rather than jumping once every five years
    /// (§4.6 "between revisions, price_floor grows yearly at the locked mu").
    pub locked_floor_growth_rate: f64,
    pub warning: bool,
}

impl ControllerState {
    pub fn new(initial_price_floor_usd: f64) -> Self {
        Self {
            price_floor_usd: initial_price_floor_usd,
            years_since_floor_revision: 0,
            locked_floor_growth_rate: 0.0,
            warning: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BrakeOutcome {
    pub brake_factor: f64,
    pub ratio_brake: f64,
    pub budget_brake: f64,
    pub inflation_penalty: f64,
    pub stability_ratio: f64,
    pub warning: bool,
    pub floor_revised: bool,
    pub floor_growth: f64,
}

/// Per-tick inputs the CEA needs beyond what `ControllerState` already holds.
pub struct ControllerContext {
    pub stability_ratio: f64,
    pub realized_inflation: f64,
    pub temperature_anomaly_c: f64,
    pub cqe_budget_utilization: f64,
    pub tick: u32,
    pub total_years: u32,
    pub current_co2_ppm: f64,
    pub initial_co2_ppm: f64,
    pub target_co2_ppm: f64,
}

pub trait PolicyController {
    fn update(&self, state: &mut ControllerState, ctx: &ControllerContext) -> BrakeOutcome;
}

pub struct RuleBasedController;

impl PolicyController for RuleBasedController {
    fn update(&self, state: &mut ControllerState, ctx: &ControllerContext) -> BrakeOutcome {
        let rho = inflation_ratio(ctx.realized_inflation);

        let rb = ratio_brake(ctx.stability_ratio, rho);
        let bb = budget_brake(ctx.cqe_budget_utilization);
        let ip = brake_inflation_penalty(rho);
        let floor = heavy_brake_floor(rho);
        let brake_factor = (rb * bb * ip).clamp(floor, 1.0);
        state.warning = stability_warning(ctx.stability_ratio, rho);

        // Apply this year's locked growth rate to the floor before
        // potentially re-locking it below (§4.6 "grows yearly at the locked
        // mu" between revisions).
        state.price_floor_usd = (state.price_floor_usd * (1.0 + state.locked_floor_growth_rate)).max(1.0);

        state.years_since_floor_revision += 1;
        let mut floor_revised = false;
        let mut floor_growth = state.locked_floor_growth_rate;
        if state.years_since_floor_revision >= FLOOR_REVISION_INTERVAL_YEARS {
            let roadmap_ppm =
                linear_roadmap_co2_ppm(ctx.tick, ctx.total_years, ctx.initial_co2_ppm, ctx.target_co2_ppm);
            let roadmap_gap_ppm = ctx.current_co2_ppm - roadmap_ppm;
            let mu = (FLOOR_GROWTH_GAP_SENSITIVITY * roadmap_gap_ppm
                - FLOOR_GROWTH_INFLATION_PENALTY * rho.max(0.0)
                - FLOOR_GROWTH_TEMP_PENALTY * (ctx.temperature_anomaly_c - 1.5).max(0.0))
            .clamp(FLOOR_GROWTH_MIN, FLOOR_GROWTH_MAX);
            state.locked_floor_growth_rate = mu;
            state.years_since_floor_revision = 0;
            floor_revised = true;
            floor_growth = mu;
        }

        BrakeOutcome {
            brake_factor,
            ratio_brake: rb,
            budget_brake: bb,
            inflation_penalty: ip,
            stability_ratio: ctx.stability_ratio,
            warning: state.warning,
            floor_revised,
            floor_growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(stability_ratio: f64, tick: u32) -> ControllerContext {
        ControllerContext {
            stability_ratio,
            realized_inflation: 0.02,
            temperature_anomaly_c: 1.0,
            cqe_budget_utilization: 0.0,
            tick,
            total_years: 50,
            current_co2_ppm: 420.0,
            initial_co2_ppm: 420.0,
            target_co2_ppm: 350.0,
        }
    }

    #[test]
    fn brake_factor_is_bounded() {
        let controller = RuleBasedController;
        let mut state = ControllerState::new(100.0);
        for year in 0..30 {
            let outcome = controller.update(&mut state, &ctx(year as f64, year));
            assert!(outcome.brake_factor >= 0.0 && outcome.brake_factor <= 1.0);
        }
    }

    #[test]
    fn floor_revises_every_five_years() {
        let controller = RuleBasedController;
        let mut state = ControllerState::new(100.0);
        let mut revisions = 0;
        for year in 0..15 {
            let outcome = controller.update(&mut state, &ctx(3.0, year));
            if outcome.floor_revised {
                revisions += 1;
            }
        }
        assert_eq!(revisions, 3);
    }

    #[test]
    fn floor_grows_every_year_between_revisions_once_a_rate_is_locked() {
        let controller = RuleBasedController;
        let mut state = ControllerState::new(100.0);
        // First revision locks a nonzero rate (CO2 behind its roadmap).
        for year in 0..5 {
            controller.update(&mut state, &ctx(3.0, year));
        }
        assert!(state.locked_floor_growth_rate.abs() > 1e-9);
        let before = state.price_floor_usd;
        controller.update(&mut state, &ctx(3.0, 5));
        assert_ne!(state.price_floor_usd, before);
    }

    #[test]
    fn low_ratio_brake_heavily_dampens() {
        let controller = RuleBasedController;
        let mut state = ControllerState::new(100.0);
        let strained = controller.update(&mut state, &ctx(20.0, 0));
        let healthy = controller.update(&mut state, &ctx(1.0, 1));
        assert!(strained.ratio_brake < healthy.ratio_brake);
    }

    #[test]
    fn warning_trips_above_threshold() {
        let controller = RuleBasedController;
        let mut state = ControllerState::new(100.0);
        let below = controller.update(&mut state, &ctx(5.0, 0));
        let above = controller.update(&mut state, &ctx(9.0, 1));
        assert!(!below.warning);
        assert!(above.warning);
    }
}
