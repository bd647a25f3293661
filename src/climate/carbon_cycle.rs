//! Four-reservoir carbon cycle with temperature and feedbacks (spec §4.1).
//!
//! Pure numerics: this component never fails. Clipping decisions are routed
//! through `utils::flux_guard` as diagnostics, never as errors.

use serde::{Deserialize, Serialize};

use crate::config::const_funcs::bau_emissions;
use crate::config::constants::*;
use crate::utils::flux_guard::FluxGuard;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonCycleState {
    pub c_atm_gtc: f64,
    pub c_ocean_surface_gtc: f64,
    pub c_ocean_deep_gtc: f64,
    pub c_land_gtc: f64,
    pub temperature_anomaly_c: f64,
    pub cumulative_emissions_gtc: f64,
    pub vulnerable_permafrost_remaining_gtc: f64,
    /// Running counter of this year's not-yet-mitigated human emissions.
    /// Reset at tick start (§9 "rollover" design note); decremented as
    /// avoided-deforestation and conventional-mitigation flows are applied
    /// so the two channels never jointly over-mitigate a year's emissions.
    pub remaining_human_emissions_gtc: f64,
    ticks_elapsed: u32,
}

impl CarbonCycleState {
    pub fn new(initial_co2_ppm: f64) -> Self {
        Self {
            c_atm_gtc: initial_co2_ppm * GTC_PER_PPM,
            c_ocean_surface_gtc: INITIAL_OCEAN_SURFACE_GTC,
            c_ocean_deep_gtc: INITIAL_OCEAN_DEEP_GTC,
            c_land_gtc: INITIAL_LAND_GTC,
            temperature_anomaly_c: 0.0,
            cumulative_emissions_gtc: 0.0,
            vulnerable_permafrost_remaining_gtc: INITIAL_VULNERABLE_PERMAFROST_GTC,
            remaining_human_emissions_gtc: 0.0,
            ticks_elapsed: 0,
        }
    }

    pub fn co2_ppm(&self) -> f64 {
        self.c_atm_gtc / GTC_PER_PPM
    }

    /// True if any reservoir is negative. `CarbonCycle::step` clips every
    /// reservoir update to zero, so this should never be true in practice;
    /// it exists as the tick-boundary invariant check's last line of defense.
    pub fn has_negative_stock(&self) -> bool {
        self.c_atm_gtc < 0.0 || self.c_ocean_surface_gtc < 0.0 || self.c_ocean_deep_gtc < 0.0 || self.c_land_gtc < 0.0
    }

    /// Phase-0 rollover: record this year's gross human emissions before any
    /// structural reduction is applied.
    pub fn begin_tick(&mut self, bau_emissions_gtc: f64) {
        self.remaining_human_emissions_gtc = bau_emissions_gtc.max(0.0);
    }

    /// Apply avoided-deforestation reduction against the remaining human
    /// emissions pool, returning the amount actually applied.
    pub fn apply_avoided_deforestation(&mut self, requested_gtc: f64) -> f64 {
        let applied = requested_gtc.max(0.0).min(self.remaining_human_emissions_gtc);
        self.remaining_human_emissions_gtc -= applied;
        applied
    }

    /// Cap conventional mitigation against whatever human-emissions headroom
    /// avoided deforestation left behind.
    pub fn cap_conventional_mitigation(&mut self, requested_gtc: f64) -> f64 {
        let applied = requested_gtc.max(0.0).min(self.remaining_human_emissions_gtc);
        self.remaining_human_emissions_gtc -= applied;
        applied
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CarbonCycleDelta {
    pub net_anthropogenic_flux_gtc: f64,
    pub ocean_uptake_gtc: f64,
    pub land_uptake_gtc: f64,
    pub permafrost_emissions_gtc: f64,
    pub fire_emissions_gtc: f64,
    pub atmospheric_delta_gtc: f64,
    pub new_co2_ppm: f64,
    pub new_temperature_c: f64,
}

pub struct CarbonCycle;

impl CarbonCycle {
    /// Advance the carbon cycle by one year (spec §4.1, steps 1-8).
    pub fn step(
        state: &mut CarbonCycleState,
        bau_emissions_gtc: f64,
        cdr_removal_gtc: f64,
        conv_mitigation_gtc: f64,
        avdef_gtc: f64,
        reversal_gtc: f64,
        guard: &mut FluxGuard,
    ) -> CarbonCycleDelta {
        // Step 1: net anthropogenic flux.
        let net_flux = (bau_emissions_gtc - conv_mitigation_gtc - avdef_gtc).max(0.0);

        // Step 2: ocean uptake.
        let temp = state.temperature_anomaly_c;
        let beta = 1.0 - OCEAN_BETA_TEMP_COEFFICIENT * (temp - OCEAN_BETA_REFERENCE_TEMP_C);
        let gamma = 1.0 / (1.0 + OCEAN_GAMMA_SATURATION_COEFFICIENT * (state.c_atm_gtc - OCEAN_GAMMA_REFERENCE_GTC));
        let mut f_ocean = OCEAN_UPTAKE_K_O * net_flux * beta * gamma;
        let f_mix = OCEAN_MIXING_K_MIX * (state.c_ocean_surface_gtc - OCEAN_SURFACE_EQUILIBRIUM_GTC);

        // Step 3: land net flux.
        let f_resp = LAND_RESPIRATION_BASE_GTC
            * LAND_RESPIRATION_Q10.powf((temp - LAND_RESPIRATION_REFERENCE_TEMP_C) / 10.0);
        let f_fire_excess = (temp - LAND_FIRE_TEMP_THRESHOLD_C).max(0.0);
        let f_fire = LAND_FIRE_BASE_GTC * (1.0 + LAND_FIRE_TEMP_COEFFICIENT * f_fire_excess * f_fire_excess);
        let mut f_land = LAND_UPTAKE_K_L * (state.c_atm_gtc / PRE_INDUSTRIAL_C_ATM_GTC).ln()
            - f_resp
            - f_fire
            - LAND_USE_CHANGE_BASELINE_GTC;

        // Step 4: permafrost feedback.
        let f_pf = if temp >= PERMAFROST_THRESHOLD_C {
            let release = PERMAFROST_RELEASE_COEFFICIENT
                * (temp - PERMAFROST_THRESHOLD_C)
                * state.vulnerable_permafrost_remaining_gtc;
            state.vulnerable_permafrost_remaining_gtc =
                (state.vulnerable_permafrost_remaining_gtc - release).max(0.0);
            release
        } else {
            0.0
        };

        // Step 8 (applied before committing step 5/6): clip uptake so the
        // atmosphere never needs to go negative to supply it.
        let available_flux = net_flux + f_pf + reversal_gtc + cdr_removal_gtc;
        if f_ocean + f_land > available_flux {
            let scale = if f_ocean + f_land > 0.0 { available_flux / (f_ocean + f_land) } else { 0.0 };
            guard.record(
                "carbon_cycle",
                format!(
                    "clipping combined ocean+land uptake {:.4} GtC to available flux {:.4} GtC",
                    f_ocean + f_land,
                    available_flux
                ),
            );
            f_ocean *= scale;
            f_land *= scale;
        }

        // Step 5: atmospheric update.
        let atm_delta = net_flux - f_ocean - f_land + f_pf - cdr_removal_gtc + reversal_gtc;
        state.c_atm_gtc = (state.c_atm_gtc + atm_delta).max(0.0);

        // Step 6: ocean transfer.
        state.c_ocean_surface_gtc = (state.c_ocean_surface_gtc + f_ocean - f_mix).max(0.0);
        state.c_ocean_deep_gtc = (state.c_ocean_deep_gtc + f_mix).max(0.0);
        state.c_land_gtc = (state.c_land_gtc + f_land).max(0.0);

        // Step 7: cumulative emissions and temperature.
        state.cumulative_emissions_gtc += net_flux + f_pf + reversal_gtc - cdr_removal_gtc;
        state.ticks_elapsed += 1;
        let t_committed =
            T_COMMITTED_MAX_C * (1.0 - (-(state.ticks_elapsed as f64) / T_COMMITTED_TIMESCALE_YEARS).exp());
        state.temperature_anomaly_c =
            (TCRE_C_PER_1000_GTC / 1000.0) * state.cumulative_emissions_gtc + t_committed;

        CarbonCycleDelta {
            net_anthropogenic_flux_gtc: net_flux,
            ocean_uptake_gtc: f_ocean,
            land_uptake_gtc: f_land,
            permafrost_emissions_gtc: f_pf,
            fire_emissions_gtc: f_fire,
            atmospheric_delta_gtc: atm_delta,
            new_co2_ppm: state.co2_ppm(),
            new_temperature_c: state.temperature_anomaly_c,
        }
    }

    /// BAU emissions trajectory for a given tick (§4.1 "BAU trajectory").
    pub fn bau_emissions_for_tick(tick: u32, bau_peak_year: u32) -> f64 {
        bau_emissions(tick, bau_peak_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stocks_stay_non_negative_over_many_steps() {
        let mut state = CarbonCycleState::new(420.0);
        let mut guard = FluxGuard::new();
        for tick in 0..200 {
            let bau = CarbonCycle::bau_emissions_for_tick(tick, 6);
            state.begin_tick(bau);
            CarbonCycle::step(&mut state, bau, 0.0, 0.0, 0.0, 0.0, &mut guard);
            assert!(state.c_atm_gtc >= 0.0);
            assert!(state.c_ocean_surface_gtc >= 0.0);
            assert!(state.c_ocean_deep_gtc >= 0.0);
            assert!(state.c_land_gtc >= 0.0);
        }
    }

    #[test]
    fn ppm_conversion_round_trips() {
        let state = CarbonCycleState::new(400.0);
        assert!((state.co2_ppm() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn cdr_removal_reduces_atmospheric_carbon_vs_no_removal() {
        let mut with_cdr = CarbonCycleState::new(420.0);
        let mut without_cdr = CarbonCycleState::new(420.0);
        let mut guard = FluxGuard::new();
        for tick in 0..10 {
            let bau = CarbonCycle::bau_emissions_for_tick(tick, 6);
            with_cdr.begin_tick(bau);
            without_cdr.begin_tick(bau);
            CarbonCycle::step(&mut with_cdr, bau, 5.0, 0.0, 0.0, 0.0, &mut guard);
            CarbonCycle::step(&mut without_cdr, bau, 0.0, 0.0, 0.0, 0.0, &mut guard);
        }
        assert!(with_cdr.c_atm_gtc < without_cdr.c_atm_gtc);
    }

    #[test]
    fn conventional_mitigation_cap_never_exceeds_remaining_emissions() {
        let mut state = CarbonCycleState::new(420.0);
        state.begin_tick(5.0);
        let applied_avdef = state.apply_avoided_deforestation(3.0);
        assert_eq!(applied_avdef, 3.0);
        let applied_conv = state.cap_conventional_mitigation(10.0);
        assert_eq!(applied_conv, 2.0);
        assert_eq!(state.remaining_human_emissions_gtc, 0.0);
    }
}
