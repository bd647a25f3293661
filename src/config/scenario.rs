//! Scenario parameters (§6 "Input"): the knobs a caller sets before a run.

use serde::{Deserialize, Serialize};

use crate::config::constants::*;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub years: u32,
    pub initial_co2_ppm: f64,
    pub target_co2_ppm: f64,
    pub initial_price_floor_usd: f64,
    pub inflation_target: f64,
    pub adoption_rate_per_year: f64,
    pub enable_audits: bool,
    pub seed: u64,
    pub bau_peak_year: u32,
    pub one_time_seed_capital_usd: f64,
    pub cdr_material_budget_gtc: f64,
    pub cdr_material_cost_multiplier: f64,
    pub cdr_material_capacity_floor: f64,
    pub cdr_buildout_stop_year: Option<u32>,
    pub cdr_buildout_stop_on_co2_peak: bool,
    pub cdr_learning_rate: f64,
    pub conventional_learning_rate: f64,
    pub full_scale_gt: f64,
    pub scale_damper_slope: f64,
    pub cdr_max_capacity_gt_per_year: f64,
    pub monte_carlo_runs: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            years: DEFAULT_YEARS,
            initial_co2_ppm: DEFAULT_INITIAL_CO2_PPM,
            target_co2_ppm: DEFAULT_TARGET_CO2_PPM,
            initial_price_floor_usd: DEFAULT_INITIAL_PRICE_FLOOR_USD,
            inflation_target: DEFAULT_INFLATION_TARGET,
            adoption_rate_per_year: DEFAULT_ADOPTION_RATE_PER_YEAR,
            enable_audits: true,
            seed: 42,
            bau_peak_year: DEFAULT_BAU_PEAK_YEAR,
            one_time_seed_capital_usd: DEFAULT_ONE_TIME_SEED_CAPITAL_USD,
            cdr_material_budget_gtc: DEFAULT_CDR_MATERIAL_BUDGET_GTC,
            cdr_material_cost_multiplier: DEFAULT_CDR_MATERIAL_COST_MULTIPLIER,
            cdr_material_capacity_floor: DEFAULT_CDR_MATERIAL_CAPACITY_FLOOR,
            cdr_buildout_stop_year: None,
            cdr_buildout_stop_on_co2_peak: false,
            cdr_learning_rate: CDR_LEARNING_RATE,
            conventional_learning_rate: CONVENTIONAL_LEARNING_RATE,
            full_scale_gt: DEFAULT_FULL_SCALE_GT,
            scale_damper_slope: DEFAULT_SCALE_DAMPER_SLOPE,
            cdr_max_capacity_gt_per_year: DEFAULT_CDR_MAX_CAPACITY_GT_PER_YEAR,
            monte_carlo_runs: 1,
        }
    }
}

impl ScenarioConfig {
    /// Validate parameter ranges at construction time (§7: configuration
    /// errors are reported before any tick runs).
    pub fn validate(&self) -> SimResult<()> {
        if self.years == 0 {
            return Err(SimError::InvalidConfig("years must be > 0".into()));
        }
        if self.initial_co2_ppm <= 0.0 {
            return Err(SimError::InvalidConfig("initial_co2_ppm must be > 0".into()));
        }
        if self.initial_price_floor_usd <= 0.0 {
            return Err(SimError::InvalidConfig("initial_price_floor_usd must be > 0".into()));
        }
        if self.inflation_target < 0.0 {
            return Err(SimError::InvalidConfig("inflation_target must be >= 0".into()));
        }
        if self.adoption_rate_per_year < 0.0 {
            return Err(SimError::InvalidConfig("adoption_rate_per_year must be >= 0".into()));
        }
        if !(0.0..=1.0).contains(&self.cdr_material_capacity_floor) {
            return Err(SimError::InvalidConfig("cdr_material_capacity_floor must be in [0, 1]".into()));
        }
        if self.cdr_material_cost_multiplier < 1.0 {
            return Err(SimError::InvalidConfig("cdr_material_cost_multiplier must be >= 1".into()));
        }
        if !(0.0..1.0).contains(&self.cdr_learning_rate) {
            return Err(SimError::InvalidConfig("cdr_learning_rate must be in [0, 1)".into()));
        }
        if !(0.0..1.0).contains(&self.conventional_learning_rate) {
            return Err(SimError::InvalidConfig("conventional_learning_rate must be in [0, 1)".into()));
        }
        if self.monte_carlo_runs == 0 {
            return Err(SimError::InvalidConfig("monte_carlo_runs must be > 0".into()));
        }
        if let Some(stop_year) = self.cdr_buildout_stop_year {
            if stop_year > self.years {
                return Err(SimError::InvalidConfig(
                    "cdr_buildout_stop_year beyond simulation horizon is a no-op, set it to years instead".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ScenarioConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_years_is_rejected() {
        let mut cfg = ScenarioConfig::default();
        cfg.years = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn cdr_buildout_stop_year_zero_is_valid_and_blocks_all_cdr() {
        let mut cfg = ScenarioConfig::default();
        cfg.cdr_buildout_stop_year = Some(0);
        assert!(cfg.validate().is_ok());
    }
}
