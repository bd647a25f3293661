//! Calibration constants for the GCR engine.
//!
//! Fixed thresholds and exponents are reproduced verbatim; values left as a
//! configurable knob or reasonable default are chosen here and recorded in
//! DESIGN.md. Scenario-level overrides live in `config::scenario`.

// ---------------------------------------------------------------------------
// Carbon cycle: reservoirs, conversion factors
// ---------------------------------------------------------------------------

pub const GTC_PER_PPM: f64 = 2.13;
pub const PRE_INDUSTRIAL_PPM: f64 = 278.0;
pub const PRE_INDUSTRIAL_C_ATM_GTC: f64 = PRE_INDUSTRIAL_PPM * GTC_PER_PPM;

// Four-reservoir initial stocks (GtC), standard simple-carbon-cycle orders of
// magnitude: atmosphere, surface ocean, deep ocean, land biosphere + soils.
pub const INITIAL_OCEAN_SURFACE_GTC: f64 = 900.0;
pub const INITIAL_OCEAN_DEEP_GTC: f64 = 37_100.0;
pub const INITIAL_LAND_GTC: f64 = 2_300.0;
pub const INITIAL_VULNERABLE_PERMAFROST_GTC: f64 = 1_400.0;

pub const TCRE_C_PER_1000_GTC: f64 = 0.45;
pub const T_COMMITTED_MAX_C: f64 = 0.5;
pub const T_COMMITTED_TIMESCALE_YEARS: f64 = 30.0;

// Ocean uptake.
pub const OCEAN_UPTAKE_K_O: f64 = 0.28;
pub const OCEAN_BETA_TEMP_COEFFICIENT: f64 = 0.03;
pub const OCEAN_BETA_REFERENCE_TEMP_C: f64 = 1.0;
pub const OCEAN_GAMMA_SATURATION_COEFFICIENT: f64 = 0.0015;
pub const OCEAN_GAMMA_REFERENCE_GTC: f64 = 590.0;
pub const OCEAN_MIXING_K_MIX: f64 = 0.01;
pub const OCEAN_SURFACE_EQUILIBRIUM_GTC: f64 = 900.0;

// Land net flux.
pub const LAND_UPTAKE_K_L: f64 = 2.5;
pub const LAND_RESPIRATION_BASE_GTC: f64 = 2.0;
pub const LAND_RESPIRATION_Q10: f64 = 2.0;
pub const LAND_RESPIRATION_REFERENCE_TEMP_C: f64 = 1.0;
pub const LAND_FIRE_BASE_GTC: f64 = 0.5;
pub const LAND_FIRE_TEMP_THRESHOLD_C: f64 = 1.5;
pub const LAND_FIRE_TEMP_COEFFICIENT: f64 = 0.3;
pub const LAND_USE_CHANGE_BASELINE_GTC: f64 = 1.1;

// Permafrost feedback.
pub const PERMAFROST_THRESHOLD_C: f64 = 1.5;
pub const PERMAFROST_RELEASE_COEFFICIENT: f64 = 0.005;

// BAU emissions trajectory.
pub const BAU_INITIAL_EMISSIONS_GTC: f64 = 11.0;
pub const BAU_GROWTH_RATE: f64 = 0.01;
pub const BAU_PLATEAU_END_TICK: u32 = 60;
pub const BAU_DECLINE_RATE: f64 = 0.002;
pub const DEFAULT_BAU_PEAK_YEAR: u32 = 6;

// ---------------------------------------------------------------------------
// Projects: learning, depletion, scarcity, capacity
// ---------------------------------------------------------------------------

pub const CDR_LEARNING_RATE: f64 = 0.20;
pub const CONVENTIONAL_LEARNING_RATE: f64 = 0.12;
pub const LEARNING_REFERENCE_DEPLOYMENT_GTC: f64 = 1.0;
pub const LEARNING_EPSILON_GTC: f64 = 1.0e-6;
pub const DEPLETION_COEFFICIENT: f64 = 0.15;

pub const CDR_LEARNING_TAPER_MIDPOINT_GTC: f64 = 10.0;
pub const CDR_LEARNING_TAPER_SLOPE: f64 = 0.3;

pub const CONVENTIONAL_EASY_BUDGET_GTC: f64 = 1_000.0;
pub const CONVENTIONAL_SCARCITY_CENTER_FRACTION: f64 = 0.70;
pub const CONVENTIONAL_SCARCITY_MAX_MULTIPLIER: f64 = 4.0;
pub const CONVENTIONAL_SCARCITY_CAPACITY_FLOOR: f64 = 0.10;
pub const SCARCITY_SIGMOID_SLOPE: f64 = 8.0;

pub const DEFAULT_CDR_MATERIAL_BUDGET_GTC: f64 = 500.0;
pub const CDR_SCARCITY_CENTER_FRACTION: f64 = 0.60;
pub const DEFAULT_CDR_MATERIAL_COST_MULTIPLIER: f64 = 4.0;
pub const DEFAULT_CDR_MATERIAL_CAPACITY_FLOOR: f64 = 0.25;

/// Finite stand-in for an undefined emissions-to-sequestration ratio (zero
/// sequestration this tick). Large enough to read as "effectively no
/// progress" without introducing infinities into next tick's brake-factor
/// arithmetic.
pub const ES_RATIO_NO_SEQUESTRATION_CAP: f64 = 1000.0;

pub const NET_ZERO_PENALTY_START_RATIO: f64 = 6.0;
pub const NET_ZERO_PENALTY_END_RATIO: f64 = 1.0;
pub const NET_ZERO_PENALTY_MAX_MULTIPLIER: f64 = 100.0;

pub const CONVENTIONAL_MAX_CAPACITY_GT_PER_YEAR: f64 = 30.0;
pub const AVOIDED_DEFORESTATION_MAX_CAPACITY_GT_PER_YEAR: f64 = 5.0;
pub const DEFAULT_CDR_MAX_CAPACITY_GT_PER_YEAR: f64 = 20.0;
pub const CAPACITY_TAPER_SLOPE: f64 = 10.0;

pub const HOST_SELECTION_GDP_JITTER: f64 = 0.5;

/// Upfront capital cost expressed as a multiple of first-year revenue at
/// marginal cost (calibration default: projects capitalize roughly three
/// years of output upfront, see DESIGN.md).
pub const CAPEX_YEARS_MULTIPLIER: f64 = 3.0;

/// Development period in years, sampled uniformly per project (§4.2).
pub const PROJECT_DEVELOPMENT_YEARS_MIN: u32 = 1;
pub const PROJECT_DEVELOPMENT_YEARS_MAX: u32 = 4;

pub const PROJECT_SEQUESTRATION_MIN_MT: f64 = 10.0;
pub const PROJECT_SEQUESTRATION_MAX_MT: f64 = 100.0;
pub const DEFAULT_FULL_SCALE_GT: f64 = 35.0;
pub const SCALE_DAMPER_MIN_FRACTION: f64 = 0.15;
pub const SCALE_DAMPER_MIDPOINT_FRACTION: f64 = 0.30;
pub const DEFAULT_SCALE_DAMPER_SLOPE: f64 = 8.0;

pub const COUNT_DAMPER_MIN_FRACTION: f64 = 0.30;
pub const COUNT_DAMPER_SLOPE: f64 = 6.0;
pub const COUNT_DAMPER_REFERENCE_DEPLOYMENT_GTC: f64 = 20.0;

// Climate-urgency taper (§4.2).
pub const URGENCY_TAPER_START_LOW_INFLATION_PPM: f64 = 370.0;
pub const URGENCY_TAPER_START_HIGH_INFLATION_PPM: f64 = 425.0;
pub const URGENCY_BAND_390_PPM: f64 = 390.0;
pub const URGENCY_BAND_370_PPM: f64 = 370.0;
pub const URGENCY_BAND_360_PPM: f64 = 360.0;
pub const URGENCY_BAND_350_PPM: f64 = 350.0;
pub const URGENCY_MULTIPLIER_BAND_390: f64 = 0.60;
pub const URGENCY_MULTIPLIER_BAND_370: f64 = 0.35;
pub const URGENCY_MULTIPLIER_BAND_360: f64 = 0.10;
pub const URGENCY_MULTIPLIER_FINAL: f64 = 0.02;
pub const URGENCY_HIGH_INFLATION_DECAY_FACTOR: f64 = 0.5;

// Retirement intensification below 350ppm (§4.2).
pub const OVERSHOOT_BAND_1_PPM: f64 = 5.0;
pub const OVERSHOOT_BAND_2_PPM: f64 = 15.0;
pub const OVERSHOOT_BAND_3_PPM: f64 = 30.0;
pub const OVERSHOOT_PROB_BAND_1: f64 = 0.15;
pub const OVERSHOOT_PROB_BAND_2: f64 = 0.22;
pub const OVERSHOOT_PROB_BAND_3: f64 = 0.30;
pub const OVERSHOOT_PROB_BAND_4: f64 = 0.40;
pub const OVERSHOOT_INFLATION_MULTIPLIER_MIN: f64 = 0.8;
pub const OVERSHOOT_INFLATION_MULTIPLIER_MAX: f64 = 1.4;
pub const OVERSHOOT_RETIREMENT_PROB_CAP: f64 = 0.5;

// Failure and reversal.
pub const BASE_ANNUAL_FAILURE_PROB: f64 = 0.02;
pub const CDR_FAILURE_SENSITIVITY: f64 = 1.0;
pub const CONVENTIONAL_FAILURE_SENSITIVITY: f64 = 1.2;
pub const AVOIDED_DEFORESTATION_FAILURE_SENSITIVITY: f64 = 1.5;
pub const CDR_REVERSAL_FRACTION: f64 = 0.10;
pub const NON_CDR_REVERSAL_FRACTION: f64 = 0.50;

pub const CDR_MAX_OPERATIONAL_YEARS: u32 = 100;
pub const CONVENTIONAL_MAX_OPERATIONAL_YEARS: u32 = 25;
pub const AVOIDED_DEFORESTATION_MAX_OPERATIONAL_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Auditor
// ---------------------------------------------------------------------------

pub const VERIFICATION_BASE_FAILURE_PROB: f64 = 0.01;
pub const COBENEFIT_OVERLAY_FRACTION: f64 = 0.15;
pub const CLAWBACK_BURN_FRACTION: f64 = 0.50;

// ---------------------------------------------------------------------------
// CQE / central bank alliance
// ---------------------------------------------------------------------------

pub const CQE_BUDGET_CAPITAL_FRACTION: f64 = 0.05;
pub const CQE_BUDGET_GDP_FRACTION: f64 = 0.005;
pub const CQE_WILLINGNESS_K: f64 = 12.0;
pub const CQE_INFLATION_TARGET_MULTIPLIER: f64 = 1.5;
pub const CQE_INTERVENTION_SIZING: f64 = 0.02;
pub const CQE_MAX_INFLATION_IMPACT_PP: f64 = 0.02;
pub const CQE_INFLATION_REVERSION_MIN: f64 = 0.25;
pub const CQE_INFLATION_REVERSION_MAX: f64 = 0.40;

// ---------------------------------------------------------------------------
// Market: sentiment, capital, price discovery
// ---------------------------------------------------------------------------

pub const SENTIMENT_MIN: f64 = 0.1;
pub const SENTIMENT_MAX: f64 = 1.0;
pub const SENTIMENT_NEW_WARNING_DECAY: f64 = 0.97;
pub const SENTIMENT_PERSISTENT_WARNING_DECAY: f64 = 0.995;
pub const SENTIMENT_INFLATION_DECAY_1_5X: f64 = 0.995;
pub const SENTIMENT_INFLATION_DECAY_2X: f64 = 0.97;
pub const SENTIMENT_INFLATION_DECAY_3X: f64 = 0.94;
pub const SENTIMENT_RECOVERY_RATE: f64 = 0.02;
pub const SENTIMENT_RECOVERY_BAND_FRACTION: f64 = 0.5;
pub const SENTIMENT_CO2_PROGRESS_BONUS: f64 = 0.01;
pub const SENTIMENT_GUIDANCE_BONUS_MAX: f64 = 0.02;
pub const SENTIMENT_FLOOR_REVISION_BONUS: f64 = 0.02;

pub const PRICE_SENTIMENT_COEFFICIENT: f64 = 50.0;

pub const DEFAULT_ONE_TIME_SEED_CAPITAL_USD: f64 = 20_000_000_000.0;
pub const SEED_CAPITAL_MARKET_CAP_THRESHOLD_USD: f64 = 50_000_000_000.0;
pub const CAPITAL_NEUTRALITY_THRESHOLD_START: f64 = 0.6;
pub const CAPITAL_NEUTRALITY_THRESHOLD_END: f64 = 0.3;
pub const CAPITAL_NEUTRALITY_RAMP_YEARS: f64 = 10.0;
pub const CAPITAL_INFLOW_SENSITIVITY_USD: f64 = 1.0e9;
pub const CAPITAL_DEMAND_PREMIUM_SENSITIVITY: f64 = 20.0;
pub const CAPITAL_INFLATION_HEDGE_SENSITIVITY: f64 = 2.0;

// ---------------------------------------------------------------------------
// CEA controller / brake factor
// ---------------------------------------------------------------------------

pub const FLOOR_REVISION_INTERVAL_YEARS: u32 = 5;
pub const FLOOR_GROWTH_MIN: f64 = -0.02;
pub const FLOOR_GROWTH_MAX: f64 = 0.10;
pub const FLOOR_GROWTH_GAP_SENSITIVITY: f64 = 0.002;
pub const FLOOR_GROWTH_INFLATION_PENALTY: f64 = 0.25;
pub const FLOOR_GROWTH_TEMP_PENALTY: f64 = 0.02;

pub const STABILITY_WARNING_RATIO_BASE: f64 = 8.0;
pub const BRAKE_START_RATIO_BASE: f64 = 10.0;
pub const BRAKE_MID_RATIO_BASE: f64 = 12.0;
pub const BRAKE_HEAVY_RATIO_BASE: f64 = 15.0;
pub const RATIO_BRAKE_MID_TARGET: f64 = 0.5;

pub const BUDGET_BRAKE_UTILIZATION_THRESHOLD: f64 = 0.9;
pub const BUDGET_BRAKE_FLOOR: f64 = 0.25;
pub const BUDGET_BRAKE_SLOPE_DIVISOR: f64 = 0.1;

pub const INFLATION_PENALTY_FLOOR: f64 = 0.2;
pub const INFLATION_PENALTY_SLOPE: f64 = 0.4;

/// Finite stand-in for an undefined stability ratio (budget is zero or
/// negative this tick). Large enough to read as "maximally strained"
/// without introducing infinities into the brake-factor arithmetic.
pub const STABILITY_RATIO_NO_BUDGET_CAP: f64 = 1.0e6;

pub const INFLATION_NORMALIZATION_BASELINE: f64 = 0.02;

pub const CLIMATE_RISK_THRESHOLD_1_5C: f64 = 1.5;
pub const CLIMATE_RISK_THRESHOLD_2C: f64 = 2.0;
pub const CLIMATE_RISK_THRESHOLD_3C: f64 = 3.0;
pub const CLIMATE_RISK_SLOPE_1_5_TO_2: f64 = 0.2;
pub const CLIMATE_RISK_SLOPE_2_TO_3: f64 = 0.3;
pub const CLIMATE_RISK_SLOPE_ABOVE_3: f64 = 0.5;
pub const CLIMATE_RISK_BASE_AT_2C: f64 = 1.1;
pub const CLIMATE_RISK_BASE_AT_3C: f64 = 1.4;

// ---------------------------------------------------------------------------
// Countries
// ---------------------------------------------------------------------------

pub const COUNTRY_POOL_SIZE: usize = 50;
pub const FOUNDING_COUNTRY_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Defaults for scenario parameters
// ---------------------------------------------------------------------------

pub const DEFAULT_YEARS: u32 = 50;
pub const DEFAULT_INITIAL_CO2_PPM: f64 = 420.0;
pub const DEFAULT_TARGET_CO2_PPM: f64 = 350.0;
pub const DEFAULT_INITIAL_PRICE_FLOOR_USD: f64 = 100.0;
pub const DEFAULT_INFLATION_TARGET: f64 = 0.02;
pub const DEFAULT_ADOPTION_RATE_PER_YEAR: f64 = 3.5;
