//! Derived-value helpers shared across components.
//!
//! These are pure functions of their inputs: no RNG, no mutation, so every
//! component can compute the same curve independently and tests can assert
//! exact values.

use crate::config::constants::*;

/// Logistic sigmoid centered at `midpoint`, steepness `slope`, in [0, 1].
#[inline]
pub fn sigmoid(x: f64, midpoint: f64, slope: f64) -> f64 {
    1.0 / (1.0 + (-slope * (x - midpoint)).exp())
}

/// Experience-curve learning multiplier: `(max(x, eps) / x_ref)^(-b)`.
///
/// `b = log2(1 / (1 - learning_rate))`. Cumulative deployment below `x_ref`
/// makes cost *rise* above the reference cost -- the reference point is a
/// calibration anchor, not a floor.
pub fn learning_multiplier(cumulative_deployment_gtc: f64, learning_rate: f64) -> f64 {
    let b = (1.0 / (1.0 - learning_rate)).log2();
    let x = cumulative_deployment_gtc.max(LEARNING_EPSILON_GTC);
    (x / LEARNING_REFERENCE_DEPLOYMENT_GTC).powf(-b)
}

/// Sigmoid taper applied to the CDR learning rate past a configurable
/// cumulative-deployment slope, so learning gains slow as the channel
/// matures rather than compounding indefinitely.
pub fn cdr_learning_taper(cumulative_deployment_gtc: f64) -> f64 {
    1.0 - sigmoid(
        cumulative_deployment_gtc,
        CDR_LEARNING_TAPER_MIDPOINT_GTC,
        CDR_LEARNING_TAPER_SLOPE,
    ) * 0.5
}

/// Depletion multiplier: cost rises logarithmically with project count.
pub fn depletion_multiplier(project_count: usize) -> f64 {
    1.0 + DEPLETION_COEFFICIENT * ((project_count as f64 + 1.0).log10())
}

/// CONVENTIONAL scarcity multiplier: sigmoid ramp from 1.0x to `max_multiplier`
/// centered at `center_fraction` of the easy budget, floored at
/// `capacity_floor` once the easy budget is exhausted.
pub fn conventional_scarcity_multiplier(cumulative_deployment_gtc: f64) -> f64 {
    let fraction = cumulative_deployment_gtc / CONVENTIONAL_EASY_BUDGET_GTC;
    let ramp = sigmoid(fraction, CONVENTIONAL_SCARCITY_CENTER_FRACTION, SCARCITY_SIGMOID_SLOPE);
    1.0 + ramp * (CONVENTIONAL_SCARCITY_MAX_MULTIPLIER - 1.0)
}

pub fn conventional_scarcity_capacity_fraction(cumulative_deployment_gtc: f64) -> f64 {
    let fraction = cumulative_deployment_gtc / CONVENTIONAL_EASY_BUDGET_GTC;
    let ramp = sigmoid(fraction, CONVENTIONAL_SCARCITY_CENTER_FRACTION, SCARCITY_SIGMOID_SLOPE);
    1.0 - ramp * (1.0 - CONVENTIONAL_SCARCITY_CAPACITY_FLOOR)
}

/// CDR material scarcity multiplier against a configurable material budget.
pub fn cdr_scarcity_multiplier(cumulative_deployment_gtc: f64, material_budget_gtc: f64, max_multiplier: f64) -> f64 {
    let fraction = cumulative_deployment_gtc / material_budget_gtc;
    let ramp = sigmoid(fraction, CDR_SCARCITY_CENTER_FRACTION, SCARCITY_SIGMOID_SLOPE);
    1.0 + ramp * (max_multiplier - 1.0)
}

pub fn cdr_scarcity_capacity_fraction(cumulative_deployment_gtc: f64, material_budget_gtc: f64, capacity_floor: f64) -> f64 {
    let fraction = cumulative_deployment_gtc / material_budget_gtc;
    let ramp = sigmoid(fraction, CDR_SCARCITY_CENTER_FRACTION, SCARCITY_SIGMOID_SLOPE);
    1.0 - ramp * (1.0 - capacity_floor)
}

/// Net-zero proximity penalty for CONVENTIONAL initiation cost: 1.0x at
/// `E:S >= start_ratio`, ramping exponentially to `max_multiplier` as the
/// ratio falls to `end_ratio`.
pub fn net_zero_proximity_penalty(es_ratio: f64) -> f64 {
    if es_ratio >= NET_ZERO_PENALTY_START_RATIO {
        return 1.0;
    }
    let clamped = es_ratio.max(NET_ZERO_PENALTY_END_RATIO);
    let span = NET_ZERO_PENALTY_START_RATIO - NET_ZERO_PENALTY_END_RATIO;
    let progress = (NET_ZERO_PENALTY_START_RATIO - clamped) / span; // 0 at start, 1 at end
    NET_ZERO_PENALTY_MAX_MULTIPLIER.powf(progress)
}

/// Capacity taper near the frontier of a channel's maximum deployment rate,
/// used so planned-rate capacity checks soften rather than hard-cut.
pub fn capacity_taper_fraction(planned_rate_gt: f64, max_capacity_gt: f64) -> f64 {
    let fraction = planned_rate_gt / max_capacity_gt;
    1.0 - sigmoid(fraction, 0.9, CAPACITY_TAPER_SLOPE)
}

/// Scale damper: normalized sigmoid from `SCALE_DAMPER_MIN_FRACTION` at zero
/// cumulative deployment to 1.0 at `full_scale_gt`, midpoint at
/// `SCALE_DAMPER_MIDPOINT_FRACTION` of full scale.
pub fn scale_damper(cumulative_global_gt: f64, full_scale_gt: f64, slope: f64) -> f64 {
    let fraction = cumulative_global_gt / full_scale_gt;
    let ramp = sigmoid(fraction, SCALE_DAMPER_MIDPOINT_FRACTION, slope);
    SCALE_DAMPER_MIN_FRACTION + ramp * (1.0 - SCALE_DAMPER_MIN_FRACTION)
}

/// Project-count damper: caps how many projects a channel may initiate per
/// year as cumulative deployment grows, independent of the per-project
/// scale damper above.
pub fn count_damper(cumulative_global_gt: f64) -> f64 {
    let fraction = cumulative_global_gt / COUNT_DAMPER_REFERENCE_DEPLOYMENT_GTC;
    let ramp = sigmoid(fraction, 0.5, COUNT_DAMPER_SLOPE);
    COUNT_DAMPER_MIN_FRACTION + (1.0 - ramp) * (1.0 - COUNT_DAMPER_MIN_FRACTION)
}

/// Climate-urgency multiplier applied to the project-count damper, keyed off
/// atmospheric CO2 and normalized realized inflation (§4.2).
pub fn urgency_multiplier(co2_ppm: f64, inflation_ratio: f64) -> f64 {
    let high_inflation = inflation_ratio >= 2.0;
    let taper_start = URGENCY_TAPER_START_LOW_INFLATION_PPM
        + (URGENCY_TAPER_START_HIGH_INFLATION_PPM - URGENCY_TAPER_START_LOW_INFLATION_PPM)
            * inflation_ratio.min(2.0) / 2.0;

    if co2_ppm >= taper_start {
        return 1.0;
    }

    let decay = if high_inflation { URGENCY_HIGH_INFLATION_DECAY_FACTOR } else { 1.0 };

    if co2_ppm >= URGENCY_BAND_370_PPM {
        URGENCY_MULTIPLIER_BAND_390
    } else if co2_ppm >= URGENCY_BAND_360_PPM {
        URGENCY_MULTIPLIER_BAND_370 * decay
    } else if co2_ppm >= URGENCY_BAND_350_PPM {
        URGENCY_MULTIPLIER_BAND_360 * decay
    } else {
        URGENCY_MULTIPLIER_FINAL * decay
    }
}

/// Retirement-intensification probability once atmospheric CO2 has
/// overshot below 350ppm (§4.2), scaled by an inflation tier multiplier and
/// capped.
pub fn overshoot_retirement_probability(co2_ppm: f64, inflation_ratio: f64) -> f64 {
    if co2_ppm >= URGENCY_BAND_350_PPM {
        return 0.0;
    }
    let overshoot = URGENCY_BAND_350_PPM - co2_ppm;
    let base = if overshoot <= OVERSHOOT_BAND_1_PPM {
        OVERSHOOT_PROB_BAND_1
    } else if overshoot <= OVERSHOOT_BAND_2_PPM {
        OVERSHOOT_PROB_BAND_2
    } else if overshoot <= OVERSHOOT_BAND_3_PPM {
        OVERSHOOT_PROB_BAND_3
    } else {
        OVERSHOOT_PROB_BAND_4
    };
    let inflation_mult = (OVERSHOOT_INFLATION_MULTIPLIER_MIN
        + (OVERSHOOT_INFLATION_MULTIPLIER_MAX - OVERSHOOT_INFLATION_MULTIPLIER_MIN)
            * inflation_ratio.min(2.0) / 2.0)
        .clamp(OVERSHOOT_INFLATION_MULTIPLIER_MIN, OVERSHOOT_INFLATION_MULTIPLIER_MAX);
    (base * inflation_mult).min(OVERSHOOT_RETIREMENT_PROB_CAP)
}

/// Climate risk multiplier on project failure probability (§4.7).
pub fn climate_risk_multiplier(temperature_anomaly_c: f64) -> f64 {
    if temperature_anomaly_c < CLIMATE_RISK_THRESHOLD_1_5C {
        1.0
    } else if temperature_anomaly_c < CLIMATE_RISK_THRESHOLD_2C {
        1.0 + CLIMATE_RISK_SLOPE_1_5_TO_2 * (temperature_anomaly_c - CLIMATE_RISK_THRESHOLD_1_5C)
    } else if temperature_anomaly_c < CLIMATE_RISK_THRESHOLD_3C {
        CLIMATE_RISK_BASE_AT_2C + CLIMATE_RISK_SLOPE_2_TO_3 * (temperature_anomaly_c - CLIMATE_RISK_THRESHOLD_2C)
    } else {
        CLIMATE_RISK_BASE_AT_3C + CLIMATE_RISK_SLOPE_ABOVE_3 * (temperature_anomaly_c - CLIMATE_RISK_THRESHOLD_3C)
    }
}

/// Normalized realized-inflation ratio used throughout the brake-factor and
/// urgency-taper formulas: `rho = max(pi, 0) / baseline`.
pub fn inflation_ratio(realized_inflation: f64) -> f64 {
    realized_inflation.max(0.0) / INFLATION_NORMALIZATION_BASELINE
}

/// Inflation adjustment multiplier applied to brake thresholds (§4.7).
pub fn inflation_adjustment(rho: f64) -> f64 {
    if rho < 0.5 {
        2.0
    } else if rho < 2.0 {
        2.0 - 1.0 * (rho - 0.5)
    } else {
        (0.5 - 0.05 * (rho - 2.0)).max(0.3)
    }
}

/// Heavy-brake floor as a function of normalized inflation (§4.7).
pub fn heavy_brake_floor(rho: f64) -> f64 {
    if rho < 0.5 {
        0.30
    } else if rho < 2.0 {
        // linear from 0.30 at rho=0.5 to 0.055 at rho=2.0
        0.30 + (0.055 - 0.30) * (rho - 0.5) / 1.5
    } else {
        (0.05 - 0.01 * (rho - 2.0)).max(0.01)
    }
}

/// Ratio brake (§4.7): 1.0 below `brake_start`, linear 1.0->0.5 through
/// `brake_mid`, quadratic 0.5->`heavy_brake_floor` through `brake_heavy`,
/// floored at `heavy_brake_floor` beyond. Thresholds scale with `adj` so the
/// §8 boundary behaviors (2.0x wider at very low inflation, 0.3x narrower at
/// very high inflation) hold by construction.
pub fn ratio_brake(stability_ratio: f64, rho: f64) -> f64 {
    let adj = inflation_adjustment(rho);
    let floor = heavy_brake_floor(rho);
    let brake_start = BRAKE_START_RATIO_BASE * adj;
    let brake_mid = BRAKE_MID_RATIO_BASE * adj;
    let brake_heavy = BRAKE_HEAVY_RATIO_BASE * adj;

    if stability_ratio < brake_start {
        1.0
    } else if stability_ratio < brake_mid {
        let t = (stability_ratio - brake_start) / (brake_mid - brake_start).max(1e-9);
        1.0 - t * (1.0 - RATIO_BRAKE_MID_TARGET)
    } else if stability_ratio < brake_heavy {
        let t = (stability_ratio - brake_mid) / (brake_heavy - brake_mid).max(1e-9);
        RATIO_BRAKE_MID_TARGET - t * t * (RATIO_BRAKE_MID_TARGET - floor)
    } else {
        floor
    }
}

/// `true` once the stability ratio crosses the warning threshold (§4.6):
/// `ratio >= 8 * inflation_adjustment(rho)`.
pub fn stability_warning(stability_ratio: f64, rho: f64) -> bool {
    stability_ratio >= STABILITY_WARNING_RATIO_BASE * inflation_adjustment(rho)
}

/// Budget brake (§4.7): unity below 90% CQE budget utilization, linear down
/// to a floor of 0.25 as utilization approaches 100%.
pub fn budget_brake(cqe_budget_utilization: f64) -> f64 {
    if cqe_budget_utilization < BUDGET_BRAKE_UTILIZATION_THRESHOLD {
        1.0
    } else {
        (1.0 - (cqe_budget_utilization - BUDGET_BRAKE_UTILIZATION_THRESHOLD) / BUDGET_BRAKE_SLOPE_DIVISOR)
            .max(BUDGET_BRAKE_FLOOR)
    }
}

/// Inflation penalty on the brake factor (§4.7): unity at or below target,
/// decaying linearly above it, floored at 0.2.
pub fn brake_inflation_penalty(rho: f64) -> f64 {
    if rho > 1.0 {
        (1.0 - INFLATION_PENALTY_SLOPE * (rho - 1.0)).max(INFLATION_PENALTY_FLOOR)
    } else {
        1.0
    }
}

/// Linear CO2 roadmap from `initial_ppm` at year 0 to `target_ppm` at
/// `total_years`, used to compute the price-floor revision's roadmap gap.
pub fn linear_roadmap_co2_ppm(year: u32, total_years: u32, initial_ppm: f64, target_ppm: f64) -> f64 {
    if total_years == 0 {
        return target_ppm;
    }
    let progress = (year as f64 / total_years as f64).clamp(0.0, 1.0);
    initial_ppm + (target_ppm - initial_ppm) * progress
}

/// BAU emissions (GtC/yr) at `tick` (0-indexed year since simulation start),
/// parameterized by the year BAU emissions peak.
pub fn bau_emissions(tick: u32, bau_peak_year: u32) -> f64 {
    if tick <= bau_peak_year {
        BAU_INITIAL_EMISSIONS_GTC * (1.0 + BAU_GROWTH_RATE).powi(tick as i32)
    } else if tick <= BAU_PLATEAU_END_TICK {
        BAU_INITIAL_EMISSIONS_GTC * (1.0 + BAU_GROWTH_RATE).powi(bau_peak_year as i32)
    } else {
        let plateau_value = BAU_INITIAL_EMISSIONS_GTC * (1.0 + BAU_GROWTH_RATE).powi(bau_peak_year as i32);
        plateau_value * (1.0 - BAU_DECLINE_RATE).powi((tick - BAU_PLATEAU_END_TICK) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_half_at_midpoint() {
        assert!((sigmoid(5.0, 5.0, 1.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn learning_multiplier_decreases_with_deployment() {
        let early = learning_multiplier(0.1, 0.2);
        let late = learning_multiplier(10.0, 0.2);
        assert!(late < early);
    }

    #[test]
    fn net_zero_penalty_is_identity_above_start_ratio() {
        assert_eq!(net_zero_proximity_penalty(10.0), 1.0);
    }

    #[test]
    fn net_zero_penalty_reaches_max_at_end_ratio() {
        let penalty = net_zero_proximity_penalty(1.0);
        assert!((penalty - NET_ZERO_PENALTY_MAX_MULTIPLIER).abs() < 1e-6);
    }

    #[test]
    fn climate_risk_multiplier_is_unity_below_threshold() {
        assert_eq!(climate_risk_multiplier(1.2), 1.0);
    }

    #[test]
    fn climate_risk_multiplier_rises_with_temperature() {
        assert!(climate_risk_multiplier(2.5) > climate_risk_multiplier(1.8));
    }

    #[test]
    fn heavy_brake_floor_is_bounded() {
        for rho10 in 0..100 {
            let rho = rho10 as f64 / 10.0;
            let floor = heavy_brake_floor(rho);
            assert!(floor > 0.0 && floor <= 0.30 + 1e-9);
        }
    }

    #[test]
    fn ratio_brake_is_unity_below_brake_start() {
        assert_eq!(ratio_brake(5.0, 1.0), 1.0);
    }

    #[test]
    fn ratio_brake_decreases_monotonically_with_ratio() {
        let low = ratio_brake(9.0, 1.0);
        let mid = ratio_brake(11.0, 1.0);
        let high = ratio_brake(13.0, 1.0);
        let heavy = ratio_brake(20.0, 1.0);
        assert!(low >= mid);
        assert!(mid >= high);
        assert!(high >= heavy);
        assert!((heavy - heavy_brake_floor(1.0)).abs() < 1e-9);
    }

    #[test]
    fn ratio_brake_thresholds_widen_at_low_inflation_and_narrow_at_high() {
        // At ratio=11 (between the baseline brake_start=10 and brake_mid=12),
        // low inflation (rho<0.5, adj=2.0) pushes both thresholds out so the
        // ratio still reads as "below brake_start"; high inflation narrows
        // them so the same ratio reads as heavily braked.
        let low_inflation_rho = 0.1;
        let high_inflation_rho = 5.0;
        assert_eq!(ratio_brake(11.0, low_inflation_rho), 1.0);
        assert!(ratio_brake(11.0, high_inflation_rho) < 1.0);
    }

    #[test]
    fn budget_brake_is_unity_below_ninety_percent_utilization() {
        assert_eq!(budget_brake(0.5), 1.0);
        assert_eq!(budget_brake(0.89), 1.0);
    }

    #[test]
    fn budget_brake_floors_at_full_utilization() {
        assert!((budget_brake(1.0) - BUDGET_BRAKE_FLOOR).abs() < 1e-9);
    }

    #[test]
    fn inflation_penalty_is_unity_at_or_below_target() {
        assert_eq!(brake_inflation_penalty(1.0), 1.0);
        assert_eq!(brake_inflation_penalty(0.5), 1.0);
    }

    #[test]
    fn inflation_penalty_floors_at_high_ratio() {
        assert!((brake_inflation_penalty(10.0) - INFLATION_PENALTY_FLOOR).abs() < 1e-9);
    }

    #[test]
    fn linear_roadmap_interpolates_from_initial_to_target() {
        assert_eq!(linear_roadmap_co2_ppm(0, 50, 420.0, 350.0), 420.0);
        assert_eq!(linear_roadmap_co2_ppm(50, 50, 420.0, 350.0), 350.0);
        assert!((linear_roadmap_co2_ppm(25, 50, 420.0, 350.0) - 385.0).abs() < 1e-9);
    }

    #[test]
    fn stability_warning_trips_above_threshold() {
        assert!(!stability_warning(5.0, 1.0));
        assert!(stability_warning(9.0, 1.0));
    }
}
