//! Monte-Carlo ensembles: independent seeded runs in parallel (§4.10).
//!
//! Each run gets its own `ChaCha8Rng` derived from the scenario seed and
//! the run index, so runs never share mutable RNG state and the ensemble
//! is reproducible regardless of how rayon schedules the work.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::scenario::ScenarioConfig;
use crate::core::shocks::ShockSchedule;
use crate::core::simulation::{Simulation, SimulationOutput};
use crate::error::SimResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleSummary {
    pub runs: usize,
    pub final_co2_ppm_mean: f64,
    pub final_co2_ppm_stddev: f64,
    pub final_temperature_c_mean: f64,
    pub net_zero_reached_fraction: f64,
    pub outputs: Vec<SimulationOutput>,
}

/// Run `cfg.monte_carlo_runs` independent simulations and summarize the
/// spread of final-year outcomes. A single run (`monte_carlo_runs == 1`)
/// takes the same code path, just without the rayon fan-out being visible.
pub fn run_ensemble(cfg: ScenarioConfig, shocks: ShockSchedule) -> SimResult<EnsembleSummary> {
    cfg.validate()?;
    let runs = cfg.monte_carlo_runs;

    let progress = ProgressBar::new(runs as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} runs ({eta})") {
        progress.set_style(style);
    }

    let outputs: Vec<SimulationOutput> = (0..runs)
        .into_par_iter()
        .map(|run_index| {
            let mut run_cfg = cfg.clone();
            run_cfg.seed = cfg.seed.wrapping_add(run_index as u64).wrapping_mul(0x9E3779B97F4A7C15);
            let sim = Simulation::new(run_cfg, shocks.clone())?;
            let output = sim.run()?;
            progress.inc(1);
            Ok(output)
        })
        .collect::<SimResult<Vec<_>>>()?;

    progress.finish_and_clear();

    let finals: Vec<(f64, f64, bool)> = outputs
        .iter()
        .filter_map(|o| {
            o.snapshots.last().map(|s| (s.co2_ppm, s.temperature_anomaly_c, s.net_zero_latched))
        })
        .collect();

    let n = finals.len().max(1) as f64;
    let final_co2_ppm_mean = finals.iter().map(|(ppm, _, _)| ppm).sum::<f64>() / n;
    let final_temperature_c_mean = finals.iter().map(|(_, t, _)| t).sum::<f64>() / n;
    let variance = finals.iter().map(|(ppm, _, _)| (ppm - final_co2_ppm_mean).powi(2)).sum::<f64>() / n;
    let net_zero_reached_fraction = finals.iter().filter(|(_, _, latched)| *latched).count() as f64 / n;

    Ok(EnsembleSummary {
        runs,
        final_co2_ppm_mean,
        final_co2_ppm_stddev: variance.sqrt(),
        final_temperature_c_mean,
        net_zero_reached_fraction,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_run_ensemble_matches_solo_run() {
        let mut cfg = ScenarioConfig::default();
        cfg.years = 3;
        cfg.monte_carlo_runs = 1;
        let summary = run_ensemble(cfg, ShockSchedule::new()).unwrap();
        assert_eq!(summary.runs, 1);
        assert_eq!(summary.outputs[0].snapshots.len(), 3);
    }

    #[test]
    fn ensemble_runs_are_independent_seeds() {
        let mut cfg = ScenarioConfig::default();
        cfg.years = 5;
        cfg.monte_carlo_runs = 3;
        let summary = run_ensemble(cfg, ShockSchedule::new()).unwrap();
        assert_eq!(summary.outputs.len(), 3);
    }
}
