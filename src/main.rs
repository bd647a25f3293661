use std::fs;

use anyhow::Context;
use clap::Parser;

use gcr_sim::analysis::AnnualSnapshot;
use gcr_sim::cli::cli::Args;
use gcr_sim::config::ScenarioConfig;
use gcr_sim::core::shocks::ShockSchedule;
use gcr_sim::ensemble::run_ensemble;
use gcr_sim::utils::logging;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_logging(args.verbose());

    tracing::info!("Global Carbon Reward simulator starting");

    let cfg = build_config(&args);
    let shocks = build_shocks(&args);

    let summary = run_ensemble(cfg, shocks).context("simulation run failed")?;

    tracing::info!(
        runs = summary.runs,
        final_co2_ppm_mean = summary.final_co2_ppm_mean,
        final_co2_ppm_stddev = summary.final_co2_ppm_stddev,
        final_temperature_c_mean = summary.final_temperature_c_mean,
        net_zero_reached_fraction = summary.net_zero_reached_fraction,
        "ensemble complete"
    );

    if let Some(path) = args.output() {
        let snapshots: Vec<&AnnualSnapshot> = summary
            .outputs
            .first()
            .map(|o| o.snapshots.iter().collect())
            .unwrap_or_default();
        let json = serde_json::to_string_pretty(&snapshots).context("failed to serialize snapshots")?;
        fs::write(path, json).with_context(|| format!("failed to write output file {path}"))?;
        tracing::info!(path, "wrote snapshot series");
    }

    Ok(())
}

fn build_config(args: &Args) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::default();
    cfg.years = args.years();
    cfg.initial_co2_ppm = args.initial_co2_ppm();
    cfg.target_co2_ppm = args.target_co2_ppm();
    cfg.initial_price_floor_usd = args.initial_price_floor_usd();
    cfg.inflation_target = args.inflation_target();
    cfg.adoption_rate_per_year = args.adoption_rate_per_year();
    cfg.enable_audits = !args.disable_audits();
    cfg.seed = args.seed();
    cfg.monte_carlo_runs = args.monte_carlo_runs();
    cfg.cdr_buildout_stop_year = args.cdr_buildout_stop_year();
    cfg
}

fn build_shocks(args: &Args) -> ShockSchedule {
    match args.shock_tick() {
        Some(tick) => ShockSchedule::new().with_inflation_shock(tick, args.shock_inflation_delta()),
        None => ShockSchedule::new(),
    }
}
