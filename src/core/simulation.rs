//! The tick-loop driver (spec §5): owns every piece of engine state and
//! advances it one year at a time in a fixed phase order. No phase ever
//! partially commits: a phase either completes and the next phase sees its
//! output, or the whole tick aborts via `SimError` before any carbon-cycle
//! state changes (§7 "nothing-partial-commits").
//!
//! Several signals that a phase would logically need are only actually
//! produced by a *later* phase within the same tick (forward guidance, the
//! CEA's warning state, CQE budget utilization). Rather than reorder the
//! fixed phase sequence, each of these is read one tick lagged -- the value
//! a later phase produced *last* year -- and the freshly produced value is
//! stashed for next year's read. This mirrors how the teacher's own annual
//! cadence threads state between phases that can't see each other's output
//! within a single tick.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::metrics_calculation::build_annual_snapshot;
use crate::analysis::reporting::log_annual_summary;
use crate::analysis::snapshot::AnnualSnapshot;
use crate::climate::carbon_cycle::{CarbonCycle, CarbonCycleState};
use crate::config::const_funcs::{climate_risk_multiplier, heavy_brake_floor, inflation_ratio};
use crate::config::constants::{NET_ZERO_PENALTY_START_RATIO, STABILITY_RATIO_NO_BUDGET_CAP};
use crate::config::scenario::ScenarioConfig;
use crate::core::shocks::ShockSchedule;
use crate::economy::auditor::Auditor;
use crate::economy::capital::{CapitalFlowModel, CapitalMarket, RuleBasedCapitalFlow};
use crate::economy::controller::{ControllerContext, ControllerState, PolicyController, RuleBasedController};
use crate::economy::cqe::{CentralBankAlliance, CqeDefense, RuleBasedCqe};
use crate::economy::ledger::TokenLedger;
use crate::economy::market::{InvestorMarket, MarketState, RuleBasedSentiment, SentimentContext, SentimentModel};
use crate::error::{SimError, SimResult};
use crate::projects::broker::{InitiationContext, ProjectsBroker};
use crate::projects::channel::Channel;
use crate::utils::flux_guard::FluxGuard;
use crate::world::pool::CountryPool;

pub struct Simulation {
    cfg: ScenarioConfig,
    shocks: ShockSchedule,
    rng: ChaCha8Rng,
    tick: u32,

    carbon: CarbonCycleState,
    /// Unmitigated twin, stepped alongside `carbon` with zero removal every
    /// tick, purely to report how much ppm the engine's interventions have
    /// avoided (§2 "carbon-cycle pre-step (BAU twin)", §6 `BAU_CO2_ppm`).
    bau_carbon: CarbonCycleState,
    countries: CountryPool,
    broker: ProjectsBroker,
    ledger: TokenLedger,
    market: MarketState,
    capital: CapitalMarket,
    cqe: CentralBankAlliance,
    controller: ControllerState,
    flux_guard: FluxGuard,
    bau_flux_guard: FluxGuard,

    sentiment_model: Box<dyn SentimentModel>,
    capital_model: Box<dyn CapitalFlowModel>,
    cqe_defense: Box<dyn CqeDefense>,
    policy_controller: Box<dyn PolicyController>,

    last_floor_revised: bool,
    prev_cumulative_inflow_usd: f64,
    /// This tick's CQE utilization, read by *next* tick's CEA update (the
    /// CEA runs before CQE actually defends the floor this same tick).
    last_cqe_utilization: f64,
    /// This tick's forward guidance and demand premium, read by *next*
    /// tick's sentiment/price update for the same reason.
    last_forward_guidance: f64,
    last_capital_demand_premium_usd: f64,
    /// CEA warning state the last two ticks, used to tell a freshly-tripped
    /// warning from one that has already persisted (§4.5).
    warning_prev: bool,
    warning_prev2: bool,
    snapshots: Vec<AnnualSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub snapshots: Vec<AnnualSnapshot>,
}

impl Simulation {
    pub fn new(cfg: ScenarioConfig, shocks: ShockSchedule) -> SimResult<Self> {
        cfg.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
        let countries = CountryPool::new(&mut rng);
        let market = MarketState::new(cfg.initial_price_floor_usd);
        let capital = CapitalMarket::new(cfg.one_time_seed_capital_usd);
        let controller = ControllerState::new(cfg.initial_price_floor_usd);
        let carbon = CarbonCycleState::new(cfg.initial_co2_ppm);
        let bau_carbon = CarbonCycleState::new(cfg.initial_co2_ppm);

        Ok(Self {
            cfg,
            shocks,
            rng,
            tick: 0,
            carbon,
            bau_carbon,
            countries,
            broker: ProjectsBroker::new(),
            ledger: TokenLedger::new(),
            market,
            capital,
            cqe: CentralBankAlliance::new(),
            controller,
            flux_guard: FluxGuard::new(),
            bau_flux_guard: FluxGuard::new(),
            sentiment_model: Box::new(RuleBasedSentiment),
            capital_model: Box::new(RuleBasedCapitalFlow),
            cqe_defense: Box::new(RuleBasedCqe),
            policy_controller: Box::new(RuleBasedController),
            last_floor_revised: false,
            prev_cumulative_inflow_usd: 0.0,
            last_cqe_utilization: 0.0,
            last_forward_guidance: 0.0,
            last_capital_demand_premium_usd: 0.0,
            warning_prev: false,
            warning_prev2: false,
            snapshots: Vec::new(),
        })
    }

    /// Run the full scenario horizon, returning every year's snapshot.
    pub fn run(mut self) -> SimResult<SimulationOutput> {
        let years = self.cfg.years;
        for _ in 0..years {
            self.step()?;
        }
        crate::analysis::reporting::log_final_summary(&self.snapshots);
        Ok(SimulationOutput { snapshots: self.snapshots })
    }

    fn previous_co2_ppm(&self) -> f64 {
        self.snapshots.last().map(|s| s.co2_ppm).unwrap_or(self.cfg.initial_co2_ppm)
    }

    fn previous_es_ratio(&self) -> f64 {
        self.snapshots.last().map(|s| s.es_ratio).unwrap_or(NET_ZERO_PENALTY_START_RATIO)
    }

    fn step(&mut self) -> SimResult<()> {
        let tick = self.tick;
        self.flux_guard.set_year(tick);
        self.bau_flux_guard.set_year(tick);

        // Shocks -> inflation correction.
        let inflation_shock = self.shocks.inflation_delta_for_tick(tick);
        let realized_inflation = self.cfg.inflation_target + inflation_shock + self.cqe.inflation_impact_pp;
        let rho = inflation_ratio(realized_inflation);

        // Country adoption.
        self.countries.adopt_for_tick(self.cfg.adoption_rate_per_year, &mut self.rng);

        let bau = CarbonCycle::bau_emissions_for_tick(tick, self.cfg.bau_peak_year);

        // Carbon-cycle pre-step: the unmitigated twin, stepped with zero
        // removal/mitigation/reversal so it tracks what the atmosphere would
        // have done absent this engine's interventions.
        CarbonCycle::step(&mut self.bau_carbon, bau, 0.0, 0.0, 0.0, 0.0, &mut self.bau_flux_guard);

        self.carbon.begin_tick(bau);

        let co2_before = self.previous_co2_ppm();
        let co2_declining = self.carbon.co2_ppm() < co2_before;

        // Investor sentiment update. Forward guidance and the CEA warning
        // read here are last tick's values (see struct docs).
        let warning_ctx = if !self.warning_prev {
            None
        } else if self.warning_prev2 {
            Some(false)
        } else {
            Some(true)
        };
        let sentiment_ctx = SentimentContext {
            co2_declining,
            realized_inflation,
            inflation_target: self.cfg.inflation_target,
            floor_revised_up: self.last_floor_revised,
            forward_guidance: self.last_forward_guidance,
            warning: warning_ctx,
        };
        InvestorMarket::step(
            &mut self.market,
            self.sentiment_model.as_ref(),
            self.controller.price_floor_usd,
            self.last_capital_demand_premium_usd,
            &sentiment_ctx,
        );

        // Capital-market update: net flow, demand premium, forward guidance.
        let market_cap_usd = self.ledger.circulating_supply() * self.market.market_price_usd;
        let capital_outcome = self.capital.step(
            self.capital_model.as_ref(),
            tick,
            market_cap_usd,
            self.market.sentiment,
            rho,
            self.broker.cumulative_deployment_global(),
            self.cfg.full_scale_gt,
        );

        // CQE budget recalculation.
        let cqe_budget =
            self.cqe.budget_for_tick(capital_outcome.net_capital_flow_usd, self.countries.active_gdp_total());

        // CEA policy update: brake factor and price-floor revision.
        let circulating_supply = self.ledger.circulating_supply();
        let stability_ratio = if cqe_budget > 1e-6 {
            (circulating_supply * self.market.market_price_usd) / cqe_budget
        } else {
            STABILITY_RATIO_NO_BUDGET_CAP
        };
        let controller_ctx = ControllerContext {
            stability_ratio,
            realized_inflation,
            temperature_anomaly_c: self.carbon.temperature_anomaly_c,
            cqe_budget_utilization: self.last_cqe_utilization,
            tick,
            total_years: self.cfg.years,
            current_co2_ppm: self.carbon.co2_ppm(),
            initial_co2_ppm: self.cfg.initial_co2_ppm,
            target_co2_ppm: self.cfg.target_co2_ppm,
        };
        let brake_outcome = self.policy_controller.update(&mut self.controller, &controller_ctx);
        self.last_floor_revised = brake_outcome.floor_revised;
        self.warning_prev2 = self.warning_prev;
        self.warning_prev = brake_outcome.warning;

        // Project initiation: brake-dampened capital pace, gated by
        // market_price * brake_factor >= marginal cost per channel (§4.2).
        let es_ratio_prev = self.previous_es_ratio();
        let capital_budget_usd = (capital_outcome.net_capital_flow_usd * brake_outcome.brake_factor).max(0.0);
        let init_ctx = InitiationContext {
            tick,
            co2_ppm: self.carbon.co2_ppm(),
            realized_inflation,
            es_ratio: es_ratio_prev,
            price_floor_usd: self.controller.price_floor_usd,
            capital_budget_usd,
            market_price_usd: self.market.market_price_usd,
            brake_factor: brake_outcome.brake_factor,
            countries: &self.countries,
            cfg: &self.cfg,
        };
        // CDR buildout stop check runs before initiation so a tick that
        // crosses `cdr_buildout_stop_year` (or the CO2-peak condition)
        // blocks that same tick's CDR projects, not just the next one's.
        let co2_rising = self.carbon.co2_ppm() > co2_before;
        self.broker.maybe_stop_cdr_buildout(tick, &self.cfg, co2_rising);

        let init_summary = self.broker.initiate_tick(&init_ctx, &mut self.rng);

        // Project advancement.
        let climate_risk = climate_risk_multiplier(self.carbon.temperature_anomaly_c);
        let advance_summary =
            self.broker.advance_tick(climate_risk, self.carbon.co2_ppm(), realized_inflation, &mut self.rng);

        // Audit and mint/burn.
        let ledger_before = self.ledger;
        let audit_summary = Auditor::run_tick(
            &mut self.broker,
            &mut self.ledger,
            &mut self.countries,
            self.cfg.enable_audits,
            self.broker.net_zero_latched(),
            brake_outcome.brake_factor,
            &self.cfg,
            &mut self.rng,
        );

        // Reversals.
        let reversal_gtc = advance_summary.reversal_gtc + audit_summary.clawback_reversal_gtc;

        // CQE floor defense.
        let cqe_outcome = self.cqe.defend(
            cqe_budget,
            self.controller.price_floor_usd,
            self.market.market_price_usd,
            realized_inflation,
            self.cfg.inflation_target,
            self.ledger.circulating_supply(),
            self.countries.active_gdp_total(),
            self.cqe_defense.as_ref(),
        );
        InvestorMarket::apply_cqe_support(&mut self.market, cqe_outcome.price_support);
        self.countries.distribute_cqe_purchase_equivalent(cqe_outcome.spent_usd);

        // Carbon-cycle step, with verified sequestration and reversals.
        let cdr_removal_gtc = self.broker.credited_tonnes_this_tick(Some(Channel::Cdr)) / 1.0e9;
        let avdef_requested = self.broker.credited_tonnes_this_tick(Some(Channel::AvoidedDeforestation)) / 1.0e9;
        let avdef_applied = self.carbon.apply_avoided_deforestation(avdef_requested);
        let conv_requested = self.broker.credited_tonnes_this_tick(Some(Channel::Conventional)) / 1.0e9;
        let conv_applied = self.carbon.cap_conventional_mitigation(conv_requested);

        let carbon_before = self.carbon.clone();
        let delta = CarbonCycle::step(
            &mut self.carbon,
            bau,
            cdr_removal_gtc,
            conv_applied,
            avdef_applied,
            reversal_gtc,
            &mut self.flux_guard,
        );

        let total_sequestration_gtc = cdr_removal_gtc + conv_applied + avdef_applied;
        self.broker.check_net_zero_latch(delta.net_anthropogenic_flux_gtc, total_sequestration_gtc);

        // Record snapshot.
        let new_project_count: u32 = init_summary.new_projects_by_channel.values().sum();
        let cqe_budget_utilization = if cqe_budget > 1e-6 { cqe_outcome.spent_usd / cqe_budget } else { 0.0 };
        let snapshot = build_annual_snapshot(
            tick,
            &carbon_before,
            &delta,
            &self.bau_carbon,
            cdr_removal_gtc,
            conv_applied,
            avdef_applied,
            reversal_gtc,
            climate_risk,
            &self.broker,
            new_project_count,
            advance_summary.failed + advance_summary.retired + advance_summary.early_retired,
            &self.cfg,
            es_ratio_prev,
            &ledger_before,
            &self.ledger,
            &self.market,
            &self.controller,
            cqe_outcome.spent_usd,
            cqe_budget,
            self.cqe.cumulative_budget_usd,
            cqe_budget_utilization,
            cqe_outcome.xcr_purchased,
            audit_summary.cobenefit_minted_xcr,
            brake_outcome.brake_factor,
            realized_inflation,
            capital_outcome.net_capital_flow_usd,
            capital_outcome.capital_demand_premium_usd,
            capital_outcome.forward_guidance,
            &self.countries,
        );
        self.check_invariants(tick, &snapshot, rho)?;

        self.prev_cumulative_inflow_usd = self.capital.cumulative_inflow_usd;
        self.last_cqe_utilization = cqe_budget_utilization;
        self.last_forward_guidance = capital_outcome.forward_guidance;
        self.last_capital_demand_premium_usd = capital_outcome.capital_demand_premium_usd;

        log_annual_summary(&snapshot);
        self.snapshots.push(snapshot);

        self.tick += 1;
        Ok(())
    }

    /// End-of-tick bounds check (§7/§8): these must never fail for a
    /// correctly-implemented tick. Checked unconditionally, not just in
    /// debug builds, because a silently-corrupted run is worse than a
    /// slightly more expensive one.
    fn check_invariants(&self, tick: u32, snapshot: &AnnualSnapshot, rho: f64) -> SimResult<()> {
        let violation = |phase: &'static str, message: String| {
            SimError::InvariantViolation { year: tick, phase, message }
        };

        if snapshot.circulating_xcr_supply < -1e-6 {
            return Err(violation("ledger", format!("XCR supply went negative: {}", snapshot.circulating_xcr_supply)));
        }
        if !(0.0..=1.0).contains(&snapshot.sentiment) {
            return Err(violation("market", format!("sentiment out of [0, 1]: {}", snapshot.sentiment)));
        }
        if snapshot.brake_factor > 1.0 + 1e-9 {
            return Err(violation("controller", format!("brake factor above 1.0: {}", snapshot.brake_factor)));
        }
        let floor = heavy_brake_floor(rho);
        if snapshot.brake_factor < floor - 1e-9 {
            return Err(violation(
                "controller",
                format!("brake factor {} below heavy-brake floor {}", snapshot.brake_factor, floor),
            ));
        }
        if self.carbon.has_negative_stock() {
            return Err(violation("carbon", "a carbon-cycle reservoir went negative".into()));
        }
        if snapshot.cqe_spent_usd > snapshot.cqe_budget_usd + 1e-6 {
            return Err(violation(
                "cqe",
                format!("spent {} exceeds budget {}", snapshot.cqe_spent_usd, snapshot.cqe_budget_usd),
            ));
        }
        if self.capital.cumulative_inflow_usd + 1e-6 < self.prev_cumulative_inflow_usd {
            return Err(violation("capital", "cumulative capital inflow decreased".into()));
        }
        Ok(())
    }

    pub fn flux_guard_diagnostics(&self) -> &[crate::utils::flux_guard::Diagnostic] {
        self.flux_guard.diagnostics()
    }

    pub fn countries(&self) -> &CountryPool {
        &self.countries
    }
}
