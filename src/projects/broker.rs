//! Project initiation, advancement and retirement (spec §4.2).
//!
//! The broker owns the project book and the per-channel cumulative
//! deployment counters that drive the learning, depletion, scarcity and
//! net-zero-proximity multipliers. Initiation always walks channels in
//! `Channel::INITIATION_ORDER` so capital-budget exhaustion within a tick
//! consistently favors avoided-deforestation, then conventional, then CDR.

use std::collections::HashMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::const_funcs::*;
use crate::config::constants::*;
use crate::config::scenario::ScenarioConfig;
use crate::projects::channel::Channel;
use crate::projects::project::{AdvanceOutcome, Project, ProjectStatus};
use crate::world::country::CountryTier;
use crate::world::pool::{weighted_select_with, CountryPool};

/// Per-tick inputs the broker needs from the rest of the engine to size and
/// price new projects. Everything here is read-only from the broker's point
/// of view; capital is spent out of `capital_budget_usd` as projects are
/// initiated and the amount actually spent is reported back.
pub struct InitiationContext<'a> {
    pub tick: u32,
    pub co2_ppm: f64,
    pub realized_inflation: f64,
    pub es_ratio: f64,
    pub price_floor_usd: f64,
    pub capital_budget_usd: f64,
    /// Current XCR market price, read by the initiation gate (§4.2
    /// "market_price * brake_factor >= C_ch(t)"): a project only breaks
    /// ground when the market pays enough, brake-dampened, to cover its
    /// marginal cost.
    pub market_price_usd: f64,
    pub brake_factor: f64,
    pub countries: &'a CountryPool,
    pub cfg: &'a ScenarioConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiationSummary {
    pub new_project_ids: Vec<u32>,
    pub capital_spent_usd: f64,
    pub new_projects_by_channel: HashMap<Channel, u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvanceSummary {
    pub became_operational: u32,
    pub failed: u32,
    pub retired: u32,
    pub early_retired: u32,
    pub reversal_gtc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsBroker {
    projects: Vec<Project>,
    next_id: u32,
    cumulative_deployment_gtc: HashMap<Channel, f64>,
    net_zero_latched: bool,
    cdr_buildout_stopped: bool,
}

impl Default for ProjectsBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectsBroker {
    pub fn new() -> Self {
        let mut cumulative_deployment_gtc = HashMap::new();
        for channel in Channel::ALL {
            cumulative_deployment_gtc.insert(channel, 0.0);
        }
        Self {
            projects: Vec::new(),
            next_id: 0,
            cumulative_deployment_gtc,
            net_zero_latched: false,
            cdr_buildout_stopped: false,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn net_zero_latched(&self) -> bool {
        self.net_zero_latched
    }

    pub fn cdr_buildout_stopped(&self) -> bool {
        self.cdr_buildout_stopped
    }

    pub fn cumulative_deployment(&self, channel: Channel) -> f64 {
        *self.cumulative_deployment_gtc.get(&channel).unwrap_or(&0.0)
    }

    pub fn cumulative_deployment_global(&self) -> f64 {
        self.cumulative_deployment_gtc.values().sum()
    }

    fn project_count(&self, channel: Channel) -> usize {
        self.projects.iter().filter(|p| p.channel == channel).count()
    }

    pub fn operational_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.is_operational())
    }

    pub fn operational_projects_mut(&mut self) -> impl Iterator<Item = &mut Project> {
        self.projects.iter_mut().filter(|p| p.is_operational())
    }

    /// Total tonnes credited this tick, optionally restricted to one channel.
    /// CONVENTIONAL credits nothing once the net-zero latch has engaged
    /// (§4.2 "permanent hysteresis").
    pub fn credited_tonnes_this_tick(&self, channel: Option<Channel>) -> f64 {
        self.projects
            .iter()
            .filter(|p| channel.is_none_or_eq(p.channel))
            .filter(|p| !(p.channel == Channel::Conventional && self.net_zero_latched))
            .map(|p| p.credited_tonnes_this_tick())
            .sum()
    }

    /// Latch CONVENTIONAL crediting off permanently once the emissions-to-
    /// sequestration ratio reaches parity (§4.2). Once latched, this never
    /// un-latches even if the ratio later rises again.
    pub fn check_net_zero_latch(&mut self, emissions_gtc: f64, sequestration_gtc: f64) -> bool {
        if !self.net_zero_latched && sequestration_gtc > 0.0 && emissions_gtc / sequestration_gtc <= 1.0 {
            self.net_zero_latched = true;
        }
        self.net_zero_latched
    }

    /// Evaluate the CDR buildout stop condition (scenario-configured year,
    /// or "stop once CO2 has peaked" if requested). Once stopped this is
    /// permanent for the rest of the run.
    pub fn maybe_stop_cdr_buildout(&mut self, tick: u32, cfg: &ScenarioConfig, co2_rising: bool) {
        if self.cdr_buildout_stopped {
            return;
        }
        if let Some(stop_year) = cfg.cdr_buildout_stop_year {
            if tick >= stop_year {
                self.cdr_buildout_stopped = true;
                return;
            }
        }
        if cfg.cdr_buildout_stop_on_co2_peak && !co2_rising {
            self.cdr_buildout_stopped = true;
        }
    }

    /// Marginal cost per tonne for the next project in `channel`, given the
    /// broker's current cumulative-deployment state. Public so `Auditor` can
    /// reuse the same pricing when assembling the per-channel conventional
    /// cost penalty it reports (spec §4.3).
    pub fn marginal_cost_per_tonne(&self, channel: Channel, cfg: &ScenarioConfig, es_ratio: f64) -> f64 {
        let deployment = self.cumulative_deployment(channel);
        let learning_mult = match channel.learning_rate(cfg.cdr_learning_rate, cfg.conventional_learning_rate) {
            Some(rate) if channel == Channel::Cdr => {
                learning_multiplier(deployment, rate) * cdr_learning_taper(deployment)
            }
            Some(rate) => learning_multiplier(deployment, rate),
            None => 1.0,
        };
        let depletion_mult = depletion_multiplier(self.project_count(channel));
        let scarcity_mult = match channel {
            Channel::Conventional => conventional_scarcity_multiplier(deployment),
            Channel::Cdr => {
                cdr_scarcity_multiplier(deployment, cfg.cdr_material_budget_gtc, cfg.cdr_material_cost_multiplier)
            }
            Channel::AvoidedDeforestation => 1.0,
        };
        let net_zero_mult =
            if channel == Channel::Conventional { net_zero_proximity_penalty(es_ratio) } else { 1.0 };
        channel.base_cost_usd_per_tonne() * learning_mult * depletion_mult * scarcity_mult * net_zero_mult
    }

    /// Remaining capacity fraction in `channel` given material/physical
    /// scarcity (separate from the learning/depletion cost multipliers).
    /// Public so `Auditor` can apply the same capacity discount to minting
    /// that the broker applies to new-project sizing (spec §4.3).
    pub fn capacity_fraction(&self, channel: Channel, cfg: &ScenarioConfig) -> f64 {
        let deployment = self.cumulative_deployment(channel);
        match channel {
            Channel::Conventional => conventional_scarcity_capacity_fraction(deployment),
            Channel::Cdr => {
                cdr_scarcity_capacity_fraction(deployment, cfg.cdr_material_budget_gtc, cfg.cdr_material_capacity_floor)
            }
            Channel::AvoidedDeforestation => 1.0,
        }
    }

    /// `1 - capacity_fraction`: how much of `channel`'s material/physical
    /// headroom has already been consumed, reported in the annual snapshot.
    pub fn capacity_utilization(&self, channel: Channel, cfg: &ScenarioConfig) -> f64 {
        1.0 - self.capacity_fraction(channel, cfg)
    }

    pub fn development_project_count(&self) -> u32 {
        self.projects.iter().filter(|p| p.status == ProjectStatus::Development).count() as u32
    }

    pub fn total_project_count(&self) -> u32 {
        self.projects.len() as u32
    }

    /// Mean effective R-value across operational projects in `channel`, or
    /// `1.0` (the CDR reference value) if none are operational yet.
    pub fn average_effective_r_value(&self, channel: Channel) -> f64 {
        let (sum, count) = self
            .operational_projects()
            .filter(|p| p.channel == channel)
            .fold((0.0, 0u32), |(sum, count), p| (sum + p.effective_r_value, count + 1));
        if count == 0 { 1.0 } else { sum / count as f64 }
    }

    /// Initiate new projects for this tick across all channels, in
    /// `Channel::INITIATION_ORDER`, spending out of `ctx.capital_budget_usd`.
    pub fn initiate_tick(&mut self, ctx: &InitiationContext, rng: &mut ChaCha8Rng) -> InitiationSummary {
        let mut summary = InitiationSummary::default();
        let mut capital_remaining = ctx.capital_budget_usd.max(0.0);
        let rho = inflation_ratio(ctx.realized_inflation);
        let urgency = urgency_multiplier(ctx.co2_ppm, rho);
        let count_damp = count_damper(self.cumulative_deployment_global());

        for channel in Channel::INITIATION_ORDER {
            if channel == Channel::Cdr
                && (self.cdr_buildout_stopped || ctx.cfg.cdr_buildout_stop_year.is_some_and(|y| ctx.tick >= y))
            {
                continue;
            }
            if channel == Channel::Conventional && self.net_zero_latched {
                continue;
            }
            if capital_remaining <= 0.0 {
                continue;
            }

            let max_capacity = channel.max_capacity_gt_per_year(ctx.cfg.cdr_max_capacity_gt_per_year)
                * self.capacity_fraction(channel, ctx.cfg);
            let mut planned_rate_gt = 0.0;
            let continue_prob = (urgency * count_damp).clamp(0.0, 1.0);

            for _ in 0..MAX_NEW_PROJECTS_PER_CHANNEL_PER_TICK {
                if capital_remaining <= 0.0 {
                    break;
                }
                if continue_prob < 1.0 && !rng.gen_bool(continue_prob) {
                    break;
                }

                let capacity_taper = capacity_taper_fraction(planned_rate_gt, max_capacity.max(1e-9));
                if capacity_taper <= 0.01 {
                    break;
                }

                let scale = scale_damper(
                    self.cumulative_deployment_global(),
                    ctx.cfg.full_scale_gt,
                    ctx.cfg.scale_damper_slope,
                );
                let size_span = PROJECT_SEQUESTRATION_MAX_MT - PROJECT_SEQUESTRATION_MIN_MT;
                let base_size_mt = PROJECT_SEQUESTRATION_MIN_MT
                    + rng.gen_range(0.0..=1.0) * size_span * scale * capacity_taper;
                let annual_tonnes = base_size_mt * 1.0e6;
                let annual_gt = annual_tonnes / 1.0e9;

                let cost_per_tonne = self.marginal_cost_per_tonne(channel, ctx.cfg, ctx.es_ratio);
                let capital_cost = cost_per_tonne * annual_tonnes * CAPEX_YEARS_MULTIPLIER;
                if capital_cost > capital_remaining || capital_cost <= 0.0 {
                    break;
                }
                // Initiation gate (§4.2): the market only pays for a project
                // once its brake-dampened price clears that project's
                // marginal cost.
                if ctx.market_price_usd * ctx.brake_factor < cost_per_tonne {
                    break;
                }

                let candidates: Vec<&crate::world::country::Country> = ctx
                    .countries
                    .active_countries()
                    .collect();
                let host = match weighted_select_with(&candidates, rng, |c| {
                    channel.region_preference_multiplier(c.region.is_tropical(), c.tier == CountryTier::Tier1)
                }) {
                    Some(country) => country.id,
                    None => break,
                };

                let development_years =
                    rng.gen_range(PROJECT_DEVELOPMENT_YEARS_MIN..=PROJECT_DEVELOPMENT_YEARS_MAX);
                // R-value: CDR is the reference channel and is fixed at 1.0;
                // other channels are priced relative to CDR's current
                // marginal cost so a cheaper channel earns fewer XCR per
                // tonne than CDR does for the same climate benefit.
                let base_r_value = if channel == Channel::Cdr {
                    1.0
                } else {
                    let marginal_cdr_cost = self.marginal_cost_per_tonne(Channel::Cdr, ctx.cfg, ctx.es_ratio);
                    (cost_per_tonne / marginal_cdr_cost).clamp(0.1, 10.0)
                };

                let project = Project::new(
                    self.next_id,
                    channel,
                    host,
                    ctx.tick,
                    development_years,
                    annual_tonnes,
                    cost_per_tonne,
                    base_r_value,
                );
                summary.new_project_ids.push(project.id);
                *summary.new_projects_by_channel.entry(channel).or_insert(0) += 1;
                self.next_id += 1;
                self.projects.push(project);

                capital_remaining -= capital_cost;
                summary.capital_spent_usd += capital_cost;
                planned_rate_gt += annual_gt;
                *self.cumulative_deployment_gtc.entry(channel).or_insert(0.0) += annual_gt;
            }
        }

        summary
    }

    /// Advance every non-terminal project by one year: DEVELOPMENT ->
    /// OPERATIONAL transitions, stochastic failure, age-based retirement,
    /// and (CDR only, once the atmosphere has overshot below 350ppm)
    /// early retirement intensification.
    pub fn advance_tick(&mut self, climate_risk_multiplier: f64, co2_ppm: f64, realized_inflation: f64, rng: &mut ChaCha8Rng) -> AdvanceSummary {
        let rho = inflation_ratio(realized_inflation);
        let overshoot_prob = overshoot_retirement_probability(co2_ppm, rho);
        let mut summary = AdvanceSummary::default();

        for project in self.projects.iter_mut() {
            if project.status == ProjectStatus::Failed {
                continue;
            }

            let fail_draw: f64 = rng.gen_range(0.0..1.0);
            match project.advance(climate_risk_multiplier, fail_draw) {
                AdvanceOutcome::None => {}
                AdvanceOutcome::BecameOperational => summary.became_operational += 1,
                AdvanceOutcome::Failed { reversal_tonnes } => {
                    summary.failed += 1;
                    summary.reversal_gtc += reversal_tonnes / 1.0e9;
                }
                AdvanceOutcome::Retired => summary.retired += 1,
            }

            if project.channel == Channel::Cdr && project.is_operational() && overshoot_prob > 0.0 {
                let draw: f64 = rng.gen_range(0.0..1.0);
                if draw < overshoot_prob {
                    let reversal = project.force_retire();
                    summary.early_retired += 1;
                    summary.reversal_gtc += reversal / 1.0e9;
                }
            }
        }

        summary
    }

    /// Mark a project's mint clawed back (Auditor-triggered): half its
    /// lifetime mint is burned by the caller, and the project is retired
    /// with its usual reversal fraction.
    pub fn clawback_project(&mut self, project_id: u32) -> Option<f64> {
        self.projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .map(|p| p.clawback() / 1.0e9)
    }
}

trait ChannelFilterExt {
    fn is_none_or_eq(&self, other: Channel) -> bool;
}

impl ChannelFilterExt for Option<Channel> {
    fn is_none_or_eq(&self, other: Channel) -> bool {
        match self {
            None => true,
            Some(c) => *c == other,
        }
    }
}

const MAX_NEW_PROJECTS_PER_CHANNEL_PER_TICK: u32 = 12;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sample_ctx(cfg: &ScenarioConfig, countries: &CountryPool) -> InitiationContext {
        InitiationContext {
            tick: 0,
            co2_ppm: 420.0,
            realized_inflation: 0.02,
            es_ratio: 6.0,
            price_floor_usd: 100.0,
            capital_budget_usd: 5.0e9,
            market_price_usd: 100_000.0,
            brake_factor: 1.0,
            countries,
            cfg,
        }
    }

    #[test]
    fn initiation_respects_order_and_spends_within_budget() {
        let cfg = ScenarioConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let countries = CountryPool::new(&mut rng);
        let mut broker = ProjectsBroker::new();
        let ctx = sample_ctx(&cfg, &countries);
        let summary = broker.initiate_tick(&ctx, &mut rng);
        assert!(summary.capital_spent_usd <= ctx.capital_budget_usd + 1e-6);
        assert!(!broker.projects().is_empty());
    }

    #[test]
    fn zero_capital_budget_initiates_nothing() {
        let cfg = ScenarioConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let countries = CountryPool::new(&mut rng);
        let mut broker = ProjectsBroker::new();
        let mut ctx = sample_ctx(&cfg, &countries);
        ctx.capital_budget_usd = 0.0;
        let summary = broker.initiate_tick(&ctx, &mut rng);
        assert!(broker.projects().is_empty());
        assert_eq!(summary.capital_spent_usd, 0.0);
    }

    #[test]
    fn net_zero_latch_is_permanent() {
        let mut broker = ProjectsBroker::new();
        assert!(!broker.check_net_zero_latch(5.0, 5.0));
        assert!(broker.check_net_zero_latch(4.0, 5.0));
        // Even if the ratio later rises again, the latch stays engaged.
        assert!(broker.check_net_zero_latch(10.0, 1.0));
    }

    #[test]
    fn cdr_buildout_stop_year_zero_blocks_tick_zero_initiation_structurally() {
        // `cdr_buildout_stop_year = 0` must block CDR at tick 0 regardless
        // of whether the flag has already been latched or tick-0 economics
        // happen to clear the initiation gate.
        let mut cfg = ScenarioConfig::default();
        cfg.cdr_buildout_stop_year = Some(0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let countries = CountryPool::new(&mut rng);
        let mut broker = ProjectsBroker::new();
        let ctx = sample_ctx(&cfg, &countries);
        assert!(!broker.cdr_buildout_stopped(), "flag is not yet latched at the start of tick 0");
        broker.initiate_tick(&ctx, &mut rng);
        assert!(broker.projects().iter().all(|p| p.channel != Channel::Cdr));
    }

    #[test]
    fn cdr_buildout_stop_year_is_permanent_once_reached() {
        let mut cfg = ScenarioConfig::default();
        cfg.cdr_buildout_stop_year = Some(3);
        let mut broker = ProjectsBroker::new();
        broker.maybe_stop_cdr_buildout(2, &cfg, true);
        assert!(!broker.cdr_buildout_stopped());
        broker.maybe_stop_cdr_buildout(3, &cfg, true);
        assert!(broker.cdr_buildout_stopped());
        broker.maybe_stop_cdr_buildout(4, &cfg, true);
        assert!(broker.cdr_buildout_stopped());
    }

    #[test]
    fn advance_tick_moves_development_projects_toward_operational() {
        let cfg = ScenarioConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let countries = CountryPool::new(&mut rng);
        let mut broker = ProjectsBroker::new();
        let ctx = sample_ctx(&cfg, &countries);
        broker.initiate_tick(&ctx, &mut rng);
        for _ in 0..5 {
            broker.advance_tick(1.0, 420.0, 0.02, &mut rng);
        }
        assert!(broker.operational_projects().count() > 0 || broker.projects().iter().all(|p| p.status == ProjectStatus::Failed));
    }
}
