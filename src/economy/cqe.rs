//! Central Bank Alliance / Carbon Quantitative Easing (spec §4.4).
//!
//! The alliance defends the price floor by buying XCR whenever the market
//! price falls below it, sized by a willingness function of realized
//! inflation against target and capped by an annual budget that is itself
//! capped by available capital inflow and aggregate GDP. CQE purchases are
//! central-bank holdings, not burns: they reduce float without reducing
//! `total_minted`. Intervention also leaves a bounded, mean-reverting mark
//! on realized inflation (§4.4 "inflation impact"). `CqeDefense` is the
//! swappable decision point (§9 "capability interfaces"); `RuleBasedCqe` is
//! the default, deterministic implementation.

use serde::{Deserialize, Serialize};

use crate::config::constants::{
    CQE_BUDGET_CAPITAL_FRACTION, CQE_BUDGET_GDP_FRACTION, CQE_INFLATION_REVERSION_MAX,
    CQE_INFLATION_REVERSION_MIN, CQE_INFLATION_TARGET_MULTIPLIER, CQE_INTERVENTION_SIZING,
    CQE_MAX_INFLATION_IMPACT_PP, CQE_WILLINGNESS_K,
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CqeOutcome {
    pub spent_usd: f64,
    pub price_support: f64,
    pub willingness: f64,
    /// XCR bought this tick at `market_price_usd`: a ledger debit against
    /// float, held by the alliance, not burned (§4.4).
    pub xcr_purchased: f64,
}

pub trait CqeDefense {
    /// Given the available budget, the floor/price gap, realized inflation
    /// against target, and outstanding XCR supply, decide how much to spend,
    /// how many tokens that buys, and how much upward price support it
    /// produces.
    #[allow(clippy::too_many_arguments)]
    fn defend(
        &self,
        budget_usd: f64,
        price_floor_usd: f64,
        market_price_usd: f64,
        realized_inflation: f64,
        inflation_target: f64,
        circulating_supply: f64,
    ) -> CqeOutcome;
}

pub struct RuleBasedCqe;

impl CqeDefense for RuleBasedCqe {
    fn defend(
        &self,
        budget_usd: f64,
        price_floor_usd: f64,
        market_price_usd: f64,
        realized_inflation: f64,
        inflation_target: f64,
        circulating_supply: f64,
    ) -> CqeOutcome {
        if market_price_usd >= price_floor_usd || budget_usd <= 0.0 {
            return CqeOutcome::default();
        }
        // W = 1 / (1 + exp(k * (pi - CQE_INFLATION_TARGET_MULTIPLIER * pi_target)));
        // undefined target means no defensible anchor, so willingness
        // collapses to zero.
        let willingness = if inflation_target <= 0.0 {
            0.0
        } else {
            1.0 / (1.0
                + (CQE_WILLINGNESS_K * (realized_inflation - CQE_INFLATION_TARGET_MULTIPLIER * inflation_target))
                    .exp())
        };

        let gap_usd = price_floor_usd - market_price_usd;
        let raw_spend = willingness * gap_usd * CQE_INTERVENTION_SIZING * circulating_supply.max(0.0);
        let spent_usd = raw_spend.clamp(0.0, budget_usd.max(0.0));
        let price_support = if budget_usd > 0.0 { (spent_usd / budget_usd) * gap_usd } else { 0.0 };
        let xcr_purchased = if market_price_usd > 1e-9 { spent_usd / market_price_usd } else { 0.0 };

        CqeOutcome { spent_usd, price_support, willingness, xcr_purchased }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CentralBankAlliance {
    pub cumulative_spent_usd: f64,
    pub cumulative_budget_usd: f64,
    /// Bounded, mean-reverting mark CQE intervention leaves on realized
    /// inflation (§4.4): grows with this tick's spend/GDP, decays toward
    /// zero at 25-40%/year regardless of further intervention. Read by the
    /// *next* tick's inflation-correction phase (§2).
    pub inflation_impact_pp: f64,
}

impl CentralBankAlliance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annual budget: the lesser of a fraction of this tick's net capital
    /// inflow and a fraction of aggregate active-country GDP (§4.4).
    pub fn budget_for_tick(&mut self, net_capital_inflow_usd: f64, active_gdp_trillions: f64) -> f64 {
        let capital_cap = net_capital_inflow_usd.max(0.0) * CQE_BUDGET_CAPITAL_FRACTION;
        let gdp_cap = active_gdp_trillions.max(0.0) * 1.0e12 * CQE_BUDGET_GDP_FRACTION;
        let budget = capital_cap.min(gdp_cap);
        self.cumulative_budget_usd += budget;
        budget
    }

    #[allow(clippy::too_many_arguments)]
    pub fn defend(
        &mut self,
        budget_usd: f64,
        price_floor_usd: f64,
        market_price_usd: f64,
        realized_inflation: f64,
        inflation_target: f64,
        circulating_supply: f64,
        active_gdp_trillions: f64,
        defense: &dyn CqeDefense,
    ) -> CqeOutcome {
        let outcome = defense.defend(
            budget_usd,
            price_floor_usd,
            market_price_usd,
            realized_inflation,
            inflation_target,
            circulating_supply,
        );
        self.cumulative_spent_usd += outcome.spent_usd;

        let active_gdp_usd = (active_gdp_trillions.max(0.0) * 1.0e12).max(1.0);
        let new_contribution = (outcome.spent_usd / active_gdp_usd).min(CQE_MAX_INFLATION_IMPACT_PP);
        let reversion_rate = (CQE_INFLATION_REVERSION_MIN + CQE_INFLATION_REVERSION_MAX) / 2.0;
        self.inflation_impact_pp = self.inflation_impact_pp * (1.0 - reversion_rate) + new_contribution;

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_defense_needed_above_floor() {
        let alliance = RuleBasedCqe;
        let outcome = alliance.defend(1.0e9, 100.0, 105.0, 0.02, 0.02, 1.0e9);
        assert_eq!(outcome.spent_usd, 0.0);
    }

    #[test]
    fn defense_spends_more_as_gap_widens() {
        let alliance = RuleBasedCqe;
        let small_gap = alliance.defend(1.0e9, 100.0, 95.0, 0.02, 0.02, 1.0e9);
        let large_gap = alliance.defend(1.0e9, 100.0, 60.0, 0.02, 0.02, 1.0e9);
        assert!(large_gap.spent_usd >= small_gap.spent_usd);
    }

    #[test]
    fn defense_damps_as_inflation_rises_above_target() {
        let alliance = RuleBasedCqe;
        let calm = alliance.defend(1.0e9, 100.0, 60.0, 0.02, 0.02, 1.0e9);
        let hot = alliance.defend(1.0e9, 100.0, 60.0, 0.08, 0.02, 1.0e9);
        assert!(hot.willingness < calm.willingness);
        assert!(hot.spent_usd <= calm.spent_usd);
    }

    #[test]
    fn zero_inflation_target_disables_defense() {
        let alliance = RuleBasedCqe;
        let outcome = alliance.defend(1.0e9, 100.0, 60.0, 0.02, 0.0, 1.0e9);
        assert_eq!(outcome.spent_usd, 0.0);
        assert_eq!(outcome.willingness, 0.0);
    }

    #[test]
    fn budget_respects_both_caps() {
        let mut alliance = CentralBankAlliance::new();
        let budget = alliance.budget_for_tick(1.0e11, 0.5);
        let gdp_cap = 0.5 * 1.0e12 * CQE_BUDGET_GDP_FRACTION;
        assert!(budget <= gdp_cap + 1e-6);
    }

    #[test]
    fn inflation_impact_decays_without_further_intervention() {
        let mut alliance = CentralBankAlliance::new();
        let defense = RuleBasedCqe;
        alliance.defend(1.0e9, 100.0, 60.0, 0.02, 0.02, 1.0e9, 1.0, &defense);
        let after_intervention = alliance.inflation_impact_pp;
        assert!(after_intervention > 0.0);
        alliance.defend(0.0, 100.0, 105.0, 0.02, 0.02, 1.0e9, 1.0, &defense);
        assert!(alliance.inflation_impact_pp < after_intervention);
    }
}
