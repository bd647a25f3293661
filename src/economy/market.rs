//! Investor sentiment and XCR price discovery (spec §4.5).
//!
//! Sentiment is a bounded [0.1, 1.0] state variable that decays on CEA
//! warnings and inflation overshoot and recovers slowly toward 1.0 absent
//! them. Market price is the floor plus a sentiment-driven premium or
//! discount plus the capital market's demand premium; CQE intervention (see
//! `economy::cqe`) then pushes price back up when it falls below the floor.
//! `SentimentModel` is the swappable decision point for this update rule.

use serde::{Deserialize, Serialize};

use crate::config::constants::{
    PRICE_SENTIMENT_COEFFICIENT, SENTIMENT_CO2_PROGRESS_BONUS, SENTIMENT_FLOOR_REVISION_BONUS,
    SENTIMENT_GUIDANCE_BONUS_MAX, SENTIMENT_INFLATION_DECAY_1_5X, SENTIMENT_INFLATION_DECAY_2X,
    SENTIMENT_INFLATION_DECAY_3X, SENTIMENT_MAX, SENTIMENT_MIN, SENTIMENT_NEW_WARNING_DECAY,
    SENTIMENT_PERSISTENT_WARNING_DECAY, SENTIMENT_RECOVERY_BAND_FRACTION, SENTIMENT_RECOVERY_RATE,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketState {
    pub sentiment: f64,
    pub market_price_usd: f64,
}

impl MarketState {
    pub fn new(initial_price_floor_usd: f64) -> Self {
        Self { sentiment: 1.0, market_price_usd: initial_price_floor_usd }
    }
}

/// Per-tick sentiment inputs beyond the running `sentiment` value itself.
pub struct SentimentContext {
    pub co2_declining: bool,
    pub realized_inflation: f64,
    pub inflation_target: f64,
    pub floor_revised_up: bool,
    pub forward_guidance: f64,
    /// `None`: no CEA warning active. `Some(true)`: warning just tripped
    /// this tick (new). `Some(false)`: warning has persisted from a prior
    /// tick (§4.5 "new" vs "persistent" decay).
    pub warning: Option<bool>,
}

pub trait SentimentModel {
    fn update(&self, sentiment: f64, ctx: &SentimentContext) -> f64;
}

pub struct RuleBasedSentiment;

impl SentimentModel for RuleBasedSentiment {
    fn update(&self, sentiment: f64, ctx: &SentimentContext) -> f64 {
        let warning_decay = match ctx.warning {
            Some(true) => SENTIMENT_NEW_WARNING_DECAY,
            Some(false) => SENTIMENT_PERSISTENT_WARNING_DECAY,
            None => 1.0,
        };

        let inflation_ratio = if ctx.inflation_target > 0.0 {
            ctx.realized_inflation.max(0.0) / ctx.inflation_target
        } else {
            0.0
        };
        let inflation_decay = if inflation_ratio >= 3.0 {
            SENTIMENT_INFLATION_DECAY_3X
        } else if inflation_ratio >= 2.0 {
            SENTIMENT_INFLATION_DECAY_2X
        } else if inflation_ratio >= 1.5 {
            SENTIMENT_INFLATION_DECAY_1_5X
        } else {
            1.0
        };

        let mut next = sentiment * warning_decay * inflation_decay;

        let near_target = (ctx.realized_inflation - ctx.inflation_target).abs()
            <= SENTIMENT_RECOVERY_BAND_FRACTION * ctx.inflation_target;
        if ctx.warning.is_none() && near_target {
            next += SENTIMENT_RECOVERY_RATE * (SENTIMENT_MAX - next);
        }

        if ctx.co2_declining {
            next += SENTIMENT_CO2_PROGRESS_BONUS;
        }
        if ctx.floor_revised_up {
            next += SENTIMENT_FLOOR_REVISION_BONUS;
        }
        next += ctx.forward_guidance.clamp(0.0, 1.0) * SENTIMENT_GUIDANCE_BONUS_MAX;

        next.clamp(SENTIMENT_MIN, SENTIMENT_MAX)
    }
}

pub struct InvestorMarket;

impl InvestorMarket {
    /// Advance sentiment by one tick and re-derive market price from the
    /// (possibly CQE-supported) floor plus the capital market's demand
    /// premium (§4.5 "market_price = price_floor + 50*sentiment + demand
    /// premium"; centered on 0.5 so sentiment can push price below floor,
    /// which is what makes CQE defense meaningful -- see DESIGN.md).
    pub fn step(
        state: &mut MarketState,
        model: &dyn SentimentModel,
        price_floor_usd: f64,
        capital_demand_premium_usd: f64,
        ctx: &SentimentContext,
    ) {
        state.sentiment = model.update(state.sentiment, ctx);
        let premium = (state.sentiment - 0.5) * PRICE_SENTIMENT_COEFFICIENT;
        state.market_price_usd = (price_floor_usd + premium + capital_demand_premium_usd.max(0.0)).max(0.0);
    }

    /// Apply CQE price support on top of the sentiment-derived price,
    /// never letting support push price below where it already was.
    pub fn apply_cqe_support(state: &mut MarketState, price_support_usd: f64) {
        state.market_price_usd += price_support_usd.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(co2_declining: bool, realized_inflation: f64, warning: Option<bool>) -> SentimentContext {
        SentimentContext {
            co2_declining,
            realized_inflation,
            inflation_target: 0.02,
            floor_revised_up: false,
            forward_guidance: 0.0,
            warning,
        }
    }

    #[test]
    fn sentiment_stays_in_bounds_over_many_ticks() {
        let mut state = MarketState::new(100.0);
        let model = RuleBasedSentiment;
        for i in 0..300 {
            let inflation = if i % 10 == 0 { 0.06 } else { 0.02 };
            let c = ctx(i % 3 == 0, inflation, None);
            InvestorMarket::step(&mut state, &model, 100.0, 0.0, &c);
            assert!(state.sentiment >= 0.1 && state.sentiment <= 1.0);
        }
    }

    #[test]
    fn high_inflation_decays_sentiment() {
        let model = RuleBasedSentiment;
        let after_calm = model.update(1.0, &ctx(false, 0.02, None));
        let after_shock = model.update(1.0, &ctx(false, 0.06, None));
        assert!(after_shock < after_calm);
    }

    #[test]
    fn new_warning_decays_less_than_persistent_warning() {
        let model = RuleBasedSentiment;
        let new_warning = model.update(1.0, &ctx(false, 0.02, Some(true)));
        let persistent_warning = model.update(1.0, &ctx(false, 0.02, Some(false)));
        assert!(persistent_warning < new_warning);
    }

    #[test]
    fn forward_guidance_lifts_sentiment() {
        let model = RuleBasedSentiment;
        let mut with_guidance = ctx(false, 0.02, None);
        with_guidance.forward_guidance = 1.0;
        let without = model.update(0.5, &ctx(false, 0.02, None));
        let with = model.update(0.5, &with_guidance);
        assert!(with > without);
    }
}
