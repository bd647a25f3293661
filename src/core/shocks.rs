//! Deterministic exogenous shock injection (spec §4.9).
//!
//! Shocks are scheduled ahead of the run (not sampled at runtime) so a
//! shock scenario stays reproducible independent of RNG draws elsewhere in
//! the tick. The only shock kind implemented is an inflation shock: an
//! additive bump to that tick's realized inflation, used by the stress-test
//! scenario that checks CEA brake response to a sudden inflation spike.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InflationShock {
    pub tick: u32,
    pub delta: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShockSchedule {
    inflation_shocks: Vec<InflationShock>,
}

impl ShockSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inflation_shock(mut self, tick: u32, delta: f64) -> Self {
        self.inflation_shocks.push(InflationShock { tick, delta });
        self
    }

    /// Total inflation delta scheduled for `tick` (zero if none).
    pub fn inflation_delta_for_tick(&self, tick: u32) -> f64 {
        self.inflation_shocks.iter().filter(|s| s.tick == tick).map(|s| s.delta).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shock_applies_only_on_its_scheduled_tick() {
        let schedule = ShockSchedule::new().with_inflation_shock(10, 0.01);
        assert_eq!(schedule.inflation_delta_for_tick(9), 0.0);
        assert!((schedule.inflation_delta_for_tick(10) - 0.01).abs() < 1e-12);
        assert_eq!(schedule.inflation_delta_for_tick(11), 0.0);
    }
}
