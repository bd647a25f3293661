use serde::{Deserialize, Serialize};

use crate::projects::channel::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Development,
    Operational,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    // Immutable at creation.
    pub id: u32,
    pub channel: Channel,
    pub host_country_id: u32,
    pub start_year: u32,
    pub development_years: u32,
    pub annual_sequestration_tonnes: f64,
    pub marginal_cost_per_tonne: f64,
    pub base_r_value: f64,
    pub effective_r_value: f64,
    pub max_operational_years: u32,

    // Mutable.
    pub status: ProjectStatus,
    pub health: f64,
    pub age_years: u32,
    pub years_operational: u32,
    pub total_xcr_minted: f64,
}

pub enum AdvanceOutcome {
    None,
    BecameOperational,
    Failed { reversal_tonnes: f64 },
    Retired,
}

impl Project {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        channel: Channel,
        host_country_id: u32,
        start_year: u32,
        development_years: u32,
        annual_sequestration_tonnes: f64,
        marginal_cost_per_tonne: f64,
        base_r_value: f64,
    ) -> Self {
        Self {
            id,
            channel,
            host_country_id,
            start_year,
            development_years,
            annual_sequestration_tonnes,
            marginal_cost_per_tonne,
            base_r_value,
            effective_r_value: base_r_value,
            max_operational_years: channel.max_operational_years(),
            status: ProjectStatus::Development,
            health: 1.0,
            age_years: 0,
            years_operational: 0,
            total_xcr_minted: 0.0,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.status == ProjectStatus::Operational
    }

    /// Tonnes delivered so far over the project's operational lifetime.
    pub fn lifetime_delivered_tonnes(&self) -> f64 {
        self.annual_sequestration_tonnes * self.years_operational as f64
    }

    fn lifetime_reversal_tonnes(&self) -> f64 {
        self.lifetime_delivered_tonnes() * self.channel.reversal_fraction()
    }

    /// Age the project by one year, handling the DEVELOPMENT -> OPERATIONAL
    /// transition, stochastic failure, and age-based retirement (§4.2).
    /// `fail_draw` and `health_decay` are supplied by the caller so the
    /// run's single seeded RNG stays the only source of randomness.
    pub fn advance(&mut self, climate_risk_multiplier: f64, fail_draw: f64) -> AdvanceOutcome {
        self.age_years += 1;

        match self.status {
            ProjectStatus::Development => {
                if self.age_years >= self.development_years {
                    self.status = ProjectStatus::Operational;
                    return AdvanceOutcome::BecameOperational;
                }
                AdvanceOutcome::None
            }
            ProjectStatus::Operational => {
                let base_failure_prob = crate::config::constants::BASE_ANNUAL_FAILURE_PROB;
                let failure_prob =
                    (base_failure_prob * climate_risk_multiplier * self.channel.failure_sensitivity()).min(1.0);

                self.health = (self.health - 0.005 * climate_risk_multiplier).clamp(0.0, 1.0);

                if fail_draw < failure_prob {
                    let reversal = self.lifetime_reversal_tonnes();
                    self.status = ProjectStatus::Failed;
                    return AdvanceOutcome::Failed { reversal_tonnes: reversal };
                }

                self.years_operational += 1;
                if self.years_operational >= self.max_operational_years {
                    self.status = ProjectStatus::Failed;
                    return AdvanceOutcome::Retired;
                }
                AdvanceOutcome::None
            }
            ProjectStatus::Failed => AdvanceOutcome::None,
        }
    }

    /// Record a clawback: burn half the project's lifetime mint (tracked
    /// by the caller against the token ledger) and mark it failed, emitting
    /// reversal tonnes as with any other failure.
    pub fn clawback(&mut self) -> f64 {
        let reversal = self.lifetime_reversal_tonnes();
        self.status = ProjectStatus::Failed;
        reversal
    }

    /// Force an early retirement outside the normal age/failure path, used
    /// by retirement intensification once the atmosphere has overshot below
    /// 350ppm (§4.2) and CDR capacity is no longer needed at full pace.
    pub fn force_retire(&mut self) -> f64 {
        let reversal = self.lifetime_reversal_tonnes();
        self.status = ProjectStatus::Failed;
        reversal
    }

    /// Tonnes actually credited this tick, degraded by project health.
    pub fn credited_tonnes_this_tick(&self) -> f64 {
        if self.is_operational() {
            self.annual_sequestration_tonnes * self.health
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project(channel: Channel) -> Project {
        Project::new(1, channel, 0, 0, 2, 1_000_000.0, 100.0, 1.0)
    }

    #[test]
    fn development_transitions_to_operational_after_development_years() {
        let mut p = sample_project(Channel::Cdr);
        assert!(matches!(p.advance(1.0, 0.9), AdvanceOutcome::None));
        assert_eq!(p.status, ProjectStatus::Development);
        assert!(matches!(p.advance(1.0, 0.9), AdvanceOutcome::BecameOperational));
        assert_eq!(p.status, ProjectStatus::Operational);
    }

    #[test]
    fn failed_is_terminal() {
        let mut p = sample_project(Channel::Cdr);
        p.status = ProjectStatus::Operational;
        p.years_operational = 5;
        let outcome = p.advance(1.0, 0.0001); // forces failure (draw below any positive prob)
        assert!(matches!(outcome, AdvanceOutcome::Failed { .. }));
        assert_eq!(p.status, ProjectStatus::Failed);
        assert!(matches!(p.advance(1.0, 0.9), AdvanceOutcome::None));
        assert_eq!(p.status, ProjectStatus::Failed);
    }

    #[test]
    fn retires_at_max_operational_years_without_reversal() {
        let mut p = sample_project(Channel::Conventional);
        p.status = ProjectStatus::Operational;
        p.years_operational = p.max_operational_years - 1;
        let outcome = p.advance(1.0, 0.99); // avoid the stochastic failure branch
        assert!(matches!(outcome, AdvanceOutcome::Retired));
        assert_eq!(p.status, ProjectStatus::Failed);
    }

    #[test]
    fn years_operational_never_exceeds_max() {
        let mut p = sample_project(Channel::AvoidedDeforestation);
        p.status = ProjectStatus::Operational;
        for _ in 0..(p.max_operational_years + 10) {
            if p.status == ProjectStatus::Failed {
                break;
            }
            p.advance(1.0, 0.99);
        }
        assert!(p.years_operational <= p.max_operational_years);
    }
}
