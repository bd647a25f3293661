use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::constants::*;

/// The three mitigation channels (spec §3). Per-variant tuning tables are
/// colocated here rather than scattered across modules (§9 "enum-keyed
/// mappings" design note).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Cdr,
    Conventional,
    AvoidedDeforestation,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Cdr => write!(f, "CDR"),
            Channel::Conventional => write!(f, "CONVENTIONAL"),
            Channel::AvoidedDeforestation => write!(f, "AVOIDED_DEFORESTATION"),
        }
    }
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::AvoidedDeforestation, Channel::Conventional, Channel::Cdr];

    /// Initiation order: AVOIDED_DEFORESTATION -> CONVENTIONAL -> CDR (§4.2).
    pub const INITIATION_ORDER: [Channel; 3] = [Channel::AvoidedDeforestation, Channel::Conventional, Channel::Cdr];

    pub fn max_operational_years(&self) -> u32 {
        match self {
            Channel::Cdr => CDR_MAX_OPERATIONAL_YEARS,
            Channel::Conventional => CONVENTIONAL_MAX_OPERATIONAL_YEARS,
            Channel::AvoidedDeforestation => AVOIDED_DEFORESTATION_MAX_OPERATIONAL_YEARS,
        }
    }

    pub fn failure_sensitivity(&self) -> f64 {
        match self {
            Channel::Cdr => CDR_FAILURE_SENSITIVITY,
            Channel::Conventional => CONVENTIONAL_FAILURE_SENSITIVITY,
            Channel::AvoidedDeforestation => AVOIDED_DEFORESTATION_FAILURE_SENSITIVITY,
        }
    }

    /// Reversal fraction of lifetime delivered tonnes emitted on failure
    /// (§4.2): CDR reversals are smaller (removed carbon re-entering slowly)
    /// than conventional/avoided-deforestation reversals (infrastructure
    /// reverting wholesale).
    pub fn reversal_fraction(&self) -> f64 {
        match self {
            Channel::Cdr => CDR_REVERSAL_FRACTION,
            Channel::Conventional | Channel::AvoidedDeforestation => NON_CDR_REVERSAL_FRACTION,
        }
    }

    /// Base marginal cost in USD/tonne before learning, depletion, and
    /// scarcity multipliers (calibration default; spec leaves exact values
    /// a tuning knob, see DESIGN.md).
    pub fn base_cost_usd_per_tonne(&self) -> f64 {
        match self {
            Channel::Cdr => 150.0,
            Channel::Conventional => 30.0,
            Channel::AvoidedDeforestation => 15.0,
        }
    }

    pub fn max_capacity_gt_per_year(&self, cdr_max_capacity_override: f64) -> f64 {
        match self {
            Channel::Cdr => cdr_max_capacity_override,
            Channel::Conventional => CONVENTIONAL_MAX_CAPACITY_GT_PER_YEAR,
            Channel::AvoidedDeforestation => AVOIDED_DEFORESTATION_MAX_CAPACITY_GT_PER_YEAR,
        }
    }

    pub fn learning_rate(&self, cdr_learning_rate: f64, conventional_learning_rate: f64) -> Option<f64> {
        match self {
            Channel::Cdr => Some(cdr_learning_rate),
            Channel::Conventional => Some(conventional_learning_rate),
            Channel::AvoidedDeforestation => None,
        }
    }

    /// Host-country region/tier preference weight multiplier, applied on
    /// top of the sqrt(GDP) jitter weighting (§4.2).
    pub fn region_preference_multiplier(&self, is_tropical: bool, is_tier1: bool) -> f64 {
        match self {
            Channel::Cdr => {
                if is_tropical {
                    2.0
                } else {
                    1.0
                }
            }
            Channel::Conventional => {
                if is_tier1 {
                    2.0
                } else {
                    1.0
                }
            }
            Channel::AvoidedDeforestation => {
                if is_tropical {
                    3.0
                } else {
                    0.2
                }
            }
        }
    }
}
