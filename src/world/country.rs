use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryTier {
    Tier1,
    Tier2,
    Tier3,
}

impl fmt::Display for CountryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryTier::Tier1 => write!(f, "Tier1"),
            CountryTier::Tier2 => write!(f, "Tier2"),
            CountryTier::Tier3 => write!(f, "Tier3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    NorthAmerica,
    Europe,
    AsiaPacific,
    LatinAmerica,
    Africa,
    MiddleEast,
}

impl Region {
    /// Used by the project-broker's host-selection preference weights
    /// (§4.2): tropical/developing regions host CDR and avoided-deforestation
    /// projects more readily than conventional-mitigation infrastructure.
    pub fn is_tropical(&self) -> bool {
        matches!(self, Region::LatinAmerica | Region::Africa | Region::AsiaPacific)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::NorthAmerica => write!(f, "NorthAmerica"),
            Region::Europe => write!(f, "Europe"),
            Region::AsiaPacific => write!(f, "AsiaPacific"),
            Region::LatinAmerica => write!(f, "LatinAmerica"),
            Region::Africa => write!(f, "Africa"),
            Region::MiddleEast => write!(f, "MiddleEast"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: u32,
    pub name: String,
    pub gdp_trillions_usd: f64,
    pub tier: CountryTier,
    pub region: Region,
    pub is_oecd: bool,
    pub historical_emissions_gtc: f64,
    /// Co-benefit attribution weight, used by the Auditor's overlay
    /// redistribution and CQE's per-country purchase attribution. Not a
    /// budget figure -- reporting only.
    pub base_cqe_weight: f64,
    pub active: bool,
    pub cumulative_xcr_earned: f64,
    pub cumulative_cqe_purchased_equivalent_usd: f64,
}

impl Country {
    pub fn new(
        id: u32,
        name: String,
        gdp_trillions_usd: f64,
        tier: CountryTier,
        region: Region,
        is_oecd: bool,
        historical_emissions_gtc: f64,
        base_cqe_weight: f64,
        active: bool,
    ) -> Self {
        Self {
            id,
            name,
            gdp_trillions_usd,
            tier,
            region,
            is_oecd,
            historical_emissions_gtc,
            base_cqe_weight,
            active,
            cumulative_xcr_earned: 0.0,
            cumulative_cqe_purchased_equivalent_usd: 0.0,
        }
    }

    /// Adoption is monotonic: active may only transition false -> true.
    pub fn adopt(&mut self) {
        self.active = true;
    }

    pub fn record_xcr_earned(&mut self, amount: f64) {
        self.cumulative_xcr_earned += amount;
    }

    pub fn record_cqe_purchase_equivalent(&mut self, amount_usd: f64) {
        self.cumulative_cqe_purchased_equivalent_usd += amount_usd;
    }
}
