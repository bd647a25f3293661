//! End-of-run diagnostics: numerical clipping events and per-country
//! attribution, kept separate from `AnnualSnapshot` because they are
//! run-level summaries rather than per-tick state (§7 "clipping/exhaustion
//! are diagnostics, never errors").

use serde::{Deserialize, Serialize};

use crate::utils::flux_guard::Diagnostic;
use crate::world::pool::CountryPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryAttribution {
    pub country_id: u32,
    pub name: String,
    pub cumulative_xcr_earned: f64,
    pub cumulative_cqe_purchased_equivalent_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub flux_guard_events: Vec<Diagnostic>,
    pub country_attribution: Vec<CountryAttribution>,
}

impl RunDiagnostics {
    pub fn collect(flux_guard_events: Vec<Diagnostic>, countries: &CountryPool) -> Self {
        let country_attribution = countries
            .iter()
            .map(|c| CountryAttribution {
                country_id: c.id,
                name: c.name.clone(),
                cumulative_xcr_earned: c.cumulative_xcr_earned,
                cumulative_cqe_purchased_equivalent_usd: c.cumulative_cqe_purchased_equivalent_usd,
            })
            .collect();
        Self { flux_guard_events, country_attribution }
    }
}
