use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::constants::{COUNTRY_POOL_SIZE, FOUNDING_COUNTRY_COUNT, HOST_SELECTION_GDP_JITTER};
use crate::world::country::{Country, CountryTier, Region};

const REGIONS: [Region; 6] = [
    Region::NorthAmerica,
    Region::Europe,
    Region::AsiaPacific,
    Region::LatinAmerica,
    Region::Africa,
    Region::MiddleEast,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryPool {
    countries: Vec<Country>,
}

impl CountryPool {
    /// Create the fixed 50-country pool (spec §3). Generation consumes the
    /// run's single seeded RNG so ensemble runs stay reproducible, with the
    /// first `FOUNDING_COUNTRY_COUNT` countries active from year zero.
    pub fn new(rng: &mut ChaCha8Rng) -> Self {
        let mut countries = Vec::with_capacity(COUNTRY_POOL_SIZE);
        for id in 0..COUNTRY_POOL_SIZE as u32 {
            let region = REGIONS[(id as usize) % REGIONS.len()];
            let tier = match id % 3 {
                0 => CountryTier::Tier1,
                1 => CountryTier::Tier2,
                _ => CountryTier::Tier3,
            };
            let gdp = match tier {
                CountryTier::Tier1 => rng.gen_range(0.5f64..=25.0),
                CountryTier::Tier2 => rng.gen_range(0.1f64..=3.0),
                CountryTier::Tier3 => rng.gen_range(0.01f64..=0.8),
            };
            let is_oecd = matches!(tier, CountryTier::Tier1) && rng.gen_bool(0.6);
            let historical_emissions = gdp * rng.gen_range(0.05f64..=0.4);
            let base_cqe_weight = rng.gen_range(0.2f64..=1.0);
            let active = id < FOUNDING_COUNTRY_COUNT as u32;

            countries.push(Country::new(
                id,
                format!("Country_{id:02}"),
                gdp,
                tier,
                region,
                is_oecd,
                historical_emissions,
                base_cqe_weight,
                active,
            ));
        }
        Self { countries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Country> {
        self.countries.iter_mut()
    }

    pub fn active_countries(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter().filter(|c| c.active)
    }

    pub fn active_count(&self) -> usize {
        self.countries.iter().filter(|c| c.active).count()
    }

    pub fn active_gdp_total(&self) -> f64 {
        self.active_countries().map(|c| c.gdp_trillions_usd).sum()
    }

    pub fn get(&self, id: u32) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Country> {
        self.countries.iter_mut().find(|c| c.id == id)
    }

    /// Adopt new countries this tick. `rate_per_year` is fractional: the
    /// integer part adopts unconditionally, the fractional remainder adopts
    /// with that probability (spec §6 "fractional handled probabilistically").
    pub fn adopt_for_tick(&mut self, rate_per_year: f64, rng: &mut ChaCha8Rng) -> usize {
        if rate_per_year <= 0.0 {
            return 0;
        }
        let guaranteed = rate_per_year.floor() as usize;
        let fractional = rate_per_year.fract();
        let mut to_adopt = guaranteed;
        if fractional > 0.0 && rng.gen_bool(fractional) {
            to_adopt += 1;
        }

        let mut adopted = 0;
        for _ in 0..to_adopt {
            if let Some(id) = self.select_inactive_weighted(rng) {
                if let Some(country) = self.get_mut(id) {
                    country.adopt();
                    adopted += 1;
                }
            } else {
                break;
            }
        }
        adopted
    }

    /// GDP-weighted selection (sqrt(GDP), +/-50% jitter) among inactive
    /// countries, the same weighting convention used for project host
    /// selection (§4.2).
    fn select_inactive_weighted(&self, rng: &mut ChaCha8Rng) -> Option<u32> {
        let candidates: Vec<&Country> = self.countries.iter().filter(|c| !c.active).collect();
        weighted_select(&candidates, rng).map(|c| c.id)
    }

    /// Attribute this tick's CQE purchases across active countries by their
    /// `base_cqe_weight` (same weighting convention as the Auditor's
    /// co-benefit overlay). Reporting only: doesn't move any XCR or USD.
    pub fn distribute_cqe_purchase_equivalent(&mut self, amount_usd: f64) {
        if amount_usd <= 0.0 {
            return;
        }
        let total_weight: f64 = self.active_countries().map(|c| c.base_cqe_weight).sum();
        if total_weight <= 0.0 {
            return;
        }
        let shares: Vec<(u32, f64)> =
            self.active_countries().map(|c| (c.id, c.base_cqe_weight / total_weight)).collect();
        for (id, share) in shares {
            if let Some(country) = self.get_mut(id) {
                country.record_cqe_purchase_equivalent(amount_usd * share);
            }
        }
    }
}

/// GDP-sqrt-weighted selection among a restricted candidate set, with
/// +/-`HOST_SELECTION_GDP_JITTER` multiplicative jitter per candidate
/// (spec §4.2 host-country selection).
pub fn weighted_select<'a>(candidates: &[&'a Country], rng: &mut ChaCha8Rng) -> Option<&'a Country> {
    weighted_select_with(candidates, rng, |_| 1.0)
}

/// As `weighted_select`, but each candidate's GDP-sqrt weight is further
/// scaled by `extra_weight` -- used by the project broker to fold in a
/// channel's region/tier host preference (§4.2) on top of the generic
/// GDP-jitter weighting.
pub fn weighted_select_with<'a>(
    candidates: &[&'a Country],
    rng: &mut ChaCha8Rng,
    extra_weight: impl Fn(&Country) -> f64,
) -> Option<&'a Country> {
    if candidates.is_empty() {
        return None;
    }
    let weights: Vec<f64> = candidates
        .iter()
        .map(|c| {
            let jitter = 1.0 + rng.gen_range(-HOST_SELECTION_GDP_JITTER..=HOST_SELECTION_GDP_JITTER);
            (c.gdp_trillions_usd.max(0.0)).sqrt() * jitter.max(0.0) * extra_weight(c).max(0.0)
        })
        .collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return candidates.first().copied();
    }
    let mut draw = rng.gen_range(0.0..total);
    for (candidate, weight) in candidates.iter().zip(weights.iter()) {
        if draw < *weight {
            return Some(candidate);
        }
        draw -= weight;
    }
    candidates.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn pool_has_fifty_countries_with_five_founding_active() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = CountryPool::new(&mut rng);
        assert_eq!(pool.iter().count(), COUNTRY_POOL_SIZE);
        assert_eq!(pool.active_count(), FOUNDING_COUNTRY_COUNT);
    }

    #[test]
    fn adoption_is_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut pool = CountryPool::new(&mut rng);
        let before: Vec<u32> = pool.active_countries().map(|c| c.id).collect();
        pool.adopt_for_tick(3.5, &mut rng);
        for id in before {
            assert!(pool.get(id).unwrap().active);
        }
    }

    #[test]
    fn zero_adoption_rate_leaves_pool_unchanged() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = CountryPool::new(&mut rng);
        let adopted = pool.adopt_for_tick(0.0, &mut rng);
        assert_eq!(adopted, 0);
        assert_eq!(pool.active_count(), FOUNDING_COUNTRY_COUNT);
    }
}
