//! XCR token supply accounting (spec §4.3). The ledger is a pure counter:
//! every mint and burn is attributed by the caller (Auditor, CQE), this
//! struct only guarantees circulating supply never goes negative.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    pub total_minted: f64,
    pub total_burned: f64,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circulating_supply(&self) -> f64 {
        (self.total_minted - self.total_burned).max(0.0)
    }

    pub fn mint(&mut self, amount_xcr: f64) {
        if amount_xcr > 0.0 {
            self.total_minted += amount_xcr;
        }
    }

    /// Burn up to `amount_xcr`, clamped to circulating supply. Returns the
    /// amount actually burned.
    pub fn burn(&mut self, amount_xcr: f64) -> f64 {
        let burnable = amount_xcr.max(0.0).min(self.circulating_supply());
        self.total_burned += burnable;
        burnable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circulating_supply_never_negative() {
        let mut ledger = TokenLedger::new();
        ledger.mint(10.0);
        let burned = ledger.burn(50.0);
        assert_eq!(burned, 10.0);
        assert_eq!(ledger.circulating_supply(), 0.0);
    }

    #[test]
    fn mint_and_burn_accumulate() {
        let mut ledger = TokenLedger::new();
        ledger.mint(100.0);
        ledger.burn(30.0);
        ledger.mint(20.0);
        assert_eq!(ledger.circulating_supply(), 90.0);
    }
}
