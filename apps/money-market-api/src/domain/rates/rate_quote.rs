//! Supply/borrow APY pair for one market.

use serde::Serialize;

use super::apy::{BlockCadence, annualize, format_percent};

/// Annualized supply and borrow yields for a market.
///
/// Derived on every request from the on-chain per-block rates; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateQuote {
    supply_apy: f64,
    borrow_apy: f64,
}

impl RateQuote {
    /// Build a quote from raw per-block rate mantissas.
    #[must_use]
    pub fn from_per_block(
        supply_rate_per_block: u128,
        borrow_rate_per_block: u128,
        cadence: BlockCadence,
    ) -> Self {
        Self {
            supply_apy: annualize(supply_rate_per_block, cadence),
            borrow_apy: annualize(borrow_rate_per_block, cadence),
        }
    }

    /// Supply APY as a percentage.
    #[must_use]
    pub const fn supply_apy(&self) -> f64 {
        self.supply_apy
    }

    /// Borrow APY as a percentage.
    #[must_use]
    pub const fn borrow_apy(&self) -> f64 {
        self.borrow_apy
    }

    /// Supply APY rendered with two decimals.
    #[must_use]
    pub fn supply_apy_display(&self) -> String {
        format_percent(self.supply_apy)
    }

    /// Borrow APY rendered with two decimals.
    #[must_use]
    pub fn borrow_apy_display(&self) -> String {
        format_percent(self.borrow_apy)
    }
}
