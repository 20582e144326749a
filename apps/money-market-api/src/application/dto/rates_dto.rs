//! Rate query DTOs.

use serde::Serialize;

use crate::domain::rates::RateQuote;

/// Annualized rates for one market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRatesDto {
    /// Token symbol.
    pub token: String,
    /// Computed quote.
    pub quote: RateQuote,
}
