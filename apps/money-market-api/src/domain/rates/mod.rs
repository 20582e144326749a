//! Interest Rates
//!
//! Compound v2 cTokens expose their current supply and borrow rates as
//! per-block mantissas scaled by 1e18. This context turns those into the
//! annual percentage yields shown to API callers.

mod apy;
mod rate_quote;

pub use apy::{
    BlockCadence, DEFAULT_BLOCKS_PER_MINUTE, RATE_MANTISSA_SCALE, annualize, format_percent,
};
pub use rate_quote::RateQuote;
