//! Market value object.

use serde::Serialize;

/// A Compound money market: an ERC-20 underlying and the cToken wrapping it.
///
/// Addresses are kept as hex strings here; adapters parse them into their
/// own address types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    symbol: String,
    decimals: u32,
    underlying: String,
    c_token: String,
}

impl Market {
    /// Create a market description.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        decimals: u32,
        underlying: impl Into<String>,
        c_token: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            underlying: underlying.into(),
            c_token: c_token.into(),
        }
    }

    /// Token symbol (e.g. `USDC`).
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Decimals of the underlying token.
    #[must_use]
    pub const fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Underlying ERC-20 token address.
    #[must_use]
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// cToken contract address.
    #[must_use]
    pub fn c_token(&self) -> &str {
        &self.c_token
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
