//! Token allow-list gate.

use thiserror::Error;

use super::market::Market;

/// A token symbol outside the allow-list was requested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported token: {token}. Supported tokens: {}", .supported.join(", "))]
pub struct UnsupportedToken {
    /// The requested symbol.
    pub token: String,
    /// Every symbol the service accepts, in registry order.
    pub supported: Vec<String>,
}

/// Immutable set of markets the service accepts requests for.
///
/// Symbol matching is exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct TokenAllowList {
    markets: Vec<Market>,
}

impl TokenAllowList {
    /// Build the allow-list from a market registry.
    ///
    /// Later entries with an already-seen symbol are ignored.
    #[must_use]
    pub fn new(markets: impl IntoIterator<Item = Market>) -> Self {
        let mut unique: Vec<Market> = Vec::new();
        for market in markets {
            if !unique.iter().any(|m| m.symbol() == market.symbol()) {
                unique.push(market);
            }
        }
        Self { markets: unique }
    }

    /// Resolve a requested symbol to its market.
    pub fn resolve(&self, token: &str) -> Result<&Market, UnsupportedToken> {
        self.markets
            .iter()
            .find(|m| m.symbol() == token)
            .ok_or_else(|| UnsupportedToken {
                token: token.to_string(),
                supported: self.symbols(),
            })
    }

    /// Whether the symbol is allowed.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.markets.iter().any(|m| m.symbol() == token)
    }

    /// Supported symbols in registry order.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.markets.iter().map(|m| m.symbol().to_string()).collect()
    }

    /// All allowed markets.
    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Number of allowed markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether no market is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
