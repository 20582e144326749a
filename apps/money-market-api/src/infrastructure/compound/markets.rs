//! Compound v2 Ethereum mainnet market registry.

use crate::domain::markets::Market;

/// Token supplied by `POST /supply_usdc`.
pub const LEGACY_SUPPLY_TOKEN: &str = "USDC";

/// Token borrowed and repaid by `POST /borrow_dai` and `POST /repay_dai`.
pub const LEGACY_BORROW_TOKEN: &str = "DAI";

/// Token quoted by `GET /compound_rates`.
pub const LEGACY_RATES_TOKEN: &str = "USDC";

/// Markets this service supports, in allow-list order.
#[must_use]
pub fn mainnet_markets() -> Vec<Market> {
    vec![
        Market::new(
            "USDC",
            6,
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "0x39AA39c021dfbaE8faC545936693aC917d5E7563",
        ),
        Market::new(
            "DAI",
            18,
            "0x6B175474E89094C44Da98b954EedeAC495271d0F",
            "0x5d3a536E4D6DbD6114cc1Ead35777bAB948E3643",
        ),
        Market::new(
            "USDT",
            6,
            "0xdAC17F958D2ee523a2206206994597C13D831ec7",
            "0xf650C3d88D12dB855b8bf7D11Be6C55A4e07dCC9",
        ),
        Market::new(
            "WBTC",
            8,
            "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
            "0xccF4429DB6322D5C611ee964527D42E5d685DD6a",
        ),
        Market::new(
            "UNI",
            18,
            "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984",
            "0x35A18000230DA775CAc24873d00Ff85BccdeD550",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use ethers::types::Address;

    use super::*;
    use crate::domain::markets::TokenAllowList;

    #[test]
    fn every_address_parses() {
        for market in mainnet_markets() {
            assert!(
                Address::from_str(market.underlying()).is_ok(),
                "{} underlying",
                market.symbol()
            );
            assert!(
                Address::from_str(market.c_token()).is_ok(),
                "{} cToken",
                market.symbol()
            );
        }
    }

    #[test]
    fn symbols_and_ctokens_are_unique() {
        let markets = mainnet_markets();
        let symbols: HashSet<_> = markets.iter().map(Market::symbol).collect();
        let c_tokens: HashSet<_> = markets.iter().map(Market::c_token).collect();
        assert_eq!(symbols.len(), markets.len());
        assert_eq!(c_tokens.len(), markets.len());
    }

    #[test]
    fn legacy_tokens_are_registered() {
        let allow_list = TokenAllowList::new(mainnet_markets());
        assert!(allow_list.contains(LEGACY_SUPPLY_TOKEN));
        assert!(allow_list.contains(LEGACY_BORROW_TOKEN));
        assert!(allow_list.contains(LEGACY_RATES_TOKEN));
    }

    #[test]
    fn decimals_match_tokens() {
        let allow_list = TokenAllowList::new(mainnet_markets());
        let decimals = |symbol: &str| allow_list.resolve(symbol).map(Market::decimals).ok();
        assert_eq!(decimals("USDC"), Some(6));
        assert_eq!(decimals("DAI"), Some(18));
        assert_eq!(decimals("WBTC"), Some(8));
    }
}
