//! HTTP request DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::markets::TokenAmount;

/// Body of the fixed-token endpoints (`/supply_usdc`, `/borrow_dai`,
/// `/repay_dai`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyTransferRequest {
    /// Amount in the token's smallest unit.
    pub amount: TokenAmount,
}

/// Body of the multi-token endpoints (`/compound/supply`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Token symbol.
    pub token: String,
    /// Amount in the token's smallest unit.
    pub amount: TokenAmount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_request_accepts_integer_and_string_amounts() {
        let small: TransferRequest =
            serde_json::from_str(r#"{"token":"USDC","amount":1500000}"#).unwrap();
        let large: TransferRequest =
            serde_json::from_str(r#"{"token":"DAI","amount":"25000000000000000000"}"#).unwrap();

        assert_eq!(small.amount.base_units(), 1_500_000);
        assert_eq!(large.amount.base_units(), 25_000_000_000_000_000_000);
    }

    #[test]
    fn transfer_request_requires_amount() {
        assert!(serde_json::from_str::<TransferRequest>(r#"{"token":"USDC"}"#).is_err());
        assert!(serde_json::from_str::<LegacyTransferRequest>("{}").is_err());
    }
}
