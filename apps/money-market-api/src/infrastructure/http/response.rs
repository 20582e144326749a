//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

use crate::application::ports::TransactionOutcome;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// `GET /compound_rates` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRatesResponse {
    /// USDC supply APY, two decimals.
    #[serde(rename = "USDC_Supply_APY")]
    pub usdc_supply_apy: String,
    /// USDC borrow APY, two decimals.
    #[serde(rename = "USDC_Borrow_APY")]
    pub usdc_borrow_apy: String,
}

/// Response of the fixed-token transfer endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyTransferResponse {
    /// Summary, e.g. `Supplied 1.5 USDC`.
    pub message: String,
    /// The mined transaction.
    pub tx: TransactionOutcome,
}

/// Response of the multi-token transfer endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Summary, e.g. `Borrowed 2.5 DAI`.
    pub message: String,
    /// Transaction hash.
    pub tx_hash: String,
}

/// `GET /compound/supported-tokens` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedTokensResponse {
    /// Allow-listed symbols.
    pub supported_tokens: Vec<String>,
}

/// `GET /compound/rates/{token}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesResponse {
    /// Token symbol.
    pub token: String,
    /// Supply APY, two decimals.
    #[serde(rename = "supplyAPY")]
    pub supply_apy: String,
    /// Borrow APY, two decimals.
    #[serde(rename = "borrowAPY")]
    pub borrow_apy: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}
