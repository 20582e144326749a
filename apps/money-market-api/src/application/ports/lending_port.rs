//! Lending Port (Driven Port)
//!
//! Interface to the lending protocol: rate reads and supply / borrow /
//! repay transactions against a market.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::markets::{Market, TokenAmount};

/// A state-changing operation against a money market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LendingOperation {
    /// Deposit the underlying token and receive cTokens.
    Supply,
    /// Borrow the underlying token against posted collateral.
    Borrow,
    /// Repay an outstanding borrow.
    Repay,
}

impl LendingOperation {
    /// Stable lowercase name, used in logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Supply => "supply",
            Self::Borrow => "borrow",
            Self::Repay => "repay",
        }
    }

    /// Verb for in-progress log lines ("Supplying 1.5 USDC to Compound...").
    #[must_use]
    pub const fn progressive(&self) -> &'static str {
        match self {
            Self::Supply => "Supplying",
            Self::Borrow => "Borrowing",
            Self::Repay => "Repaying",
        }
    }

    /// Verb for completion messages ("Supplied 1.5 USDC").
    #[must_use]
    pub const fn past_tense(&self) -> &'static str {
        match self {
            Self::Supply => "Supplied",
            Self::Borrow => "Borrowed",
            Self::Repay => "Repaid",
        }
    }

    /// Direction relative to the protocol.
    #[must_use]
    pub const fn preposition(&self) -> &'static str {
        match self {
            Self::Supply | Self::Repay => "to",
            Self::Borrow => "from",
        }
    }
}

impl fmt::Display for LendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    /// Transaction hash (0x-prefixed hex).
    pub tx_hash: String,
    /// Sending account.
    pub from: String,
    /// Contract the transaction was sent to.
    pub to: String,
    /// Block the transaction was included in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Gas consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
}

/// Coarse category of a lending protocol failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LendingErrorKind {
    /// The RPC node or its transport failed.
    Provider,
    /// The contract rejected or reverted the call.
    Contract,
    /// Signing the transaction failed.
    Signer,
    /// The call did not complete within the configured timeout.
    Timeout,
    /// The adapter is misconfigured for the requested market.
    Configuration,
}

impl fmt::Display for LendingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Provider => "provider error",
            Self::Contract => "contract error",
            Self::Signer => "signer error",
            Self::Timeout => "timeout",
            Self::Configuration => "configuration error",
        };
        f.write_str(name)
    }
}

/// JSON-RPC error object returned by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcErrorDetail {
    /// JSON-RPC error code.
    pub code: i64,
    /// Error message supplied by the node.
    pub message: String,
}

/// Lending port error.
///
/// Carries up to three renderings of the failure, consumed in order by
/// [`normalize_error_message`]: the node's nested JSON-RPC message, the
/// failure's own message, and the full `Display` text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct LendingError {
    kind: LendingErrorKind,
    detail: String,
    message: Option<String>,
    rpc_error: Option<RpcErrorDetail>,
}

impl LendingError {
    /// Create an error with its full detail text.
    #[must_use]
    pub fn new(kind: LendingErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            message: None,
            rpc_error: None,
        }
    }

    /// Attach the failure's own message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the JSON-RPC error object returned by the node.
    #[must_use]
    pub fn with_rpc_error(mut self, code: i64, message: impl Into<String>) -> Self {
        self.rpc_error = Some(RpcErrorDetail {
            code,
            message: message.into(),
        });
        self
    }

    /// Error category.
    #[must_use]
    pub const fn kind(&self) -> LendingErrorKind {
        self.kind
    }

    /// Full detail text.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// The failure's own message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Nested JSON-RPC error, if the node returned one.
    #[must_use]
    pub const fn rpc_error(&self) -> Option<&RpcErrorDetail> {
        self.rpc_error.as_ref()
    }
}

/// Pick the message shown to API callers for a lending failure.
///
/// Precedence: nested provider (JSON-RPC) message, then the error's own
/// message, then the full rendering. Empty candidates are skipped.
#[must_use]
pub fn normalize_error_message(error: &LendingError) -> String {
    error
        .rpc_error()
        .map(|rpc| rpc.message.as_str())
        .filter(|m| !m.trim().is_empty())
        .or_else(|| error.message().filter(|m| !m.trim().is_empty()))
        .map_or_else(|| error.to_string(), str::to_string)
}

/// Port for lending protocol interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingPort: Send + Sync {
    /// Current supply rate per block, scaled by 1e18.
    async fn supply_rate_per_block(&self, market: &Market) -> Result<u128, LendingError>;

    /// Current borrow rate per block, scaled by 1e18.
    async fn borrow_rate_per_block(&self, market: &Market) -> Result<u128, LendingError>;

    /// Supply `amount` of the market's underlying token.
    async fn supply(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError>;

    /// Borrow `amount` of the market's underlying token.
    async fn borrow(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError>;

    /// Repay `amount` of an outstanding borrow.
    async fn repay_borrow(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefers_nested_provider_message() {
        let err = LendingError::new(LendingErrorKind::Provider, "(code: -32000, ...)")
            .with_message("top level")
            .with_rpc_error(-32000, "insufficient funds for gas * price + value");

        assert_eq!(
            normalize_error_message(&err),
            "insufficient funds for gas * price + value"
        );
    }

    #[test]
    fn normalize_falls_back_to_top_level_message() {
        let err = LendingError::new(LendingErrorKind::Contract, "Contract call reverted")
            .with_message("execution reverted: borrow rejection");

        assert_eq!(
            normalize_error_message(&err),
            "execution reverted: borrow rejection"
        );
    }

    #[test]
    fn normalize_falls_back_to_rendering() {
        let err = LendingError::new(LendingErrorKind::Provider, "connection refused");
        assert_eq!(
            normalize_error_message(&err),
            "provider error: connection refused"
        );
    }

    #[test]
    fn normalize_skips_empty_candidates() {
        let err = LendingError::new(LendingErrorKind::Provider, "bad gateway")
            .with_rpc_error(-32603, "")
            .with_message("  ");
        assert_eq!(normalize_error_message(&err), "provider error: bad gateway");
    }

    #[test]
    fn normalize_is_pure() {
        let err = LendingError::new(LendingErrorKind::Timeout, "supply timed out after 120s");
        assert_eq!(normalize_error_message(&err), normalize_error_message(&err));
    }

    #[test]
    fn operation_wording() {
        assert_eq!(LendingOperation::Supply.progressive(), "Supplying");
        assert_eq!(LendingOperation::Borrow.preposition(), "from");
        assert_eq!(LendingOperation::Repay.past_tense(), "Repaid");
        assert_eq!(LendingOperation::Repay.to_string(), "repay");
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let outcome = TransactionOutcome {
            tx_hash: "0xabc".to_string(),
            from: "0x1".to_string(),
            to: "0x2".to_string(),
            block_number: Some(7),
            gas_used: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["txHash"], "0xabc");
        assert_eq!(json["blockNumber"], 7);
        assert!(json.get("gasUsed").is_none());
    }
}
