//! Transfer DTOs.

use serde::{Deserialize, Serialize};

use crate::application::ports::{LendingOperation, TransactionOutcome};
use crate::domain::markets::TokenAmount;

/// Request to move tokens into or out of a money market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCommand {
    /// Operation to perform.
    pub operation: LendingOperation,
    /// Token symbol; must be allow-listed.
    pub token: String,
    /// Amount in the token's smallest unit.
    pub amount: TokenAmount,
}

impl TransferCommand {
    /// Create a transfer command.
    #[must_use]
    pub fn new(operation: LendingOperation, token: impl Into<String>, amount: TokenAmount) -> Self {
        Self {
            operation,
            token: token.into(),
            amount,
        }
    }
}

/// Result of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceiptDto {
    /// Operation performed.
    pub operation: LendingOperation,
    /// Token symbol.
    pub token: String,
    /// Amount in whole-token units, as displayed in `message`.
    pub display_amount: String,
    /// Human-readable summary, e.g. `Supplied 1.5 USDC`.
    pub message: String,
    /// The mined transaction.
    pub outcome: TransactionOutcome,
}
