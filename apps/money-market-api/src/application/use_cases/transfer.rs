//! Transfer Use Case
//!
//! Dispatches a validated supply / borrow / repay request to the lending
//! protocol and relays the outcome.

use std::sync::Arc;
use std::time::Instant;

use crate::application::dto::{TransferCommand, TransferReceiptDto};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    LendingError, LendingOperation, LendingPort, TransactionOutcome, normalize_error_message,
};
use crate::domain::markets::{Market, TokenAllowList, TokenAmount};
use crate::observability::record_protocol_call;

/// Use case for supply / borrow / repay operations.
pub struct TransferUseCase<L>
where
    L: LendingPort,
{
    lending: Arc<L>,
    allow_list: Arc<TokenAllowList>,
}

impl<L> TransferUseCase<L>
where
    L: LendingPort,
{
    /// Create a new TransferUseCase.
    pub const fn new(lending: Arc<L>, allow_list: Arc<TokenAllowList>) -> Self {
        Self {
            lending,
            allow_list,
        }
    }

    /// Execute the use case.
    pub async fn execute(
        &self,
        command: TransferCommand,
    ) -> Result<TransferReceiptDto, ApplicationError> {
        let market = self.allow_list.resolve(&command.token)?;
        let operation = command.operation;
        let display_amount = command.amount.to_display(market.decimals());

        tracing::info!(
            operation = operation.as_str(),
            token = market.symbol(),
            amount = %command.amount,
            "{} {} {} {} Compound...",
            operation.progressive(),
            display_amount,
            market.symbol(),
            operation.preposition(),
        );

        let started = Instant::now();
        let result = self.dispatch(operation, market, command.amount).await;
        record_protocol_call(
            operation.as_str(),
            if result.is_ok() { "ok" } else { "error" },
            started.elapsed().as_secs_f64(),
        );

        match result {
            Ok(outcome) => {
                tracing::info!(
                    operation = operation.as_str(),
                    token = market.symbol(),
                    tx_hash = %outcome.tx_hash,
                    block_number = ?outcome.block_number,
                    "{} {} transaction mined",
                    operation.past_tense(),
                    market.symbol(),
                );

                Ok(TransferReceiptDto {
                    operation,
                    token: market.symbol().to_string(),
                    message: format!(
                        "{} {} {}",
                        operation.past_tense(),
                        display_amount,
                        market.symbol()
                    ),
                    display_amount,
                    outcome,
                })
            }
            Err(e) => {
                tracing::error!(
                    operation = operation.as_str(),
                    token = market.symbol(),
                    error = %e,
                    reported = %normalize_error_message(&e),
                    "{} {} failed",
                    operation.as_str(),
                    market.symbol(),
                );
                Err(e.into())
            }
        }
    }

    async fn dispatch(
        &self,
        operation: LendingOperation,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        match operation {
            LendingOperation::Supply => self.lending.supply(market, amount).await,
            LendingOperation::Borrow => self.lending.borrow(market, amount).await,
            LendingOperation::Repay => self.lending.repay_borrow(market, amount).await,
        }
    }
}
