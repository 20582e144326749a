//! In-memory lending protocol for tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{LendingError, LendingOperation, LendingPort, TransactionOutcome};
use crate::domain::markets::{Market, TokenAmount};

/// Address reported as the sender of mock transactions.
pub const MOCK_WALLET: &str = "0x000000000000000000000000000000000000beef";

/// A call recorded by [`MockCompound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Operation performed.
    pub operation: LendingOperation,
    /// Token symbol.
    pub token: String,
    /// Amount in base units.
    pub amount: TokenAmount,
}

/// Mock Compound adapter.
///
/// Rates default to zero. Transactions succeed with sequential hashes
/// unless a failure is set.
#[derive(Debug, Default)]
pub struct MockCompound {
    rates: RwLock<HashMap<String, (u128, u128)>>,
    failure: RwLock<Option<LendingError>>,
    calls: RwLock<Vec<RecordedCall>>,
    next_tx: AtomicU64,
}

impl MockCompound {
    /// Create a new mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set per-block supply and borrow rates (scaled by 1e18) for a token.
    pub fn set_rates(&self, token: &str, supply: u128, borrow: u128) {
        self.rates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), (supply, borrow));
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: LendingError) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Clear a failure set with [`Self::fail_with`].
    pub fn clear_failure(&self) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Transactions submitted so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_failure(&self) -> Result<(), LendingError> {
        self.failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .map_or(Ok(()), Err)
    }

    fn rates_for(&self, market: &Market) -> (u128, u128) {
        self.rates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(market.symbol())
            .copied()
            .unwrap_or_default()
    }

    fn transact(
        &self,
        operation: LendingOperation,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        self.check_failure()?;

        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                operation,
                token: market.symbol().to_string(),
                amount,
            });

        let n = self.next_tx.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(TransactionOutcome {
            tx_hash: format!("0x{n:064x}"),
            from: MOCK_WALLET.to_string(),
            to: market.c_token().to_string(),
            block_number: Some(n),
            gas_used: Some(21_000),
        })
    }
}

#[async_trait]
impl LendingPort for MockCompound {
    async fn supply_rate_per_block(&self, market: &Market) -> Result<u128, LendingError> {
        self.check_failure()?;
        Ok(self.rates_for(market).0)
    }

    async fn borrow_rate_per_block(&self, market: &Market) -> Result<u128, LendingError> {
        self.check_failure()?;
        Ok(self.rates_for(market).1)
    }

    async fn supply(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        self.transact(LendingOperation::Supply, market, amount)
    }

    async fn borrow(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        self.transact(LendingOperation::Borrow, market, amount)
    }

    async fn repay_borrow(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        self.transact(LendingOperation::Repay, market, amount)
    }
}
