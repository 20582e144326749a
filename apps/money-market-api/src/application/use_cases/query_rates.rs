//! Query Rates Use Case

use std::sync::Arc;
use std::time::Instant;

use crate::application::dto::MarketRatesDto;
use crate::application::error::ApplicationError;
use crate::application::ports::{LendingError, LendingPort};
use crate::domain::markets::{Market, TokenAllowList};
use crate::domain::rates::{BlockCadence, RateQuote};
use crate::observability::{record_protocol_call, record_rate_quote};

/// Use case for quoting a market's supply and borrow APYs.
pub struct QueryRatesUseCase<L>
where
    L: LendingPort,
{
    lending: Arc<L>,
    allow_list: Arc<TokenAllowList>,
    cadence: BlockCadence,
}

impl<L> QueryRatesUseCase<L>
where
    L: LendingPort,
{
    /// Create a new QueryRatesUseCase.
    pub const fn new(
        lending: Arc<L>,
        allow_list: Arc<TokenAllowList>,
        cadence: BlockCadence,
    ) -> Self {
        Self {
            lending,
            allow_list,
            cadence,
        }
    }

    /// Block cadence used for annualization.
    pub const fn cadence(&self) -> BlockCadence {
        self.cadence
    }

    /// Execute the use case.
    pub async fn execute(&self, token: &str) -> Result<MarketRatesDto, ApplicationError> {
        let market = self.allow_list.resolve(token)?;

        let started = Instant::now();
        let rates = self.read_rates(market).await;
        record_protocol_call(
            "read_rates",
            if rates.is_ok() { "ok" } else { "error" },
            started.elapsed().as_secs_f64(),
        );

        let (supply_rate, borrow_rate) = rates.inspect_err(|e| {
            tracing::error!(token = market.symbol(), error = %e, "Rate query failed");
        })?;

        let quote = RateQuote::from_per_block(supply_rate, borrow_rate, self.cadence);
        record_rate_quote(market.symbol(), quote.supply_apy(), quote.borrow_apy());

        tracing::debug!(
            token = market.symbol(),
            supply_rate_per_block = %supply_rate,
            borrow_rate_per_block = %borrow_rate,
            supply_apy = quote.supply_apy(),
            borrow_apy = quote.borrow_apy(),
            "Rates computed"
        );

        Ok(MarketRatesDto {
            token: market.symbol().to_string(),
            quote,
        })
    }

    /// Read both per-block rates, one call at a time.
    async fn read_rates(&self, market: &Market) -> Result<(u128, u128), LendingError> {
        let supply = self.lending.supply_rate_per_block(market).await?;
        let borrow = self.lending.borrow_rate_per_block(market).await?;
        Ok((supply, borrow))
    }
}
