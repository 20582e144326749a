//! Compound v2 adapter implementing LendingPort.

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionReceipt, U64, U256};

use crate::application::ports::{LendingError, LendingPort, TransactionOutcome};
use crate::domain::markets::{Market, TokenAmount};

use super::config::CompoundConfig;
use super::contracts::{CToken, Erc20};
use super::error::{CompoundError, SignerClient};

/// Parsed contract addresses of one market.
#[derive(Debug, Clone, Copy)]
struct MarketContracts {
    underlying: Address,
    c_token: Address,
}

/// Compound v2 money-market adapter.
///
/// Reads rates from cToken contracts and signs supply / borrow / repay
/// transactions with a local key.
#[derive(Debug, Clone)]
pub struct CompoundAdapter {
    client: Arc<SignerClient>,
    wallet: Address,
    markets: HashMap<String, MarketContracts>,
    timeout: Duration,
    confirmations: usize,
}

impl CompoundAdapter {
    /// Connect to the node and register the given markets.
    ///
    /// Queries the chain ID when it is not configured, and checks that the
    /// configured wallet address belongs to the signing key.
    pub async fn connect(
        config: &CompoundConfig,
        markets: &[Market],
    ) -> Result<Self, CompoundError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| CompoundError::Configuration(format!("invalid RPC URL: {e}")))?
            .interval(config.poll_interval);

        let wallet = LocalWallet::from_str(config.private_key.expose().trim())
            .map_err(|e| CompoundError::Configuration(format!("invalid private key: {e}")))?;

        let expected = Address::from_str(config.wallet_address.trim()).map_err(|e| {
            CompoundError::Configuration(format!(
                "invalid wallet address '{}': {e}",
                config.wallet_address
            ))
        })?;
        if wallet.address() != expected {
            return Err(CompoundError::Configuration(format!(
                "wallet address {expected:#x} does not match the private key (derived {:#x})",
                wallet.address()
            )));
        }

        let chain_id = match config.chain_id {
            Some(id) => id,
            None => bounded("get_chain_id", config.timeout, async {
                Ok(provider.get_chainid().await?.low_u64())
            })
            .await?,
        };

        let markets = markets
            .iter()
            .map(|market| -> Result<(String, MarketContracts), CompoundError> {
                let parse = |label: &str, value: &str| {
                    Address::from_str(value).map_err(|e| {
                        CompoundError::Configuration(format!(
                            "invalid {label} address for {}: {e}",
                            market.symbol()
                        ))
                    })
                };
                Ok((
                    market.symbol().to_string(),
                    MarketContracts {
                        underlying: parse("underlying", market.underlying())?,
                        c_token: parse("cToken", market.c_token())?,
                    },
                ))
            })
            .collect::<Result<HashMap<_, _>, CompoundError>>()?;

        tracing::info!(
            chain_id,
            wallet = %format!("{expected:#x}"),
            markets = markets.len(),
            timeout_secs = config.timeout.as_secs(),
            "Compound adapter connected"
        );

        let client = SignerMiddleware::new(provider, wallet.with_chain_id(chain_id));
        Ok(Self {
            client: Arc::new(client),
            wallet: expected,
            markets,
            timeout: config.timeout,
            confirmations: config.confirmations,
        })
    }

    /// Address that signs transactions.
    #[must_use]
    pub const fn wallet(&self) -> Address {
        self.wallet
    }

    fn contracts(&self, market: &Market) -> Result<MarketContracts, CompoundError> {
        self.markets
            .get(market.symbol())
            .copied()
            .ok_or_else(|| CompoundError::UnknownMarket {
                symbol: market.symbol().to_string(),
            })
    }

    fn c_token(&self, contracts: MarketContracts) -> CToken<SignerClient> {
        CToken::new(contracts.c_token, Arc::clone(&self.client))
    }

    async fn read_rate(
        &self,
        market: &Market,
        function: &'static str,
        select: impl FnOnce(&CToken<SignerClient>) -> ContractCall<SignerClient, U256> + Send,
    ) -> Result<u128, CompoundError> {
        let call = select(&self.c_token(self.contracts(market)?));
        let rate = bounded(function, self.timeout, async { Ok(call.call().await?) }).await?;
        Ok(saturating_u128(rate))
    }

    /// Approve the cToken to pull `amount` of the underlying if the current
    /// allowance is short.
    async fn ensure_allowance(
        &self,
        contracts: MarketContracts,
        amount: U256,
    ) -> Result<(), CompoundError> {
        let token = Erc20::new(contracts.underlying, Arc::clone(&self.client));
        let allowance = token.allowance(self.wallet, contracts.c_token);
        let current =
            bounded("allowance", self.timeout, async { Ok(allowance.call().await?) }).await?;
        if current >= amount {
            return Ok(());
        }

        // Tokens like USDT reject changing a non-zero allowance to another
        // non-zero value.
        if !current.is_zero() {
            tracing::debug!(
                spender = %format!("{:#x}", contracts.c_token),
                "Resetting allowance"
            );
            self.send_and_confirm("approve", token.approve(contracts.c_token, U256::zero()))
                .await?;
        }

        tracing::info!(
            spender = %format!("{:#x}", contracts.c_token),
            amount = %amount,
            "Approving cToken allowance"
        );
        self.send_and_confirm("approve", token.approve(contracts.c_token, amount))
            .await?;
        Ok(())
    }

    /// Simulate a cToken write, then send it. Compound v2 reports most
    /// failures through a non-zero return code rather than a revert.
    async fn submit(
        &self,
        function: &'static str,
        call: ContractCall<SignerClient, U256>,
    ) -> Result<TransactionReceipt, CompoundError> {
        let code = bounded(function, self.timeout, async { Ok(call.call().await?) }).await?;
        if !code.is_zero() {
            return Err(CompoundError::ProtocolFailure {
                function,
                code: code.low_u64(),
            });
        }
        self.send_and_confirm(function, call).await
    }

    /// Send a transaction and wait for it to be mined.
    ///
    /// Sending and waiting are bounded separately. Once the node has
    /// accepted the transaction, a timeout reports its hash.
    async fn send_and_confirm<D: Detokenize>(
        &self,
        operation: &'static str,
        call: ContractCall<SignerClient, D>,
    ) -> Result<TransactionReceipt, CompoundError> {
        let pending = bounded(operation, self.timeout, async { Ok(call.send().await?) }).await?;
        let tx_hash = format!("{:#x}", *pending);
        tracing::debug!(operation, tx_hash = %tx_hash, "Transaction sent");

        await_mined(
            operation,
            tx_hash,
            self.timeout,
            pending.confirmations(self.confirmations),
        )
        .await
    }

    async fn supply_inner(
        &self,
        market: &Market,
        amount: U256,
    ) -> Result<TransactionReceipt, CompoundError> {
        let contracts = self.contracts(market)?;
        self.ensure_allowance(contracts, amount).await?;
        self.submit("mint", self.c_token(contracts).mint(amount)).await
    }

    async fn borrow_inner(
        &self,
        market: &Market,
        amount: U256,
    ) -> Result<TransactionReceipt, CompoundError> {
        let contracts = self.contracts(market)?;
        self.submit("borrow", self.c_token(contracts).borrow(amount)).await
    }

    async fn repay_inner(
        &self,
        market: &Market,
        amount: U256,
    ) -> Result<TransactionReceipt, CompoundError> {
        let contracts = self.contracts(market)?;
        self.ensure_allowance(contracts, amount).await?;
        self.submit("repayBorrow", self.c_token(contracts).repay_borrow(amount))
            .await
    }
}

#[async_trait]
impl LendingPort for CompoundAdapter {
    async fn supply_rate_per_block(&self, market: &Market) -> Result<u128, LendingError> {
        let rate = self
            .read_rate(market, "supplyRatePerBlock", CToken::supply_rate_per_block)
            .await?;
        Ok(rate)
    }

    async fn borrow_rate_per_block(&self, market: &Market) -> Result<u128, LendingError> {
        let rate = self
            .read_rate(market, "borrowRatePerBlock", CToken::borrow_rate_per_block)
            .await?;
        Ok(rate)
    }

    async fn supply(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        let receipt = self.supply_inner(market, to_u256(amount)).await?;
        Ok(to_outcome(&receipt))
    }

    async fn borrow(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        let receipt = self.borrow_inner(market, to_u256(amount)).await?;
        Ok(to_outcome(&receipt))
    }

    async fn repay_borrow(
        &self,
        market: &Market,
        amount: TokenAmount,
    ) -> Result<TransactionOutcome, LendingError> {
        let receipt = self.repay_inner(market, to_u256(amount)).await?;
        Ok(to_outcome(&receipt))
    }
}

/// Run `fut` with an upper bound on its duration.
async fn bounded<T, F>(
    operation: &'static str,
    timeout: Duration,
    fut: F,
) -> Result<T, CompoundError>
where
    F: Future<Output = Result<T, CompoundError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| CompoundError::Timeout { operation, timeout })?
}

/// Wait for a sent transaction's receipt.
async fn await_mined<F>(
    operation: &'static str,
    tx_hash: String,
    timeout: Duration,
    wait: F,
) -> Result<TransactionReceipt, CompoundError>
where
    F: Future<Output = Result<Option<TransactionReceipt>, ProviderError>>,
{
    let receipt = match tokio::time::timeout(timeout, wait).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(operation, tx_hash = %tx_hash, "Transaction still pending at timeout");
            return Err(CompoundError::ReceiptTimeout {
                operation,
                tx_hash,
                timeout,
            });
        }
    };

    let receipt = receipt.ok_or_else(|| CompoundError::Dropped {
        tx_hash: tx_hash.clone(),
    })?;
    if receipt.status == Some(U64::zero()) {
        return Err(CompoundError::Reverted { tx_hash });
    }
    Ok(receipt)
}

fn to_u256(amount: TokenAmount) -> U256 {
    U256::from(amount.base_units())
}

fn saturating_u128(value: U256) -> u128 {
    if value > U256::from(u128::MAX) {
        u128::MAX
    } else {
        value.as_u128()
    }
}

fn to_outcome(receipt: &TransactionReceipt) -> TransactionOutcome {
    TransactionOutcome {
        tx_hash: format!("{:#x}", receipt.transaction_hash),
        from: format!("{:#x}", receipt.from),
        to: receipt
            .to
            .map(|to| format!("{to:#x}"))
            .unwrap_or_default(),
        block_number: receipt.block_number.map(|n| n.as_u64()),
        gas_used: receipt.gas_used.map(|g| g.low_u64()),
    }
}
