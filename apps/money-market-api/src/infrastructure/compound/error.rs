//! Compound-specific error types.

use std::time::Duration;

use ethers::contract::ContractError;
use ethers::middleware::SignerMiddleware;
use ethers::middleware::signer::SignerMiddlewareError;
use ethers::providers::{Http, JsonRpcError, MiddlewareError, Provider, ProviderError};
use ethers::signers::LocalWallet;
use thiserror::Error;

use crate::application::ports::{LendingError, LendingErrorKind};

/// Provider with a local signer, used for every contract call.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Errors from the Compound adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompoundError {
    /// The adapter could not be built from its configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested market was not registered with the adapter.
    #[error("Market {symbol} is not configured")]
    UnknownMarket {
        /// Token symbol.
        symbol: String,
    },

    /// The node answered with a JSON-RPC error object.
    #[error("JSON-RPC error (code: {code}, message: {message})")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Message supplied by the node.
        message: String,
    },

    /// A simulated call reverted.
    #[error("execution reverted: {reason}")]
    Revert {
        /// Decoded revert reason.
        reason: String,
    },

    /// Transport or node failure without a JSON-RPC error object.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Signing failed.
    #[error("Signer error: {0}")]
    Signer(String),

    /// ABI encoding or decoding failed.
    #[error("Contract error: {0}")]
    Contract(String),

    /// A cToken function returned a non-zero Compound error code.
    #[error("{function} failed with Compound error code {code}")]
    ProtocolFailure {
        /// Contract function.
        function: &'static str,
        /// Compound `Error` enum value.
        code: u64,
    },

    /// The transaction was mined with status 0.
    #[error("Transaction {tx_hash} reverted")]
    Reverted {
        /// Transaction hash.
        tx_hash: String,
    },

    /// The node stopped reporting the transaction before it was mined.
    #[error("Transaction {tx_hash} was dropped before it was mined")]
    Dropped {
        /// Transaction hash.
        tx_hash: String,
    },

    /// The operation did not finish in time.
    #[error("{operation} timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Adapter operation.
        operation: &'static str,
        /// Configured bound.
        timeout: Duration,
    },

    /// The transaction was sent but not mined in time. It may still be mined.
    #[error(
        "{operation} transaction {tx_hash} was sent but not mined within {}s; check its status before retrying",
        .timeout.as_secs()
    )]
    ReceiptTimeout {
        /// Adapter operation.
        operation: &'static str,
        /// Hash of the pending transaction.
        tx_hash: String,
        /// Configured bound.
        timeout: Duration,
    },
}

impl CompoundError {
    fn from_rpc(rpc: &JsonRpcError) -> Self {
        Self::Rpc {
            code: rpc.code,
            message: rpc.message.clone(),
        }
    }
}

impl From<ContractError<SignerClient>> for CompoundError {
    fn from(err: ContractError<SignerClient>) -> Self {
        let rpc = err
            .as_middleware_error()
            .and_then(MiddlewareError::as_error_response)
            .or_else(|| {
                err.as_provider_error()
                    .and_then(MiddlewareError::as_error_response)
            });
        if let Some(rpc) = rpc {
            return Self::from_rpc(rpc);
        }

        if err.is_revert() {
            let reason = err
                .decode_revert::<String>()
                .unwrap_or_else(|| "no reason given".to_string());
            return Self::Revert { reason };
        }

        match err.as_middleware_error() {
            Some(SignerMiddlewareError::SignerError(e)) => Self::Signer(e.to_string()),
            Some(e) => Self::Provider(e.to_string()),
            None if err.as_provider_error().is_some() => Self::Provider(err.to_string()),
            None => Self::Contract(err.to_string()),
        }
    }
}

impl From<ProviderError> for CompoundError {
    fn from(err: ProviderError) -> Self {
        err.as_error_response()
            .map_or_else(|| Self::Provider(err.to_string()), Self::from_rpc)
    }
}

impl From<CompoundError> for LendingError {
    fn from(err: CompoundError) -> Self {
        let message = err.to_string();
        match err {
            CompoundError::Rpc { code, message: rpc_message } => {
                Self::new(LendingErrorKind::Provider, message.clone())
                    .with_message(message)
                    .with_rpc_error(code, rpc_message)
            }
            CompoundError::Configuration(_) | CompoundError::UnknownMarket { .. } => {
                Self::new(LendingErrorKind::Configuration, message.clone()).with_message(message)
            }
            CompoundError::Provider(_) => {
                Self::new(LendingErrorKind::Provider, message.clone()).with_message(message)
            }
            CompoundError::Signer(_) => {
                Self::new(LendingErrorKind::Signer, message.clone()).with_message(message)
            }
            CompoundError::Timeout { .. } | CompoundError::ReceiptTimeout { .. } => {
                Self::new(LendingErrorKind::Timeout, message.clone()).with_message(message)
            }
            CompoundError::Revert { .. }
            | CompoundError::Contract(_)
            | CompoundError::ProtocolFailure { .. }
            | CompoundError::Reverted { .. }
            | CompoundError::Dropped { .. } => {
                Self::new(LendingErrorKind::Contract, message.clone()).with_message(message)
            }
        }
    }
}
