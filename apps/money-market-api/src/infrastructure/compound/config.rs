//! Compound adapter configuration.

use std::time::Duration;

use crate::config::{ChainConfig, Secret};

/// Interval between receipt polls while waiting for a transaction.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration for the Compound adapter.
#[derive(Debug, Clone)]
pub struct CompoundConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Signing key.
    pub private_key: Secret,
    /// Expected address of the signing key.
    pub wallet_address: String,
    /// EIP-155 chain ID; queried from the node when `None`.
    pub chain_id: Option<u64>,
    /// Upper bound on each adapter operation, including receipt wait.
    pub timeout: Duration,
    /// Confirmations to wait for.
    pub confirmations: usize,
    /// Receipt polling interval.
    pub poll_interval: Duration,
}

impl CompoundConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(
        rpc_url: impl Into<String>,
        private_key: Secret,
        wallet_address: impl Into<String>,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            private_key,
            wallet_address: wallet_address.into(),
            chain_id: None,
            timeout: Duration::from_secs(120),
            confirmations: 1,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Pin the chain ID.
    #[must_use]
    pub const fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Set the operation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the confirmation count.
    #[must_use]
    pub const fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }
}

impl From<&ChainConfig> for CompoundConfig {
    fn from(chain: &ChainConfig) -> Self {
        let mut config = Self::new(
            chain.rpc_url.trim(),
            chain.private_key.clone(),
            chain.wallet_address.trim(),
        )
        .with_timeout(Duration::from_secs(chain.request_timeout_secs))
        .with_confirmations(chain.confirmations.max(1));
        config.chain_id = chain.chain_id;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = CompoundConfig::new("http://localhost:8545", Secret::new("key"), "0xabc");
        assert_eq!(config.chain_id, None);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.confirmations, 1);
    }

    #[test]
    fn config_from_chain_config() {
        let chain = ChainConfig {
            rpc_url: " https://mainnet.example/v3/abc ".to_string(),
            private_key: Secret::new("key"),
            wallet_address: "0xabc".to_string(),
            chain_id: Some(1),
            request_timeout_secs: 45,
            confirmations: 0,
        };

        let config = CompoundConfig::from(&chain);
        assert_eq!(config.rpc_url, "https://mainnet.example/v3/abc");
        assert_eq!(config.chain_id, Some(1));
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.confirmations, 1);
    }

    #[test]
    fn debug_redacts_key() {
        let config = CompoundConfig::new("http://localhost:8545", Secret::new("0xsecret"), "0xabc");
        assert!(!format!("{config:?}").contains("0xsecret"));
    }
}
