//! Chain connection and signer configuration.

use std::fmt;

use serde::Deserialize;

/// A string that must never reach logs.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the value is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Chain configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of an Ethereum node.
    pub rpc_url: String,
    /// Hex-encoded secp256k1 key that signs transactions.
    pub private_key: Secret,
    /// Address of the signing account.
    pub wallet_address: String,
    /// Chain ID used for EIP-155 signing. Queried from the node when unset.
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Upper bound on any single external call, including receipt wait.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Confirmations to wait for before a transaction counts as mined.
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
}

pub(crate) const fn default_request_timeout_secs() -> u64 {
    120
}

const fn default_confirmations() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::new("0xdeadbeef");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose(), "0xdeadbeef");
    }

    #[test]
    fn chain_config_debug_hides_key() {
        let config = ChainConfig {
            rpc_url: "http://localhost:8545".to_string(),
            private_key: Secret::new("0xdeadbeef"),
            wallet_address: "0x0".to_string(),
            chain_id: None,
            request_timeout_secs: default_request_timeout_secs(),
            confirmations: 1,
        };
        assert!(!format!("{config:?}").contains("deadbeef"));
    }
}
