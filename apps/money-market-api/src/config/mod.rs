//! Configuration module for the money market API.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use money_market_api::config::load_config;
//!
//! // CONFIG_PATH, then ./config.yaml, then the built-in environment template
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod chain;
mod observability;
mod rates;
mod server;

use std::borrow::Cow;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use ethers::types::Address;
use serde::Deserialize;
use thiserror::Error;

pub use chain::{ChainConfig, Secret};
pub use observability::{LogFormat, LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use rates::RatesConfig;
pub use server::ServerConfig;

/// Config file read when neither an explicit path nor `CONFIG_PATH` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Built-in configuration used when no config file exists. Every value is
/// taken from the process environment.
pub const DEFAULT_CONFIG: &str = r#"
server:
  http_port: ${HTTP_PORT:-4000}
  bind_address: "${BIND_ADDRESS:-0.0.0.0}"

chain:
  rpc_url: "${RPC_URL:-${INFURA_URL}}"
  private_key: "${PRIVATE_KEY}"
  wallet_address: "${WALLET_ADDRESS}"
  chain_id: ${CHAIN_ID:-}
  request_timeout_secs: ${REQUEST_TIMEOUT_SECS:-120}
  confirmations: ${CONFIRMATIONS:-1}

rates:
  blocks_per_minute: ${BLOCKS_PER_MINUTE:-4}

observability:
  logging:
    level: "${LOG_LEVEL:-info}"
    format: "${LOG_FORMAT:-json}"
  metrics:
    enabled: ${METRICS_ENABLED:-false}
    port: ${METRICS_PORT:-9090}
"#;

/// Nested `${A:-${B}}` defaults resolve inside-out, one level per pass.
const MAX_INTERPOLATION_PASSES: usize = 4;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chain and signer configuration.
    pub chain: ChainConfig,
    /// Rate annualization configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration with environment variable interpolation.
///
/// Resolution order: `path`, then `CONFIG_PATH`, then `config.yaml` if it
/// exists, then [`DEFAULT_CONFIG`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let explicit = path
        .map(str::to_string)
        .or_else(|| std::env::var("CONFIG_PATH").ok().filter(|p| !p.is_empty()));

    let contents = match explicit {
        Some(path) => read_config_file(&path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => read_config_file(DEFAULT_CONFIG_PATH)?,
        None => {
            tracing::debug!("No config file found, using environment template");
            DEFAULT_CONFIG.to_string()
        }
    };

    load_config_from_string(&contents)
}

fn read_config_file(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports `${VAR}` and `${VAR:-default}`. A default may itself be a
/// `${VAR}` reference. Unset or empty variables without a default become
/// empty strings.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    // Defaults may not contain `$`, so the innermost reference matches first.
    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}$]*))?\}")
            .expect("env var regex is valid")
    });

    let mut result = input.to_string();
    for _ in 0..MAX_INTERPOLATION_PASSES {
        let next = match re.replace_all(&result, |cap: &regex::Captures<'_>| {
            let default_value = cap.get(2).map_or("", |m| m.as_str());
            match std::env::var(&cap[1]) {
                Ok(v) if !v.is_empty() => v,
                _ => default_value.to_string(),
            }
        }) {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => next,
        };
        result = next;
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let chain = &config.chain;

    let rpc_url = chain.rpc_url.trim();
    if rpc_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "chain.rpc_url is empty (set RPC_URL or INFURA_URL)".to_string(),
        ));
    }
    if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(
            "chain.rpc_url must be an http(s) URL".to_string(),
        ));
    }

    if chain.private_key.is_blank() {
        return Err(ConfigError::ValidationError(
            "chain.private_key is empty (set PRIVATE_KEY)".to_string(),
        ));
    }

    if chain.wallet_address.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "chain.wallet_address is empty (set WALLET_ADDRESS)".to_string(),
        ));
    }
    if Address::from_str(chain.wallet_address.trim()).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "chain.wallet_address '{}' is not a valid address",
            chain.wallet_address
        )));
    }

    if chain.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "chain.request_timeout_secs must be positive".to_string(),
        ));
    }

    if config.rates.blocks_per_minute == 0 {
        return Err(ConfigError::ValidationError(
            "rates.blocks_per_minute must be positive".to_string(),
        ));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.port == config.server.http_port {
        return Err(ConfigError::ValidationError(
            "observability.metrics.port and server.http_port must be different".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn chain_yaml(extra: &str) -> String {
        format!(
            r#"
chain:
  rpc_url: "http://localhost:8545"
  private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
  wallet_address: "{WALLET}"
{extra}
"#
        )
    }

    fn expect_validation_error(yaml: &str, needle: &str) {
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected validation error containing {needle:?}");
        };
        assert!(err.to_string().contains(needle), "got: {err}");
    }

    #[test]
    fn test_load_minimal_config() {
        let config = match load_config_from_string(&chain_yaml("")) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };

        assert_eq!(config.server.http_port, 4000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.chain.chain_id, None);
        assert_eq!(config.chain.request_timeout_secs, 120);
        assert_eq!(config.rates.blocks_per_minute, 4);
        assert_eq!(config.rates.cadence().blocks_per_year(), 2_102_400);
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(!config.observability.metrics.enabled);
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = format!(
            "{}{}",
            chain_yaml("  chain_id: 11155111\n  request_timeout_secs: 30\n  confirmations: 2"),
            r#"
server:
  http_port: 8080
  bind_address: "127.0.0.1"

rates:
  blocks_per_minute: 5

observability:
  logging:
    level: "debug"
    format: "pretty"
  metrics:
    enabled: true
    port: 9100
"#
        );

        let config = match load_config_from_string(&yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.chain.chain_id, Some(11_155_111));
        assert_eq!(config.chain.request_timeout_secs, 30);
        assert_eq!(config.chain.confirmations, 2);
        assert_eq!(config.rates.blocks_per_minute, 5);
        assert_eq!(config.observability.logging.level, "debug");
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert!(config.observability.metrics.enabled);
        assert_eq!(config.observability.metrics.port, 9100);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "port: ${MONEY_MARKET_TEST_NONEXISTENT_VAR:-4000}";
        assert_eq!(interpolate_env_vars(input), "port: 4000");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let result = interpolate_env_vars("path: ${PATH:-default}");
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "key: ${MONEY_MARKET_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "key: ");
    }

    #[test]
    fn test_nested_default_falls_through_to_second_var() {
        let input = "url: ${MONEY_MARKET_TEST_MISSING_A:-${MONEY_MARKET_TEST_MISSING_B:-fallback}}";
        assert_eq!(interpolate_env_vars(input), "url: fallback");
    }

    #[test]
    #[allow(clippy::literal_string_with_formatting_args)]
    fn test_nested_default_resolves_existing_inner_var() {
        let input = "home: ${MONEY_MARKET_TEST_MISSING_A:-${PATH}}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "home: ");
        assert!(!result.contains("${"));
    }

    #[test]
    fn test_default_template_without_env_fails_validation() {
        // RPC_URL / INFURA_URL are not expected in the test environment.
        if std::env::var_os("RPC_URL").is_some() || std::env::var_os("INFURA_URL").is_some() {
            return;
        }
        let Err(err) = load_config_from_string(DEFAULT_CONFIG) else {
            panic!("expected missing RPC URL to fail validation");
        };
        assert!(err.to_string().contains("rpc_url"));
    }

    #[test]
    fn test_validation_non_http_rpc_url() {
        let yaml = chain_yaml("").replace("http://localhost:8545", "ws://localhost:8546");
        expect_validation_error(&yaml, "http(s) URL");
    }

    #[test]
    fn test_validation_empty_private_key() {
        let yaml = chain_yaml("").replace(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            "",
        );
        expect_validation_error(&yaml, "PRIVATE_KEY");
    }

    #[test]
    fn test_validation_invalid_wallet_address() {
        let yaml = chain_yaml("").replace(WALLET, "0x1234");
        expect_validation_error(&yaml, "not a valid address");
    }

    #[test]
    fn test_validation_zero_timeout() {
        expect_validation_error(
            &chain_yaml("  request_timeout_secs: 0"),
            "request_timeout_secs",
        );
    }

    #[test]
    fn test_validation_zero_blocks_per_minute() {
        let yaml = format!("{}\nrates:\n  blocks_per_minute: 0\n", chain_yaml(""));
        expect_validation_error(&yaml, "blocks_per_minute");
    }

    #[test]
    fn test_validation_metrics_port_collision() {
        let yaml = format!(
            "{}\nobservability:\n  metrics:\n    enabled: true\n    port: 4000\n",
            chain_yaml("")
        );
        expect_validation_error(&yaml, "must be different");
    }

    #[test]
    fn test_unknown_log_format_is_parse_error() {
        let yaml = format!(
            "{}\nobservability:\n  logging:\n    format: \"xml\"\n",
            chain_yaml("")
        );
        assert!(matches!(
            load_config_from_string(&yaml),
            Err(ConfigError::ParseError(_))
        ));
    }
}
