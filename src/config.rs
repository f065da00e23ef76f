//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides. The
//! loaded configuration is static for the life of the process.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::contract::Address;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub rpc: RpcConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target chain and fund contract
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub contract_address: Address,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "default_chain_name")]
    pub chain_name: String,

    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    #[serde(default)]
    pub native_currency: NativeCurrencyConfig,
}

fn default_chain_id() -> u64 {
    11_155_111 // Sepolia
}

fn default_chain_name() -> String {
    "Sepolia".to_string()
}

fn default_rpc_url() -> String {
    "https://rpc.sepolia.org".to_string()
}

fn default_explorer_url() -> String {
    "https://sepolia.etherscan.io".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            contract_address: Address::ZERO,
            chain_id: default_chain_id(),
            chain_name: default_chain_name(),
            rpc_url: default_rpc_url(),
            explorer_url: default_explorer_url(),
            native_currency: NativeCurrencyConfig::default(),
        }
    }
}

/// Native currency advertised when registering the chain with a wallet
#[derive(Debug, Clone, Deserialize)]
pub struct NativeCurrencyConfig {
    #[serde(default = "default_currency_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    #[serde(default = "default_currency_decimals")]
    pub decimals: u8,
}

fn default_currency_name() -> String {
    "Sepolia Ether".to_string()
}

fn default_currency_symbol() -> String {
    "ETH".to_string()
}

fn default_currency_decimals() -> u8 {
    18
}

impl Default for NativeCurrencyConfig {
    fn default() -> Self {
        Self {
            name: default_currency_name(),
            symbol: default_currency_symbol(),
            decimals: default_currency_decimals(),
        }
    }
}

/// RPC client behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Maximum in-flight NAV history reads
    #[serde(default = "default_history_concurrency")]
    pub history_concurrency: usize,
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_history_concurrency() -> usize {
    4
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout(),
            history_concurrency: default_history_concurrency(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("fundview").join("config.toml")),
            Some(PathBuf::from("/etc/fundview/config.toml")),
            Some(PathBuf::from("./fundview.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Reject configurations the dashboard cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.contract_address.is_zero() {
            return Err(ConfigError::Invalid(
                "network.contract_address must be set".to_string(),
            ));
        }
        if self.network.chain_id == 0 {
            return Err(ConfigError::Invalid("network.chain_id must be non-zero".to_string()));
        }
        if self.network.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("network.rpc_url must be set".to_string()));
        }
        if self.rpc.history_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "rpc.history_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Network overrides
        if let Ok(address) = std::env::var("FUNDVIEW_CONTRACT_ADDRESS") {
            match address.parse() {
                Ok(a) => self.network.contract_address = a,
                Err(e) => tracing::warn!("Ignoring FUNDVIEW_CONTRACT_ADDRESS: {}", e),
            }
        }
        if let Ok(chain_id) = std::env::var("FUNDVIEW_CHAIN_ID") {
            if let Ok(id) = chain_id.parse() {
                self.network.chain_id = id;
            }
        }
        if let Ok(url) = std::env::var("FUNDVIEW_RPC_URL") {
            self.network.rpc_url = url;
        }
        if let Ok(url) = std::env::var("FUNDVIEW_EXPLORER_URL") {
            self.network.explorer_url = url;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("FUNDVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FUNDVIEW_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl NetworkConfig {
    /// Block explorer page for an address
    pub fn explorer_address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.explorer_url.trim_end_matches('/'), address)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Fundview Configuration
#
# Environment variables override these settings:
# - FUNDVIEW_CONTRACT_ADDRESS
# - FUNDVIEW_CHAIN_ID
# - FUNDVIEW_RPC_URL
# - FUNDVIEW_EXPLORER_URL
# - FUNDVIEW_LOG_LEVEL
# - FUNDVIEW_LOG_FORMAT

[network]
# Fund contract address (required)
contract_address = "0x0000000000000000000000000000000000000000"

# Chain the contract is deployed on
chain_id = 11155111
chain_name = "Sepolia"

# JSON-RPC endpoint
rpc_url = "https://rpc.sepolia.org"

# Block explorer base URL
explorer_url = "https://sepolia.etherscan.io"

[network.native_currency]
name = "Sepolia Ether"
symbol = "ETH"
decimals = 18

[rpc]
# Request timeout in milliseconds
request_timeout_ms = 10000

# Maximum concurrent NAV history reads (1 = sequential)
history_concurrency = 4

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network.chain_id, 11_155_111);
        assert_eq!(config.rpc.history_concurrency, 4);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.network.contract_address.is_zero());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.network.chain_name, "Sepolia");
        assert_eq!(config.rpc.request_timeout_ms, 10_000);
        assert_eq!(config.network.native_currency.decimals, 18);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[network]
contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
chain_id = 31337
rpc_url = "http://127.0.0.1:8545"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.network.chain_id, 31_337);
        assert_eq!(
            config.network.contract_address.to_string(),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
        // Unspecified sections fall back to defaults
        assert_eq!(config.rpc.history_concurrency, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_address_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\ncontract_address = \"0x1234\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/fundview.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.network.contract_address =
            "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        assert!(config.validate().is_ok());

        config.rpc.history_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explorer_url() {
        let mut network = NetworkConfig::default();
        network.explorer_url = "https://sepolia.etherscan.io/".to_string();
        let addr: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        assert_eq!(
            network.explorer_address_url(&addr),
            "https://sepolia.etherscan.io/address/0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
    }
}
