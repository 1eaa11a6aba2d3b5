/// Configuration management for the ensgate gateway core
use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub service: ServiceConfig,
    pub registry: RegistryConfig,
    pub chain: ChainConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Business registry configuration (external REST store mapping
/// ENS business domains to deployed contract addresses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
}

/// Chain RPC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// The single coin type this resolver serves (60 = ETH); address
    /// queries for any other coin type get the zero address.
    pub native_coin_type: u64,
    pub call_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> GatewayResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("ENSGATE_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("ENSGATE_PORT")
            .unwrap_or_else(|_| "8787".to_string())
            .parse()
            .map_err(|_| GatewayError::Config("Invalid port number".to_string()))?;

        let registry_url = env::var("ENSGATE_REGISTRY_URL")
            .map_err(|_| GatewayError::Config("Registry URL required".to_string()))?;
        let registry_api_key = env::var("ENSGATE_REGISTRY_API_KEY")
            .map_err(|_| GatewayError::Config("Registry API key required".to_string()))?;
        let registry_table =
            env::var("ENSGATE_REGISTRY_TABLE").unwrap_or_else(|_| "businesses".to_string());

        let rpc_url = env::var("ENSGATE_CHAIN_RPC_URL")
            .unwrap_or_else(|_| "https://sepolia-rollup.arbitrum.io/rpc".to_string());
        let native_coin_type = env::var("ENSGATE_NATIVE_COIN_TYPE")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| GatewayError::Config("Invalid native coin type".to_string()))?;
        let call_timeout_secs = env::var("ENSGATE_CALL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(GatewayConfig {
            service: ServiceConfig { hostname, port },
            registry: RegistryConfig {
                url: registry_url,
                api_key: registry_api_key,
                table: registry_table,
            },
            chain: ChainConfig {
                rpc_url,
                native_coin_type,
                call_timeout_secs,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> GatewayResult<()> {
        if self.service.hostname.is_empty() {
            return Err(GatewayError::Config("Hostname cannot be empty".to_string()));
        }

        if !self.registry.url.starts_with("http") {
            return Err(GatewayError::Config(
                "Registry URL must be an http(s) endpoint".to_string(),
            ));
        }

        if self.chain.call_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "External call timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}
