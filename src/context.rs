/// Application context and dependency injection
use crate::{
    config::GatewayConfig,
    contract::RpcContractClient,
    error::{GatewayError, GatewayResult},
    registry::RestRegistry,
    resolver::Resolver,
};
use std::sync::Arc;
use std::time::Duration;

/// Application context holding the shared resolver and its configuration.
///
/// The resolver takes its registry and contract clients as trait objects,
/// so tests can swap in doubles without any of this wiring.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<GatewayConfig>,
    pub resolver: Arc<Resolver>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        config.validate()?;

        // One HTTP client for registry lookups; the timeout bounds each
        // external call so a hung registry cannot stall a resolution.
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("ensgate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.chain.call_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let registry = Arc::new(RestRegistry::new(http_client, &config.registry));
        let records = Arc::new(RpcContractClient::new(&config.chain)?);
        let resolver = Arc::new(Resolver::new(
            registry,
            records,
            config.chain.native_coin_type,
        ));

        Ok(Self {
            config: Arc::new(config),
            resolver,
        })
    }
}
