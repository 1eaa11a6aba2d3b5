/// Business contract client
///
/// Each registered business deploys a contract exposing
/// `getUserByENSName`, keyed by the full dotted ENS name. This client
/// performs the single read-only call per resolution and maps every
/// failure (RPC error, revert, timeout, zero user address) to `None`.
use crate::{
    config::ChainConfig,
    error::{GatewayError, GatewayResult},
};
use alloy::{
    primitives::Address,
    providers::RootProvider,
    sol,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

sol! {
    /// Per-business user records contract.
    #[sol(rpc)]
    contract BusinessContract {
        function getUserByENSName(string memory _ensName) external view
            returns (address userAddress, uint256 totalPoints, string memory ensName, uint256 joinedAt);
    }
}

/// A user record read from a business contract.
///
/// Numeric fields are the raw on-chain integers; formatting (decimal
/// strings, ISO timestamps) is the resolver's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub address: Address,
    pub total_points: u64,
    pub joined_at: u64,
}

/// Read seam between the orchestrator and the chain.
///
/// Implementations must be no-throw: any call failure is `None`.
#[async_trait]
pub trait UserRecordSource: Send + Sync {
    async fn fetch_user_record(&self, contract_address: Address, full_name: &str)
        -> Option<UserRecord>;
}

/// Contract client backed by a fixed JSON-RPC endpoint.
pub struct RpcContractClient {
    provider: RootProvider<Http<Client>>,
    call_timeout: Duration,
}

impl RpcContractClient {
    pub fn new(config: &ChainConfig) -> GatewayResult<Self> {
        let url = config
            .rpc_url
            .parse()
            .map_err(|e| GatewayError::Config(format!("Invalid chain RPC URL: {}", e)))?;

        Ok(Self {
            provider: RootProvider::new_http(url),
            call_timeout: Duration::from_secs(config.call_timeout_secs),
        })
    }
}

#[async_trait]
impl UserRecordSource for RpcContractClient {
    async fn fetch_user_record(
        &self,
        contract_address: Address,
        full_name: &str,
    ) -> Option<UserRecord> {
        let contract = BusinessContract::new(contract_address, self.provider.clone());
        let call_builder = contract.getUserByENSName(full_name.to_string());
        let call = call_builder.call();

        let result = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!("Contract call failed for {}: {}", full_name, e);
                return None;
            }
            Err(_) => {
                warn!(
                    "Contract call timed out for {} after {:?}",
                    full_name, self.call_timeout
                );
                return None;
            }
        };

        if result.userAddress == Address::ZERO {
            debug!("No user record on-chain for {}", full_name);
            return None;
        }

        Some(UserRecord {
            address: result.userAddress,
            total_points: result.totalPoints.saturating_to(),
            joined_at: result.joinedAt.saturating_to(),
        })
    }
}
