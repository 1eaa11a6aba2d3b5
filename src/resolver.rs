/// Resolution orchestrator
///
/// Composes the name parser, registry client and contract client into the
/// three record operations a CCIP-Read gateway needs: `addr`, `text` and
/// `contenthash`. Every operation is total: each failure stage collapses
/// to its sentinel value (zero address / empty string / empty hash) with
/// the same advisory TTL, so the gateway always has a well-formed answer
/// to sign. Which stage failed is logged here, never surfaced.
use crate::{
    contract::{UserRecord, UserRecordSource},
    name::{self, ParsedName},
    registry::BusinessRegistry,
};
use alloy::primitives::Address;
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Advisory cache lifetime attached to every response, success or failure.
pub const RECORD_TTL_SECS: u64 = 300;

/// "No content hash" sentinel: a zero-length hex payload.
pub const EMPTY_CONTENT_HASH: &str = "0x";

/// Address record response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddrResponse {
    pub addr: String,
    pub ttl: u64,
}

/// Text record response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub value: String,
    pub ttl: u64,
}

/// Content hash record response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContenthashResponse {
    pub contenthash: String,
    pub ttl: u64,
}

/// Recognized text record keys. Anything else resolves to an empty value
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextKey {
    Email,
    Points,
    Joined,
    Business,
    Contract,
    Unknown,
}

impl TextKey {
    fn parse(key: &str) -> Self {
        match key.to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "points" => Self::Points,
            "joined" => Self::Joined,
            "business" => Self::Business,
            "contract" => Self::Contract,
            _ => Self::Unknown,
        }
    }
}

/// Why a resolution produced the sentinel instead of a record. Logged for
/// diagnostics only; callers see a uniform "no record" answer.
enum LookupFailure {
    MalformedName,
    BusinessNotRegistered,
    UserNotFound,
    UnsupportedAssetType(u64),
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedName => write!(f, "malformed name"),
            Self::BusinessNotRegistered => write!(f, "business not registered"),
            Self::UserNotFound => write!(f, "user not found"),
            Self::UnsupportedAssetType(coin_type) => {
                write!(f, "unsupported coin type {}", coin_type)
            }
        }
    }
}

/// Result of the shared three-stage lookup.
struct Lookup {
    parsed: ParsedName,
    contract_address: Address,
    record: UserRecord,
}

/// The resolver owns no state beyond its injected clients; concurrent
/// calls share nothing mutable.
pub struct Resolver {
    registry: Arc<dyn BusinessRegistry>,
    records: Arc<dyn UserRecordSource>,
    native_coin_type: u64,
}

impl Resolver {
    pub fn new(
        registry: Arc<dyn BusinessRegistry>,
        records: Arc<dyn UserRecordSource>,
        native_coin_type: u64,
    ) -> Self {
        Self {
            registry,
            records,
            native_coin_type,
        }
    }

    /// Parse the name, resolve the business contract, fetch the user
    /// record. Each stage maps its own failure mode.
    async fn lookup(&self, name: &str) -> Result<Lookup, LookupFailure> {
        let parsed = name::parse(name).ok_or(LookupFailure::MalformedName)?;

        let contract_address = self
            .registry
            .lookup_contract(&parsed.business_domain)
            .await
            .ok_or(LookupFailure::BusinessNotRegistered)?;

        let record = self
            .records
            .fetch_user_record(contract_address, name)
            .await
            .ok_or(LookupFailure::UserNotFound)?;

        Ok(Lookup {
            parsed,
            contract_address,
            record,
        })
    }

    /// Resolve an address record. Only the chain-native coin type is
    /// supported; everything else gets the zero address.
    pub async fn addr(&self, name: &str, coin_type: u64) -> AddrResponse {
        debug!("Looking up address for {} (coinType {})", name, coin_type);

        let outcome = self.lookup(name).await.and_then(|lookup| {
            if coin_type == self.native_coin_type {
                Ok(lookup)
            } else {
                Err(LookupFailure::UnsupportedAssetType(coin_type))
            }
        });

        match outcome {
            Ok(lookup) => {
                debug!("Resolved address for {}: {}", name, lookup.record.address);
                AddrResponse {
                    addr: lookup.record.address.to_string(),
                    ttl: RECORD_TTL_SECS,
                }
            }
            Err(failure) => {
                debug!("No address for {}: {}", name, failure);
                AddrResponse {
                    addr: Address::ZERO.to_string(),
                    ttl: RECORD_TTL_SECS,
                }
            }
        }
    }

    /// Resolve a text record. Unknown keys are empty values, not errors.
    pub async fn text(&self, name: &str, key: &str) -> TextResponse {
        debug!("Looking up text record for {} key {}", name, key);

        let lookup = match self.lookup(name).await {
            Ok(lookup) => lookup,
            Err(failure) => {
                debug!("No text record for {}: {}", name, failure);
                return TextResponse {
                    value: String::new(),
                    ttl: RECORD_TTL_SECS,
                };
            }
        };

        let value = match TextKey::parse(key) {
            // No email is stored on-chain yet.
            TextKey::Email => String::new(),
            TextKey::Points => lookup.record.total_points.to_string(),
            TextKey::Joined => format_joined(lookup.record.joined_at),
            TextKey::Business => lookup.parsed.business_domain,
            TextKey::Contract => lookup.contract_address.to_string(),
            TextKey::Unknown => String::new(),
        };

        TextResponse {
            value,
            ttl: RECORD_TTL_SECS,
        }
    }

    /// Content hash resolution is not implemented: the contract with
    /// callers is "empty, not an error". No external calls are made.
    pub async fn contenthash(&self, name: &str) -> ContenthashResponse {
        debug!("Looking up content hash for {} (stubbed)", name);

        ContenthashResponse {
            contenthash: EMPTY_CONTENT_HASH.to_string(),
            ttl: RECORD_TTL_SECS,
        }
    }
}

/// ISO-8601 rendering of the on-chain join timestamp (unix seconds).
/// Out-of-range values render as an empty string.
fn format_joined(joined_at: u64) -> String {
    i64::try_from(joined_at)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ETH_COIN_TYPE: u64 = 60;

    fn contract_address() -> Address {
        "0x1111111111111111111111111111111111111111"
            .parse()
            .unwrap()
    }

    fn user_address() -> Address {
        "0x2222222222222222222222222222222222222222"
            .parse()
            .unwrap()
    }

    struct StaticRegistry {
        entries: HashMap<String, Address>,
        calls: AtomicUsize,
    }

    impl StaticRegistry {
        fn with(entries: &[(&str, Address)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BusinessRegistry for StaticRegistry {
        async fn lookup_contract(&self, business_domain: &str) -> Option<Address> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entries.get(business_domain).copied()
        }
    }

    struct StaticRecords {
        records: HashMap<String, UserRecord>,
        calls: AtomicUsize,
    }

    impl StaticRecords {
        fn with(records: &[(&str, UserRecord)]) -> Self {
            Self {
                records: records
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self::with(&[])
        }
    }

    #[async_trait]
    impl UserRecordSource for StaticRecords {
        async fn fetch_user_record(
            &self,
            _contract_address: Address,
            full_name: &str,
        ) -> Option<UserRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.get(full_name).cloned()
        }
    }

    fn sarah_record() -> UserRecord {
        UserRecord {
            address: user_address(),
            total_points: 420,
            joined_at: 1_700_000_000,
        }
    }

    /// Registry maps joescoffee.eth, contract knows sarah.joescoffee.eth.
    fn populated_resolver() -> (Resolver, Arc<StaticRegistry>, Arc<StaticRecords>) {
        let registry = Arc::new(StaticRegistry::with(&[(
            "joescoffee.eth",
            contract_address(),
        )]));
        let records = Arc::new(StaticRecords::with(&[(
            "sarah.joescoffee.eth",
            sarah_record(),
        )]));
        let resolver = Resolver::new(registry.clone(), records.clone(), ETH_COIN_TYPE);
        (resolver, registry, records)
    }

    #[tokio::test]
    async fn addr_resolves_known_user() {
        let (resolver, _, _) = populated_resolver();

        let response = resolver.addr("sarah.joescoffee.eth", ETH_COIN_TYPE).await;
        assert_eq!(response.addr, user_address().to_string());
        assert_eq!(response.ttl, RECORD_TTL_SECS);
    }

    #[tokio::test]
    async fn addr_returns_zero_for_dotless_name() {
        let (resolver, registry, records) = populated_resolver();

        let response = resolver.addr("nodots", ETH_COIN_TYPE).await;
        assert_eq!(response.addr, Address::ZERO.to_string());
        assert_eq!(response.ttl, RECORD_TTL_SECS);
        // Malformed names never reach the backends.
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
        assert_eq!(records.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn addr_returns_zero_for_unregistered_business() {
        let registry = Arc::new(StaticRegistry::with(&[]));
        let records = Arc::new(StaticRecords::with(&[(
            "sarah.joescoffee.eth",
            sarah_record(),
        )]));
        let resolver = Resolver::new(registry, records.clone(), ETH_COIN_TYPE);

        let response = resolver.addr("sarah.joescoffee.eth", ETH_COIN_TYPE).await;
        assert_eq!(response.addr, Address::ZERO.to_string());
        assert_eq!(response.ttl, RECORD_TTL_SECS);
        // Without a contract address there is nothing to call.
        assert_eq!(records.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn addr_returns_zero_for_unknown_user() {
        let registry = Arc::new(StaticRegistry::with(&[(
            "joescoffee.eth",
            contract_address(),
        )]));
        let records = Arc::new(StaticRecords::empty());
        let resolver = Resolver::new(registry, records, ETH_COIN_TYPE);

        let response = resolver.addr("bob.joescoffee.eth", ETH_COIN_TYPE).await;
        assert_eq!(response.addr, Address::ZERO.to_string());
        assert_eq!(response.ttl, RECORD_TTL_SECS);
    }

    #[tokio::test]
    async fn addr_rejects_non_native_coin_types() {
        let (resolver, _, _) = populated_resolver();

        // Record exists, but only the native coin type is served.
        for coin_type in [0u64, 61, 2147483648] {
            let response = resolver.addr("sarah.joescoffee.eth", coin_type).await;
            assert_eq!(response.addr, Address::ZERO.to_string());
            assert_eq!(response.ttl, RECORD_TTL_SECS);
        }
    }

    #[tokio::test]
    async fn text_points_is_the_decimal_total() {
        let (resolver, _, _) = populated_resolver();

        let response = resolver.text("sarah.joescoffee.eth", "points").await;
        assert_eq!(response.value, "420");
        assert_eq!(response.ttl, RECORD_TTL_SECS);
    }

    #[tokio::test]
    async fn text_email_is_always_empty() {
        let (resolver, _, _) = populated_resolver();

        let response = resolver.text("sarah.joescoffee.eth", "email").await;
        assert_eq!(response.value, "");
        assert_eq!(response.ttl, RECORD_TTL_SECS);
    }

    #[tokio::test]
    async fn text_joined_is_iso8601() {
        let (resolver, _, _) = populated_resolver();

        let response = resolver.text("sarah.joescoffee.eth", "joined").await;
        let parsed = DateTime::parse_from_rfc3339(&response.value).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn text_business_and_contract_keys() {
        let (resolver, _, _) = populated_resolver();

        let business = resolver.text("sarah.joescoffee.eth", "business").await;
        assert_eq!(business.value, "joescoffee.eth");

        let contract = resolver.text("sarah.joescoffee.eth", "contract").await;
        assert_eq!(contract.value, contract_address().to_string());
    }

    #[tokio::test]
    async fn text_keys_are_case_insensitive() {
        let (resolver, _, _) = populated_resolver();

        let response = resolver.text("sarah.joescoffee.eth", "POINTS").await;
        assert_eq!(response.value, "420");
    }

    #[tokio::test]
    async fn text_unknown_key_is_empty_not_an_error() {
        let (resolver, _, _) = populated_resolver();

        let response = resolver.text("sarah.joescoffee.eth", "avatar").await;
        assert_eq!(response.value, "");
        assert_eq!(response.ttl, RECORD_TTL_SECS);
    }

    #[tokio::test]
    async fn text_failure_stages_return_empty_value() {
        let (resolver, _, _) = populated_resolver();

        for name in ["nodots", "bob.unknownshop.eth", "bob.joescoffee.eth"] {
            let response = resolver.text(name, "points").await;
            assert_eq!(response.value, "");
            assert_eq!(response.ttl, RECORD_TTL_SECS);
        }
    }

    #[tokio::test]
    async fn contenthash_is_stubbed_with_no_external_calls() {
        let (resolver, registry, records) = populated_resolver();

        let response = resolver.contenthash("sarah.joescoffee.eth").await;
        assert_eq!(response.contenthash, EMPTY_CONTENT_HASH);
        assert_eq!(response.ttl, RECORD_TTL_SECS);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
        assert_eq!(records.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn operations_are_idempotent() {
        let (resolver, _, _) = populated_resolver();

        let first = resolver.addr("sarah.joescoffee.eth", ETH_COIN_TYPE).await;
        let second = resolver.addr("sarah.joescoffee.eth", ETH_COIN_TYPE).await;
        assert_eq!(first, second);

        let first = resolver.text("sarah.joescoffee.eth", "joined").await;
        let second = resolver.text("sarah.joescoffee.eth", "joined").await;
        assert_eq!(first, second);
    }

    #[test]
    fn joined_rendering_round_trips_epoch_seconds() {
        let rendered = format_joined(0);
        assert_eq!(rendered, "1970-01-01T00:00:00.000Z");

        let rendered = format_joined(1_700_000_000);
        let parsed = DateTime::parse_from_rfc3339(&rendered).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }
}
