/// Business registry client
///
/// Resolves a business domain (e.g. "joescoffee.eth") to the address of
/// the contract holding that business's user records. The registry is an
/// external PostgREST-style store; this client issues one point query per
/// lookup and collapses every failure to `None`; the orchestrator relies
/// on this never returning an error.
use crate::config::RegistryConfig;
use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Lookup seam between the orchestrator and the external registry.
///
/// Implementations must be no-throw: any query error, missing row, or
/// unparseable address field is `None`.
#[async_trait]
pub trait BusinessRegistry: Send + Sync {
    async fn lookup_contract(&self, business_domain: &str) -> Option<Address>;
}

/// Row shape returned by the registry's REST endpoint.
#[derive(Debug, Deserialize)]
struct BusinessRow {
    smart_contract_address: Option<String>,
}

/// Registry client backed by the registry's REST endpoint.
pub struct RestRegistry {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestRegistry {
    pub fn new(http_client: reqwest::Client, config: &RegistryConfig) -> Self {
        Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
        }
    }

    /// Fetch the contract-address column for an exact business-domain
    /// match, skipping rows where the contract has not been deployed yet.
    async fn query_rows(&self, business_domain: &str) -> reqwest::Result<Vec<BusinessRow>> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let domain_filter = format!("eq.{}", business_domain);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[
                ("select", "smart_contract_address"),
                ("ens_domain", domain_filter.as_str()),
                ("smart_contract_address", "not.is.null"),
                ("limit", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        response.json().await
    }
}

#[async_trait]
impl BusinessRegistry for RestRegistry {
    async fn lookup_contract(&self, business_domain: &str) -> Option<Address> {
        let rows = match self.query_rows(business_domain).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Registry query failed for {}: {}", business_domain, e);
                return None;
            }
        };

        let raw = match rows.into_iter().next().and_then(|r| r.smart_contract_address) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                debug!("Business domain not registered: {}", business_domain);
                return None;
            }
        };

        match raw.parse::<Address>() {
            Ok(address) => {
                debug!("Found contract for {}: {}", business_domain, address);
                Some(address)
            }
            Err(e) => {
                warn!(
                    "Registry returned malformed address for {}: {} ({})",
                    business_domain, raw, e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_registry_rows() {
        let body = r#"[{"smart_contract_address":"0x1111111111111111111111111111111111111111"}]"#;
        let rows: Vec<BusinessRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 1);

        let raw = rows[0].smart_contract_address.as_deref().unwrap();
        assert!(raw.parse::<Address>().is_ok());
    }

    #[test]
    fn tolerates_null_address_column() {
        // PostgREST can hand back explicit nulls even with the not-null
        // filter applied; a null column must read as "not registered".
        let body = r#"[{"smart_contract_address":null}]"#;
        let rows: Vec<BusinessRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows[0].smart_contract_address, None);
    }
}
