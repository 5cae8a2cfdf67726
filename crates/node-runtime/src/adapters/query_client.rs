//! HTTP adapter for the on-chain query capability.
//!
//! Implements the application, account, and supplier querier ports over a
//! REST endpoint. Lookups are single-shot; retry policy is the caller's.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use rm_02_ring_signing::{AccountQuerier, ApplicationQuerier};
use rm_04_relay_proxy::SupplierQuerier;
use shared_types::{
    AccountAddress, AccountRecord, ApplicationRecord, KeyType, QueryError, SupplierRecord,
};

/// REST-backed query client.
pub struct HttpQueryClient {
    client: Client,
    base_url: String,
}

/// Account lookup response: the public key travels hex-encoded.
#[derive(Debug, Deserialize)]
struct AccountDto {
    address: AccountAddress,
    public_key_hex: String,
    key_type: KeyType,
}

impl HttpQueryClient {
    /// A client against `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        kind: &'static str,
        address: &AccountAddress,
    ) -> Result<T, QueryError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(QueryError::NotFound {
                kind,
                address: address.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(QueryError::Transport(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))
    }
}

#[async_trait]
impl ApplicationQuerier for HttpQueryClient {
    async fn application(
        &self,
        address: &AccountAddress,
    ) -> Result<ApplicationRecord, QueryError> {
        self.get_json(
            &format!("v1/applications/{address}"),
            "application",
            address,
        )
        .await
    }
}

#[async_trait]
impl AccountQuerier for HttpQueryClient {
    async fn account(&self, address: &AccountAddress) -> Result<AccountRecord, QueryError> {
        let dto: AccountDto = self
            .get_json(&format!("v1/accounts/{address}"), "account", address)
            .await?;

        let public_key = hex::decode(&dto.public_key_hex).map_err(|err| {
            QueryError::Transport(format!("undecodable public key for {address}: {err}"))
        })?;

        Ok(AccountRecord {
            address: dto.address,
            public_key,
            key_type: dto.key_type,
        })
    }
}

#[async_trait]
impl SupplierQuerier for HttpQueryClient {
    async fn supplier(&self, address: &AccountAddress) -> Result<SupplierRecord, QueryError> {
        self.get_json(&format!("v1/suppliers/{address}"), "supplier", address)
            .await
    }
}
