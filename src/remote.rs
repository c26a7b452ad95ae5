//! REST client for a remote storefront's catalog endpoints.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::aggregates::Product;
use crate::domain::catalog::loader::{CatalogError, CatalogSource};
use crate::domain::catalog::LegacyCatalog;

/// Reads `/api/data` and `/api/products/:id` from another instance. No retries
/// and no timeout beyond the HTTP client's own.
#[derive(Clone, Debug)]
pub struct RemoteCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

impl CatalogSource for RemoteCatalog {
    async fn global_catalog(&self) -> Result<LegacyCatalog, CatalogError> {
        fetch(&self.client, &format!("{}/api/data", self.base_url)).await
    }

    async fn product(&self, id: Uuid) -> Result<Product, CatalogError> {
        fetch(&self.client, &format!("{}/api/products/{id}", self.base_url)).await.map_err(|e| match e {
            CatalogError::Status(404) => CatalogError::NotFound(id),
            other => other,
        })
    }
}

async fn fetch<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, CatalogError> {
    let response = client.get(url).send().await.map_err(|e| CatalogError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status(status.as_u16()));
    }
    response.json::<T>().await.map_err(|e| CatalogError::Malformed(e.to_string()))
}
