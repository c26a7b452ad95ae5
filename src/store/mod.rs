//! Persistence: Postgres when `DATABASE_URL` is set, memory otherwise.

pub mod memory;
pub mod postgres;

use uuid::Uuid;

use crate::config::Config;
use crate::domain::aggregates::{Order, PbrFabric, Product};
use crate::domain::catalog::loader::{CatalogError, CatalogSource};
use crate::domain::catalog::LegacyCatalog;
use crate::{Result, TailorError};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl Store {
    pub async fn from_config(config: &Config) -> Result<Self> {
        match &config.database_url {
            Some(url) => Ok(Self::Postgres(PgStore::connect(url, config.database_max_connections).await?)),
            None => {
                tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
                Ok(Self::Memory(MemoryStore::new()))
            }
        }
    }

    pub fn in_memory() -> Self { Self::Memory(MemoryStore::new()) }

    pub async fn load_global_catalog(&self) -> Result<LegacyCatalog> {
        match self { Self::Memory(m) => Ok(m.load_global_catalog().await), Self::Postgres(p) => p.load_global_catalog().await }
    }

    pub async fn replace_global_catalog(&self, catalog: &LegacyCatalog) -> Result<()> {
        match self { Self::Memory(m) => { m.replace_global_catalog(catalog).await; Ok(()) } Self::Postgres(p) => p.replace_global_catalog(catalog).await }
    }

    pub async fn list_products(&self, include_inactive: bool) -> Result<Vec<Product>> {
        match self { Self::Memory(m) => Ok(m.list_products(include_inactive).await), Self::Postgres(p) => p.list_products(include_inactive).await }
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        match self { Self::Memory(m) => Ok(m.get_product(id).await), Self::Postgres(p) => p.get_product(id).await }
    }

    pub async fn save_product(&self, product: &Product) -> Result<()> {
        match self { Self::Memory(m) => { m.save_product(product).await; Ok(()) } Self::Postgres(p) => p.save_product(product).await }
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<bool> {
        match self { Self::Memory(m) => Ok(m.delete_product(id).await), Self::Postgres(p) => p.delete_product(id).await }
    }

    pub async fn list_fabrics(&self) -> Result<Vec<PbrFabric>> {
        match self { Self::Memory(m) => Ok(m.list_fabrics().await), Self::Postgres(p) => p.list_fabrics().await }
    }

    pub async fn get_fabric(&self, id: Uuid) -> Result<Option<PbrFabric>> {
        match self { Self::Memory(m) => Ok(m.get_fabric(id).await), Self::Postgres(p) => p.get_fabric(id).await }
    }

    pub async fn save_fabric(&self, fabric: &PbrFabric) -> Result<()> {
        match self { Self::Memory(m) => { m.save_fabric(fabric).await; Ok(()) } Self::Postgres(p) => p.save_fabric(fabric).await }
    }

    pub async fn delete_fabric(&self, id: Uuid) -> Result<bool> {
        match self { Self::Memory(m) => Ok(m.delete_fabric(id).await), Self::Postgres(p) => p.delete_fabric(id).await }
    }

    pub async fn next_order_number(&self) -> Result<u64> {
        match self { Self::Memory(m) => Ok(m.next_order_number().await), Self::Postgres(p) => p.next_order_number().await }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        match self { Self::Memory(m) => Ok(m.list_orders().await), Self::Postgres(p) => p.list_orders().await }
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        match self { Self::Memory(m) => Ok(m.get_order(id).await), Self::Postgres(p) => p.get_order(id).await }
    }

    pub async fn save_order(&self, order: &Order) -> Result<()> {
        match self { Self::Memory(m) => { m.save_order(order).await; Ok(()) } Self::Postgres(p) => p.save_order(order).await }
    }
}

impl CatalogSource for Store {
    async fn global_catalog(&self) -> std::result::Result<LegacyCatalog, CatalogError> {
        self.load_global_catalog().await.map_err(|e| CatalogError::Transport(e.to_string()))
    }

    async fn product(&self, id: Uuid) -> std::result::Result<Product, CatalogError> {
        match self.get_product(id).await {
            Ok(Some(p)) => Ok(p),
            Ok(None) => Err(CatalogError::NotFound(id)),
            Err(TailorError::StorageError(e)) => Err(CatalogError::Transport(e)),
            Err(e) => Err(CatalogError::Transport(e.to_string())),
        }
    }
}
