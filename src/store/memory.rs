//! In-process store used when no database is configured, and by tests.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::aggregates::{Order, PbrFabric, Product};
use crate::domain::catalog::LegacyCatalog;

#[derive(Default)]
struct MemoryData {
    catalog: LegacyCatalog,
    products: HashMap<Uuid, Product>,
    fabrics: HashMap<Uuid, PbrFabric>,
    orders: HashMap<Uuid, Order>,
    last_order_number: u64,
}

#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryData>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let data = MemoryData { last_order_number: 1000, ..Default::default() };
        Self { inner: Arc::new(RwLock::new(data)) }
    }
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub async fn load_global_catalog(&self) -> LegacyCatalog { self.inner.read().await.catalog.clone() }

    pub async fn replace_global_catalog(&self, catalog: &LegacyCatalog) { self.inner.write().await.catalog = catalog.clone(); }

    pub async fn list_products(&self, include_inactive: bool) -> Vec<Product> {
        let data = self.inner.read().await;
        let mut products: Vec<Product> = data.products.values().filter(|p| include_inactive || p.is_active).cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products
    }

    pub async fn get_product(&self, id: Uuid) -> Option<Product> { self.inner.read().await.products.get(&id).cloned() }

    pub async fn save_product(&self, product: &Product) { self.inner.write().await.products.insert(product.id, product.clone()); }

    pub async fn delete_product(&self, id: Uuid) -> bool { self.inner.write().await.products.remove(&id).is_some() }

    pub async fn list_fabrics(&self) -> Vec<PbrFabric> {
        let data = self.inner.read().await;
        let mut fabrics: Vec<PbrFabric> = data.fabrics.values().cloned().collect();
        fabrics.sort_by(|a, b| a.name.cmp(&b.name));
        fabrics
    }

    pub async fn get_fabric(&self, id: Uuid) -> Option<PbrFabric> { self.inner.read().await.fabrics.get(&id).cloned() }

    pub async fn save_fabric(&self, fabric: &PbrFabric) { self.inner.write().await.fabrics.insert(fabric.id, fabric.clone()); }

    pub async fn delete_fabric(&self, id: Uuid) -> bool { self.inner.write().await.fabrics.remove(&id).is_some() }

    pub async fn next_order_number(&self) -> u64 {
        let mut data = self.inner.write().await;
        data.last_order_number += 1;
        data.last_order_number
    }

    pub async fn list_orders(&self) -> Vec<Order> {
        let data = self.inner.read().await;
        let mut orders: Vec<Order> = data.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.order_number().cmp(&a.order_number()));
        orders
    }

    pub async fn get_order(&self, id: Uuid) -> Option<Order> { self.inner.read().await.orders.get(&id).cloned() }

    pub async fn save_order(&self, order: &Order) { self.inner.write().await.orders.insert(order.id(), order.clone()); }
}
