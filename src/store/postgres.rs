//! Postgres store. Aggregates are kept as JSON(B) documents next to the few
//! columns needed for filtering and ordering.

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::{Order, PbrFabric, Product};
use crate::domain::catalog::LegacyCatalog;
use crate::{Result, TailorError};

const GLOBAL_CATALOG: &str = "global";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(max_connections, "connected to postgres and applied migrations");
        Ok(Self { pool })
    }

    pub async fn load_global_catalog(&self) -> Result<LegacyCatalog> {
        let row = sqlx::query_as::<_, (Json<LegacyCatalog>,)>("SELECT doc FROM catalog_documents WHERE name = $1")
            .bind(GLOBAL_CATALOG).fetch_optional(&self.pool).await?;
        Ok(row.map(|(Json(c),)| c).unwrap_or_default())
    }

    pub async fn replace_global_catalog(&self, catalog: &LegacyCatalog) -> Result<()> {
        sqlx::query("INSERT INTO catalog_documents (name, doc, updated_at) VALUES ($1, $2, NOW()) ON CONFLICT (name) DO UPDATE SET doc = EXCLUDED.doc, updated_at = NOW()")
            .bind(GLOBAL_CATALOG).bind(Json(catalog)).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn list_products(&self, include_inactive: bool) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, (Json<Product>,)>("SELECT doc FROM products WHERE is_active OR $1 ORDER BY created_at DESC")
            .bind(include_inactive).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(Json(p),)| p).collect())
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, (Json<Product>,)>("SELECT doc FROM products WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|(Json(p),)| p))
    }

    pub async fn save_product(&self, product: &Product) -> Result<()> {
        // bound as text: a JSONB parameter would lose the key order of `styles`
        let doc = serde_json::to_string(product).map_err(|e| TailorError::StorageError(e.to_string()))?;
        sqlx::query("INSERT INTO products (id, is_active, doc, created_at) VALUES ($1, $2, $3::json, $4) ON CONFLICT (id) DO UPDATE SET is_active = EXCLUDED.is_active, doc = EXCLUDED.doc")
            .bind(product.id).bind(product.is_active).bind(doc).bind(product.created_at)
            .execute(&self.pool).await?;
        Ok(())
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn list_fabrics(&self) -> Result<Vec<PbrFabric>> {
        let rows = sqlx::query_as::<_, (Json<PbrFabric>,)>("SELECT doc FROM pbr_fabrics ORDER BY name")
            .fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(Json(f),)| f).collect())
    }

    pub async fn get_fabric(&self, id: Uuid) -> Result<Option<PbrFabric>> {
        let row = sqlx::query_as::<_, (Json<PbrFabric>,)>("SELECT doc FROM pbr_fabrics WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|(Json(f),)| f))
    }

    pub async fn save_fabric(&self, fabric: &PbrFabric) -> Result<()> {
        sqlx::query("INSERT INTO pbr_fabrics (id, name, doc) VALUES ($1, $2, $3) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, doc = EXCLUDED.doc")
            .bind(fabric.id).bind(&fabric.name).bind(Json(fabric)).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn delete_fabric(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM pbr_fabrics WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn next_order_number(&self) -> Result<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT nextval('order_numbers')").fetch_one(&self.pool).await?;
        Ok(n as u64)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, (Json<Order>,)>("SELECT doc FROM orders ORDER BY order_number DESC")
            .fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(Json(o),)| o).collect())
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, (Json<Order>,)>("SELECT doc FROM orders WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|(Json(o),)| o))
    }

    pub async fn save_order(&self, order: &Order) -> Result<()> {
        sqlx::query("INSERT INTO orders (id, order_number, doc, created_at) VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc")
            .bind(order.id()).bind(order.order_number() as i64).bind(Json(order)).bind(order.created_at())
            .execute(&self.pool).await?;
        Ok(())
    }
}
