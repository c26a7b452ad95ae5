//! Product CRUD (`/api/products`)

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::AppState;
use crate::domain::aggregates::{Product, ProductInput};
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::{Result, TailorError};

#[derive(Debug, Default, Deserialize)] pub struct ListParams { pub all: Option<bool> }

pub async fn list_products(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<Vec<Product>>> {
    Ok(Json(s.store.list_products(p.all.unwrap_or(false)).await?))
}

pub async fn get_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Product>> {
    s.store.get_product(id).await?.map(Json).ok_or(TailorError::ProductNotFound)
}

pub async fn create_product(State(s): State<AppState>, Json(input): Json<ProductInput>) -> Result<(StatusCode, Json<Product>)> {
    input.validate()?;
    let product = Product::create(input)?;
    s.store.save_product(&product).await?;
    info!(product_id = %product.id, category = product.category.as_str(), "product created");
    s.events.publish(DomainEvent::Product(ProductEvent::Created { product_id: product.id, category: product.category })).await;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(State(s): State<AppState>, Path(id): Path<Uuid>, Json(input): Json<ProductInput>) -> Result<Json<Product>> {
    input.validate()?;
    let mut product = s.store.get_product(id).await?.ok_or(TailorError::ProductNotFound)?;
    product.apply(input)?;
    s.store.save_product(&product).await?;
    s.events.publish(DomainEvent::Product(ProductEvent::Updated { product_id: id })).await;
    Ok(Json(product))
}

pub async fn delete_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !s.store.delete_product(id).await? {
        return Err(TailorError::ProductNotFound);
    }
    info!(product_id = %id, "product deleted");
    s.events.publish(DomainEvent::Product(ProductEvent::Deleted { product_id: id })).await;
    Ok(StatusCode::NO_CONTENT)
}
