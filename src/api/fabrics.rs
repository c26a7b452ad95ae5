//! PBR fabric library (`/api/fabrics`)

use axum::{extract::{Path, State}, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use super::AppState;
use crate::domain::aggregates::{PbrFabric, PbrFabricInput};
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::{Result, TailorError};

pub async fn list_fabrics(State(s): State<AppState>) -> Result<Json<Vec<PbrFabric>>> {
    Ok(Json(s.store.list_fabrics().await?))
}

pub async fn get_fabric(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<PbrFabric>> {
    s.store.get_fabric(id).await?.map(Json).ok_or(TailorError::FabricNotFound)
}

pub async fn create_fabric(State(s): State<AppState>, Json(input): Json<PbrFabricInput>) -> Result<(StatusCode, Json<PbrFabric>)> {
    input.validate()?;
    let fabric = PbrFabric::create(input)?;
    s.store.save_fabric(&fabric).await?;
    s.events.publish(DomainEvent::Catalog(CatalogEvent::FabricCreated { fabric_id: fabric.id })).await;
    Ok((StatusCode::CREATED, Json(fabric)))
}

pub async fn update_fabric(State(s): State<AppState>, Path(id): Path<Uuid>, Json(input): Json<PbrFabricInput>) -> Result<Json<PbrFabric>> {
    input.validate()?;
    let mut fabric = s.store.get_fabric(id).await?.ok_or(TailorError::FabricNotFound)?;
    fabric.apply(input)?;
    s.store.save_fabric(&fabric).await?;
    s.events.publish(DomainEvent::Catalog(CatalogEvent::FabricUpdated { fabric_id: id })).await;
    Ok(Json(fabric))
}

pub async fn delete_fabric(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !s.store.delete_fabric(id).await? {
        return Err(TailorError::FabricNotFound);
    }
    s.events.publish(DomainEvent::Catalog(CatalogEvent::FabricDeleted { fabric_id: id })).await;
    Ok(StatusCode::NO_CONTENT)
}
