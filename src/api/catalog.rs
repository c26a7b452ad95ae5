//! Global shirt catalog (`/api/data`)

use axum::{extract::State, Json};
use tracing::info;

use super::AppState;
use crate::domain::catalog::LegacyCatalog;
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::{Result, TailorError};

pub async fn get_catalog(State(s): State<AppState>) -> Result<Json<LegacyCatalog>> {
    Ok(Json(s.store.load_global_catalog().await?))
}

/// Full replace; the admin screens always send the whole catalog
pub async fn replace_catalog(State(s): State<AppState>, Json(catalog): Json<LegacyCatalog>) -> Result<Json<LegacyCatalog>> {
    if let Some(id) = catalog.out_of_range_price() {
        return Err(TailorError::InvalidCatalog(id.to_string()));
    }
    s.store.replace_global_catalog(&catalog).await?;
    let options: usize = [&catalog.collars, &catalog.cuffs, &catalog.pockets, &catalog.buttons, &catalog.sleeves,
        &catalog.plackets, &catalog.backs, &catalog.neckties, &catalog.bowties]
        .iter()
        .map(|list| list.len())
        .sum();
    info!(fabrics = catalog.fabrics.len(), options, "global catalog replaced");
    s.events.publish(DomainEvent::Catalog(CatalogEvent::GlobalReplaced { fabrics: catalog.fabrics.len(), options })).await;
    Ok(Json(catalog))
}
