//! Configurator sessions (`/api/sessions`)
//!
//! Every mutating route answers with the full session view so the client
//! can re-render steps, price and preview from one response.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::AppState;
use crate::domain::aggregates::ProductSummary;
use crate::domain::catalog::loader::{load_for_product, load_global};
use crate::domain::configurator::{ConfigurationError, ConfiguratorSession, Preview};
use crate::domain::value_objects::{MeasurementField, View};
use crate::{Result, TailorError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest { pub product_id: Option<Uuid> }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricRequest { pub fabric_id: String, pub color: Option<String> }

/// `optionId: null` declines an optional step
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest { pub option_id: Option<String> }

#[derive(Debug, Deserialize)] pub struct StepRequest { pub step: String }
#[derive(Debug, Deserialize)] pub struct ViewRequest { pub view: View }

pub async fn create_session(State(s): State<AppState>, Json(r): Json<CreateSessionRequest>) -> Result<(StatusCode, Response)> {
    let (product, catalog) = match r.product_id {
        Some(id) => {
            let loaded = load_for_product(&s.store, id).await;
            (loaded.product.ok_or(TailorError::ProductNotFound)?, loaded.catalog)
        }
        None => (ProductSummary::global_shirt(), load_global(&s.store).await),
    };
    let session = ConfiguratorSession::start(product, catalog);
    info!(session_id = %session.id(), product = %session.product().name, steps = session.steps().len(), "configurator session started");
    let body = render(&session);
    s.sessions.insert(session).await;
    Ok((StatusCode::CREATED, body))
}

pub async fn get_session(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    s.sessions.get(id).await.map(|session| render(&session)).ok_or(TailorError::SessionNotFound)
}

pub async fn delete_session(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    s.sessions.remove(id).await.ok_or(TailorError::SessionNotFound)?;
    debug!(session_id = %id, "configurator session closed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_fabric(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<FabricRequest>) -> Result<Response> {
    mutate(&s, id, |session| session.select_fabric(&r.fabric_id, r.color.as_deref())).await
}

pub async fn select_option(State(s): State<AppState>, Path((id, step)): Path<(Uuid, String)>, Json(r): Json<SelectionRequest>) -> Result<Response> {
    mutate(&s, id, |session| session.select_option(&step, r.option_id.as_deref())).await
}

pub async fn set_measurements(State(s): State<AppState>, Path(id): Path<Uuid>, Json(values): Json<BTreeMap<MeasurementField, String>>) -> Result<Response> {
    mutate(&s, id, |session| session.set_measurements(values.iter().map(|(field, value)| (*field, value.as_str())))).await
}

pub async fn go_to_step(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<StepRequest>) -> Result<Response> {
    mutate(&s, id, |session| session.go_to(&r.step)).await
}

pub async fn next_step(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    mutate(&s, id, |session| { session.next_step(); Ok(()) }).await
}

pub async fn previous_step(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    mutate(&s, id, |session| { session.previous_step(); Ok(()) }).await
}

pub async fn set_view(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ViewRequest>) -> Result<Response> {
    mutate(&s, id, |session| { session.set_view(r.view); Ok(()) }).await
}

pub async fn preview(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Preview>> {
    s.sessions.get(id).await.map(|session| Json(session.preview())).ok_or(TailorError::SessionNotFound)
}

// Serialized while the session is still borrowed
fn render(session: &ConfiguratorSession) -> Response { Json(session.view_model()).into_response() }

async fn mutate<F>(s: &AppState, id: Uuid, f: F) -> Result<Response>
where
    F: FnOnce(&mut ConfiguratorSession) -> std::result::Result<(), ConfigurationError>,
{
    s.sessions
        .update(id, |session| {
            f(session)?;
            Ok::<_, TailorError>(render(session))
        })
        .await
        .ok_or(TailorError::SessionNotFound)?
}
