//! Tailoring orders (`/api/orders`)

use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::AppState;
use crate::domain::aggregates::{Order, OrderStatus};
use crate::domain::configurator::ConfiguratorSession;
use crate::{Result, TailorError};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub session_id: Uuid,
    #[validate(email)]
    pub customer_email: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)] pub struct StatusRequest { pub status: OrderStatus }

/// Places an order from a session; the session is consumed on success
pub async fn create_order(State(s): State<AppState>, Json(r): Json<CreateOrderRequest>) -> Result<(StatusCode, Json<Order>)> {
    r.validate()?;
    // taken out of the registry so two requests cannot order the same session
    let session = s.sessions.remove(r.session_id).await.ok_or(TailorError::SessionNotFound)?;
    let mut order = match place(&s, &session, r.customer_email, r.note).await {
        Ok(order) => order,
        Err(e) => {
            s.sessions.insert(session).await;
            return Err(e);
        }
    };
    info!(order_id = %order.id(), order_number = order.order_number(), total = order.total(), session_id = %r.session_id, "order placed");
    s.events.publish_all(order.take_events()).await;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn place(s: &AppState, session: &ConfiguratorSession, email: String, note: Option<String>) -> Result<Order> {
    let number = s.store.next_order_number().await?;
    let order = Order::place(
        number,
        email,
        session.product().clone(),
        session.configuration().clone(),
        session.total_price(),
        &s.config.currency,
    )
    .with_note(note);
    s.store.save_order(&order).await?;
    Ok(order)
}

pub async fn list_orders(State(s): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(s.store.list_orders().await?))
}

pub async fn get_order(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Order>> {
    s.store.get_order(id).await?.map(Json).ok_or(TailorError::OrderNotFound)
}

pub async fn update_status(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<StatusRequest>) -> Result<Json<Order>> {
    let mut order = s.store.get_order(id).await?.ok_or(TailorError::OrderNotFound)?;
    order.advance_to(r.status)?;
    s.store.save_order(&order).await?;
    info!(order_id = %id, status = r.status.as_str(), "order status changed");
    s.events.publish_all(order.take_events()).await;
    Ok(Json(order))
}
