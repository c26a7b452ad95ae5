//! REST API

pub mod catalog;
pub mod error;
pub mod fabrics;
pub mod orders;
pub mod products;
pub mod sessions;
pub mod upload;

use axum::{extract::DefaultBodyLimit, routing::{get, post, put}, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::domain::configurator::SessionRegistry;
use crate::domain::events::EventPublisher;
use crate::store::Store;

/// Uploads are the largest bodies the API accepts
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub sessions: SessionRegistry,
    pub events: EventPublisher,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, events: EventPublisher, config: Config) -> Self {
        Self { store, sessions: SessionRegistry::new(), events, config: Arc::new(config) }
    }

    /// Memory store, no event bus
    pub fn in_memory(config: Config) -> Self { Self::new(Store::in_memory(), EventPublisher::disabled(), config) }
}

pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-tailor"})) }))
        .route("/api/data", get(catalog::get_catalog).post(catalog::replace_catalog))
        .route("/api/products", get(products::list_products).post(products::create_product))
        .route("/api/products/:id", get(products::get_product).put(products::update_product).delete(products::delete_product))
        .route("/api/fabrics", get(fabrics::list_fabrics).post(fabrics::create_fabric))
        .route("/api/fabrics/:id", get(fabrics::get_fabric).put(fabrics::update_fabric).delete(fabrics::delete_fabric))
        .route("/api/upload", post(upload::upload_image))
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/:id", get(sessions::get_session).delete(sessions::delete_session))
        .route("/api/sessions/:id/fabric", put(sessions::select_fabric))
        .route("/api/sessions/:id/selections/:step", put(sessions::select_option))
        .route("/api/sessions/:id/measurements", put(sessions::set_measurements))
        .route("/api/sessions/:id/step", put(sessions::go_to_step))
        .route("/api/sessions/:id/next", post(sessions::next_step))
        .route("/api/sessions/:id/previous", post(sessions::previous_step))
        .route("/api/sessions/:id/view", put(sessions::set_view))
        .route("/api/sessions/:id/preview", get(sessions::preview))
        .route("/api/orders", get(orders::list_orders).post(orders::create_order))
        .route("/api/orders/:id", get(orders::get_order))
        .route("/api/orders/:id/status", put(orders::update_status))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
