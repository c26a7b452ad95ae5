use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::TailorError;

impl TailorError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProductNotFound | Self::FabricNotFound | Self::OrderNotFound | Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::InvalidProduct(_) | Self::InvalidFabric(_) | Self::InvalidCatalog(_) | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidConfiguration(_) | Self::Upload(_) => StatusCode::BAD_REQUEST,
            Self::InvalidOrder(_) => StatusCode::CONFLICT,
            Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TailorError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
