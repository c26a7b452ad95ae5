//! OpenSASE Tailor
//!
//! Made-to-measure garment storefront: shirts, suits, pants, blazers, vests
//! and tuxedos configured option by option.
//!
//! ## Features
//! - Option catalog with per-fabric and per-view overlay imagery
//! - Configurator sessions: selections, wizard steps, live pricing, previews
//! - Locally saved configuration drafts
//! - Product, PBR fabric and order management
//! - Image uploads for option and fabric artwork

pub mod api;
pub mod config;
pub mod domain;
pub mod remote;
pub mod store;

use thiserror::Error;

use domain::aggregates::{OrderError, PbrFabricError, ProductError};
use domain::configurator::ConfigurationError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum TailorError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Fabric not found")]
    FabricNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Configurator session not found")]
    SessionNotFound,

    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductError),

    #[error("Invalid fabric: {0}")]
    InvalidFabric(#[from] PbrFabricError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),

    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("Invalid catalog: price of '{0}' is out of range")]
    InvalidCatalog(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<sqlx::Error> for TailorError {
    fn from(e: sqlx::Error) -> Self { Self::StorageError(e.to_string()) }
}

impl From<sqlx::migrate::MigrateError> for TailorError {
    fn from(e: sqlx::migrate::MigrateError) -> Self { Self::StorageError(e.to_string()) }
}

impl From<std::io::Error> for TailorError {
    fn from(e: std::io::Error) -> Self { Self::StorageError(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, TailorError>;
