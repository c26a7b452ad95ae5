//! Catalog loading.
//!
//! A [`CatalogSource`] hands out raw catalog documents; the functions here
//! pick the right shape for a product and normalize it. Failures never reach
//! the configurator: they are logged and replaced by an empty catalog so the
//! wizard still renders (just without options).

use std::future::Future;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use super::{CatalogKind, CatalogShape, LegacyCatalog, NormalizedCatalog};
use crate::domain::aggregates::product::{Product, ProductSummary};
use crate::domain::value_objects::ProductCategory;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(Uuid),

    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog responded with status {0}")]
    Status(u16),

    #[error("malformed catalog payload: {0}")]
    Malformed(String),
}

/// Anything able to serve catalog documents: the database-backed store or a
/// remote REST endpoint.
pub trait CatalogSource {
    fn global_catalog(&self) -> impl Future<Output = Result<LegacyCatalog, CatalogError>> + Send;
    fn product(&self, id: Uuid) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}

/// Catalog plus the product it belongs to (none for the global shirt catalog,
/// or when the product could not be fetched).
#[derive(Clone, Debug, Default)]
pub struct LoadedCatalog {
    pub product: Option<ProductSummary>,
    pub catalog: NormalizedCatalog,
}

/// Load the global shirt catalog, degrading to an empty one on failure.
pub async fn load_global<S: CatalogSource>(source: &S) -> NormalizedCatalog {
    match source.global_catalog().await {
        Ok(legacy) => NormalizedCatalog::from_shape(CatalogShape::Flat(legacy)),
        Err(e) => {
            error!(error = %e, "failed to load global catalog, continuing with an empty one");
            NormalizedCatalog::empty(CatalogKind::LegacyShirt)
        }
    }
}

/// Load the catalog for one product.
pub async fn load_for_product<S: CatalogSource>(source: &S, id: Uuid) -> LoadedCatalog {
    let product = match source.product(id).await {
        Ok(p) => p,
        Err(e) => {
            error!(product_id = %id, error = %e, "failed to load product catalog");
            return LoadedCatalog::default();
        }
    };

    let global = if needs_global_catalog(&product) {
        match source.global_catalog().await {
            Ok(g) => Some(g),
            Err(e) => {
                warn!(product_id = %id, error = %e, "global catalog unavailable, shirt options will be empty");
                None
            }
        }
    } else {
        None
    };

    LoadedCatalog { product: Some(product.summary()), catalog: NormalizedCatalog::from_shape(catalog_shape(&product, global)) }
}

fn needs_global_catalog(product: &Product) -> bool {
    product.category == ProductCategory::Shirt
        && (product.customization_options.option_groups.is_empty() || product.fabrics.is_empty())
}

/// Pick the ingestion shape for a product.
///
/// Non-empty `optionGroups` always win over legacy styles. Shirts without
/// groups use the global catalog; shirts draw their fabrics from the global
/// catalog unless the product carries its own list.
pub fn catalog_shape(product: &Product, global: Option<LegacyCatalog>) -> CatalogShape {
    let opts = &product.customization_options;
    let is_shirt = product.category == ProductCategory::Shirt;
    let fabrics = match (&global, product.fabrics.is_empty() && is_shirt) {
        (Some(g), true) => g.fabrics.clone(),
        _ => product.fabrics.clone(),
    };

    if !opts.option_groups.is_empty() {
        return CatalogShape::Grouped { fabrics, groups: opts.option_groups.clone() };
    }
    if is_shirt {
        let mut legacy = global.unwrap_or_default();
        legacy.fabrics = fabrics;
        return CatalogShape::Flat(legacy);
    }
    CatalogShape::Styles { fabrics, styles: opts.styles.clone() }
}
