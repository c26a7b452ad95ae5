//! Domain events
pub mod publisher;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::order::OrderStatus;
use crate::domain::value_objects::ProductCategory;

pub use publisher::EventPublisher;

#[derive(Clone, Debug, Serialize)]
pub enum DomainEvent {
    Product(ProductEvent),
    Catalog(CatalogEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { product_id: Uuid, category: ProductCategory },
    Updated { product_id: Uuid },
    Deleted { product_id: Uuid },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    GlobalReplaced { fabrics: usize, options: usize },
    FabricCreated { fabric_id: Uuid },
    FabricUpdated { fabric_id: Uuid },
    FabricDeleted { fabric_id: Uuid },
    ImageUploaded { path: String },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: Uuid, order_number: u64, total: i64 },
    StatusChanged { order_id: Uuid, status: OrderStatus },
}

impl DomainEvent {
    /// NATS subject, e.g. `tailor.product.created`
    pub fn subject(&self) -> String {
        let (stream, name) = match self {
            Self::Product(e) => ("product", match e {
                ProductEvent::Created { .. } => "created",
                ProductEvent::Updated { .. } => "updated",
                ProductEvent::Deleted { .. } => "deleted",
            }),
            Self::Catalog(e) => ("catalog", match e {
                CatalogEvent::GlobalReplaced { .. } => "replaced",
                CatalogEvent::FabricCreated { .. } => "fabric_created",
                CatalogEvent::FabricUpdated { .. } => "fabric_updated",
                CatalogEvent::FabricDeleted { .. } => "fabric_deleted",
                CatalogEvent::ImageUploaded { .. } => "image_uploaded",
            }),
            Self::Order(e) => ("order", match e {
                OrderEvent::Placed { .. } => "placed",
                OrderEvent::StatusChanged { .. } => "status_changed",
            }),
        };
        format!("tailor.{stream}.{name}")
    }
}
