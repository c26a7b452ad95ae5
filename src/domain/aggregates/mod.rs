//! Aggregates module
pub mod product;
pub mod pbr_fabric;
pub mod order;

pub use product::{Product, ProductError, ProductInput, ProductSummary};
pub use pbr_fabric::{FabricCategory, PbrFabric, PbrFabricError, PbrFabricInput};
pub use order::{Order, OrderError, OrderStatus};
