//! Configurator: selections, pricing, wizard steps and overlay resolution.

pub mod configuration;
pub mod drafts;
pub mod pricing;
pub mod session;
pub mod steps;
pub mod variants;

pub use configuration::{Configuration, ConfigurationError, Selection};
pub use drafts::{Draft, DraftError, DraftStore, MAX_DRAFTS};
pub use pricing::{price_breakdown, total_price, PriceBreakdown, PriceLine};
pub use session::{ConfiguratorSession, SessionRegistry, SessionView};
pub use steps::{derive_steps, describe_steps, StepDescriptor, StepNavigator, LEGACY_SHIRT_STEPS};
pub use variants::{compose_preview, resolve_layer, Layer, Preview};
