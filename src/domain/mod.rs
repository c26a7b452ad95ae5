//! Domain layer: catalog, configurator, aggregates and events
pub mod aggregates;
pub mod catalog;
pub mod configurator;
pub mod events;
pub mod value_objects;
