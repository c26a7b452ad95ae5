//! Order Aggregate
//!
//! An order freezes one configured garment: the configuration snapshot and
//! the total computed by the pricing engine when the order was placed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::product::ProductSummary;
use crate::domain::configurator::Configuration;
use crate::domain::events::{DomainEvent, OrderEvent};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: Uuid,
    order_number: u64,
    customer_email: String,
    status: OrderStatus,
    product: ProductSummary,
    fabric_color: Option<String>,
    configuration: Configuration,
    total: i64,
    currency: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Pending, Confirmed, Processing, Shipped, Delivered, Cancelled }

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Order {
    pub fn place(
        order_number: u64,
        customer_email: impl Into<String>,
        product: ProductSummary,
        configuration: Configuration,
        total: i64,
        currency: &str,
    ) -> Self {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let mut order = Self {
            id, order_number, customer_email: customer_email.into(), status: OrderStatus::Pending,
            fabric_color: configuration.fabric_color().map(str::to_owned), product, configuration, total,
            currency: currency.to_string(), note: None, created_at: now, updated_at: now, events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Placed { order_id: id, order_number, total }));
        order
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn order_number(&self) -> u64 { self.order_number }
    pub fn customer_email(&self) -> &str { &self.customer_email }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn total(&self) -> i64 { self.total }
    pub fn product(&self) -> &ProductSummary { &self.product }
    pub fn configuration(&self) -> &Configuration { &self.configuration }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    pub fn with_note(mut self, note: Option<String>) -> Self { self.note = note.filter(|n| !n.trim().is_empty()); self }

    pub fn confirm(&mut self) -> Result<(), OrderError> { self.transition(OrderStatus::Pending, OrderStatus::Confirmed) }
    pub fn start_tailoring(&mut self) -> Result<(), OrderError> { self.transition(OrderStatus::Confirmed, OrderStatus::Processing) }
    pub fn ship(&mut self) -> Result<(), OrderError> { self.transition(OrderStatus::Processing, OrderStatus::Shipped) }
    pub fn deliver(&mut self) -> Result<(), OrderError> { self.transition(OrderStatus::Shipped, OrderStatus::Delivered) }

    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if matches!(self.status, OrderStatus::Delivered | OrderStatus::Cancelled) { return Err(OrderError::CannotCancel); }
        self.set_status(OrderStatus::Cancelled);
        Ok(())
    }

    /// Move to `target` via the matching transition
    pub fn advance_to(&mut self, target: OrderStatus) -> Result<(), OrderError> {
        match target {
            OrderStatus::Confirmed => self.confirm(),
            OrderStatus::Processing => self.start_tailoring(),
            OrderStatus::Shipped => self.ship(),
            OrderStatus::Delivered => self.deliver(),
            OrderStatus::Cancelled => self.cancel(),
            OrderStatus::Pending => Err(OrderError::InvalidTransition { from: self.status, to: target }),
        }
    }

    fn transition(&mut self, from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if self.status != from { return Err(OrderError::InvalidTransition { from: self.status, to }); }
        self.set_status(to);
        Ok(())
    }

    fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_id: self.id, status }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum OrderError { CannotCancel, InvalidTransition { from: OrderStatus, to: OrderStatus } }
impl std::error::Error for OrderError {}
impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CannotCancel => write!(f, "Cannot cancel"),
            Self::InvalidTransition { from, to } => write!(f, "Cannot move order from {} to {}", from.as_str(), to.as_str()),
        }
    }
}
