//! Product Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

use crate::domain::catalog::{CustomizationOptions, FabricOption, StyleOption, MAX_PRICE};
use crate::domain::value_objects::{ProductCategory, StepId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    pub base_price: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub customization_options: CustomizationOptions,
    #[serde(default)]
    pub fabrics: Vec<FabricOption>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool { true }

/// What the configurator needs to know about the product being customized
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Option<Uuid>,
    pub name: String,
    pub category: ProductCategory,
    pub base_price: i64,
}

impl ProductSummary {
    /// Stand-in used when configuring from the global shirt catalog alone
    pub fn global_shirt() -> Self {
        Self { id: None, name: "Custom Shirt".to_string(), category: ProductCategory::Shirt, base_price: 0 }
    }
}

/// Create/update payload for products
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ProductCategory,
    #[validate(range(min = 0, max = 100_000_000_000))]
    pub base_price: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub customization_options: CustomizationOptions,
    #[serde(default)]
    pub fabrics: Vec<FabricOption>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, category: ProductCategory, base_price: i64) -> Self {
        Self {
            name: name.into(), description: None, category, base_price, images: vec![],
            customization_options: CustomizationOptions::default(), fabrics: vec![], is_active: None,
        }
    }

    fn check(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() { return Err(ProductError::MissingName); }
        if self.base_price < 0 { return Err(ProductError::NegativePrice); }
        if self.base_price > MAX_PRICE { return Err(ProductError::PriceOutOfRange("basePrice".into())); }
        if let Some(f) = self.fabrics.iter().find(|f| !f.price_in_range()) {
            return Err(ProductError::PriceOutOfRange(f.id.clone()));
        }

        let opts = &self.customization_options;
        let groups = opts.option_groups.iter().map(|g| (g.step_id(), g.options.as_slice()));
        check_groups(groups)?;
        // styles are only read when there are no option groups, so they get their own namespace
        check_groups(opts.styles.iter().map(|(key, options)| (StepId::new(key.trim()), options.as_slice())))
    }
}

fn check_groups<'a>(groups: impl Iterator<Item = (StepId, &'a [StyleOption])>) -> Result<(), ProductError> {
    let mut seen = HashSet::new();
    for (step, options) in groups {
        if step.as_str().trim().is_empty() { return Err(ProductError::UnnamedGroup); }
        if !step.is_style_step() { return Err(ProductError::ReservedGroup(step)); }
        if let Some(o) = options.iter().find(|o| !o.price_in_range()) {
            return Err(ProductError::PriceOutOfRange(o.id.clone()));
        }
        if !seen.insert(step.clone()) { return Err(ProductError::DuplicateGroup(step)); }
    }
    Ok(())
}

impl Product {
    pub fn create(input: ProductInput) -> Result<Self, ProductError> {
        input.check()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            description: input.description.unwrap_or_default(),
            category: input.category,
            base_price: input.base_price,
            images: input.images,
            customization_options: input.customization_options,
            fabrics: input.fabrics,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields, keeping identity and creation time
    pub fn apply(&mut self, input: ProductInput) -> Result<(), ProductError> {
        input.check()?;
        self.name = input.name.trim().to_string();
        self.description = input.description.unwrap_or_default();
        self.category = input.category;
        self.base_price = input.base_price;
        self.images = input.images;
        self.customization_options = input.customization_options;
        self.fabrics = input.fabrics;
        if let Some(active) = input.is_active { self.is_active = active; }
        self.touch();
        Ok(())
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary { id: Some(self.id), name: self.name.clone(), category: self.category, base_price: self.base_price }
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    MissingName,
    NegativePrice,
    PriceOutOfRange(String),
    UnnamedGroup,
    ReservedGroup(StepId),
    DuplicateGroup(StepId),
}
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "Missing name"),
            Self::NegativePrice => write!(f, "Base price cannot be negative"),
            Self::PriceOutOfRange(field) => write!(f, "Price of '{field}' is out of range"),
            Self::UnnamedGroup => write!(f, "Option group needs a category or id"),
            Self::ReservedGroup(step) => write!(f, "Option group category '{step}' is reserved"),
            Self::DuplicateGroup(step) => write!(f, "Duplicate option group category '{step}'"),
        }
    }
}
