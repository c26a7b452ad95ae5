//! The customer's current selections for one product.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::catalog::{FabricOption, NormalizedCatalog, StyleOption};
use crate::domain::value_objects::{MeasurementField, ProductCategory, StepId};

const NECKTIE: &str = "necktie";
const BOWTIE: &str = "bowtie";

/// State of one selection slot. A step with no entry at all has simply not
/// been picked yet; `Declined` is the explicit "none" of optional steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "option", rename_all = "camelCase")]
pub enum Selection {
    Chosen(StyleOption),
    Declined,
}

impl Selection {
    pub fn option(&self) -> Option<&StyleOption> {
        match self { Self::Chosen(o) => Some(o), Self::Declined => None }
    }

    pub fn price_modifier(&self) -> i64 { self.option().map(StyleOption::price_modifier).unwrap_or(0) }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    category: ProductCategory,
    fabric: Option<FabricOption>,
    fabric_color: Option<String>,
    selections: BTreeMap<StepId, Selection>,
    measurements: BTreeMap<MeasurementField, String>,
}

impl Configuration {
    pub fn new(category: ProductCategory) -> Self { Self { category, ..Default::default() } }

    /// Fresh configuration with the catalog's defaults applied: the first
    /// fabric, and per group the `isDefault` option or else the first one.
    pub fn with_defaults(category: ProductCategory, catalog: &NormalizedCatalog) -> Self {
        let mut config = Self::new(category);
        config.fabric = catalog.fabrics.first().cloned();
        for group in &catalog.groups {
            if let Some(option) = group.default_option() {
                config.select(group.step.clone(), option.clone());
            }
        }
        config
    }

    pub fn category(&self) -> ProductCategory { self.category }
    pub fn fabric(&self) -> Option<&FabricOption> { self.fabric.as_ref() }
    pub fn fabric_color(&self) -> Option<&str> { self.fabric_color.as_deref() }
    pub fn selection(&self, step: &str) -> Option<&Selection> { self.selections.get(&StepId::from(step)) }
    pub fn chosen(&self, step: &str) -> Option<&StyleOption> { self.selection(step).and_then(Selection::option) }
    pub fn selections(&self) -> impl Iterator<Item = (&StepId, &Selection)> { self.selections.iter() }
    pub fn measurements(&self) -> &BTreeMap<MeasurementField, String> { &self.measurements }

    /// Select a fabric, optionally in one of its named colours
    pub fn set_fabric(&mut self, fabric: FabricOption, color: Option<&str>) -> Result<(), ConfigurationError> {
        let color = match color {
            Some(name) => Some(fabric.color(name).map(|c| c.name.clone()).ok_or_else(|| ConfigurationError::UnknownColor(name.to_string()))?),
            None => None,
        };
        self.fabric = Some(fabric);
        self.fabric_color = color;
        Ok(())
    }

    /// Choose an option for a step. Neckties and bowties exclude each other.
    pub fn select(&mut self, step: StepId, option: StyleOption) {
        match step.as_str() {
            NECKTIE => { self.selections.remove(&StepId::from(BOWTIE)); }
            BOWTIE => { self.selections.remove(&StepId::from(NECKTIE)); }
            _ => {}
        }
        self.selections.insert(step, Selection::Chosen(option));
    }

    /// Explicit "none" for an optional step (back, necktie, bowtie)
    pub fn decline(&mut self, step: StepId) -> Result<(), ConfigurationError> {
        if !step.is_optional() { return Err(ConfigurationError::NotOptional(step)); }
        self.selections.insert(step, Selection::Declined);
        Ok(())
    }

    /// Back to "not picked yet"
    pub fn clear(&mut self, step: &str) -> Option<Selection> { self.selections.remove(&StepId::from(step)) }

    /// Record a measurement. An empty value clears the field.
    pub fn set_measurement(&mut self, field: MeasurementField, value: &str) -> Result<(), ConfigurationError> {
        if !self.category.measurement_fields().contains(&field) {
            return Err(ConfigurationError::MeasurementNotApplicable(field, self.category));
        }
        let value = value.trim();
        if value.is_empty() {
            self.measurements.remove(&field);
            return Ok(());
        }
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => {
                self.measurements.insert(field, value.to_string());
                Ok(())
            }
            _ => Err(ConfigurationError::InvalidMeasurement(field, value.to_string())),
        }
    }

    /// Apply several measurements at once; nothing changes if any is rejected
    pub fn set_measurements<'a, I>(&mut self, values: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = (MeasurementField, &'a str)>,
    {
        let mut next = self.clone();
        for (field, value) in values {
            next.set_measurement(field, value)?;
        }
        self.measurements = next.measurements;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    UnknownStep(StepId),
    UnknownOption { step: StepId, option_id: String },
    UnknownFabric(String),
    UnknownColor(String),
    NotOptional(StepId),
    MeasurementNotApplicable(MeasurementField, ProductCategory),
    InvalidMeasurement(MeasurementField, String),
}
impl std::error::Error for ConfigurationError {}
impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStep(step) => write!(f, "Unknown step '{step}'"),
            Self::UnknownOption { step, option_id } => write!(f, "Unknown option '{option_id}' for step '{step}'"),
            Self::UnknownFabric(id) => write!(f, "Unknown fabric '{id}'"),
            Self::UnknownColor(name) => write!(f, "Unknown fabric colour '{name}'"),
            Self::NotOptional(step) => write!(f, "Step '{step}' cannot be left empty"),
            Self::MeasurementNotApplicable(field, category) => write!(f, "Measurement '{field}' does not apply to {category}"),
            Self::InvalidMeasurement(field, value) => write!(f, "Measurement '{field}' must be a positive number, got '{value}'"),
        }
    }
}
