//! PBR fabric materials used by the 3D garment viewer.
//!
//! These are separate from the 2D customization fabrics in the option
//! catalog: they carry texture maps and shading parameters, not overlays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::value_objects::{HexColor, HexColorError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FabricCategory { #[default] Cotton, Wool, Linen, Silk, Polyester, Denim }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrFabric {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub name: String,
    pub category: FabricCategory,
    pub color_map_url: String,
    pub normal_map_url: Option<String>,
    pub roughness_map_url: Option<String>,
    pub base_color: HexColor,
    pub roughness: f64,
    pub metalness: f64,
    pub normal_scale: f64,
    pub price: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PbrFabricInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub category: FabricCategory,
    #[validate(length(min = 1))]
    pub color_map_url: String,
    pub normal_map_url: Option<String>,
    pub roughness_map_url: Option<String>,
    pub base_color: Option<String>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub roughness: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub metalness: Option<f64>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub normal_scale: Option<f64>,
    #[validate(range(min = 0, max = 100_000_000_000))]
    pub price: Option<i64>,
    pub is_active: Option<bool>,
}

impl PbrFabricInput {
    pub fn new(name: impl Into<String>, color_map_url: impl Into<String>) -> Self {
        Self {
            name: name.into(), category: FabricCategory::default(), color_map_url: color_map_url.into(),
            normal_map_url: None, roughness_map_url: None, base_color: None,
            roughness: None, metalness: None, normal_scale: None, price: None, is_active: None,
        }
    }
}

impl PbrFabric {
    pub const DEFAULT_ROUGHNESS: f64 = 0.8;
    pub const DEFAULT_METALNESS: f64 = 0.0;
    pub const DEFAULT_NORMAL_SCALE: f64 = 1.0;

    pub fn create(input: PbrFabricInput) -> Result<Self, PbrFabricError> {
        let now = Utc::now();
        let mut fabric = Self {
            id: Uuid::now_v7(), name: String::new(), category: FabricCategory::default(), color_map_url: String::new(),
            normal_map_url: None, roughness_map_url: None, base_color: HexColor::white(),
            roughness: Self::DEFAULT_ROUGHNESS, metalness: Self::DEFAULT_METALNESS, normal_scale: Self::DEFAULT_NORMAL_SCALE,
            price: 0, is_active: true, created_at: now, updated_at: now,
        };
        fabric.apply(input)?;
        Ok(fabric)
    }

    /// Overwrite from an input; unset optional fields keep their current value
    pub fn apply(&mut self, input: PbrFabricInput) -> Result<(), PbrFabricError> {
        if input.name.trim().is_empty() { return Err(PbrFabricError::MissingName); }
        if input.color_map_url.trim().is_empty() { return Err(PbrFabricError::MissingColorMap); }
        let price = input.price.unwrap_or(self.price);
        if price < 0 { return Err(PbrFabricError::NegativePrice); }
        let base_color = match input.base_color {
            Some(color) => HexColor::new(color).map_err(PbrFabricError::BaseColor)?,
            None => self.base_color.clone(),
        };
        let roughness = bounded("roughness", input.roughness.unwrap_or(self.roughness), 0.0, 1.0)?;
        let metalness = bounded("metalness", input.metalness.unwrap_or(self.metalness), 0.0, 1.0)?;
        let normal_scale = bounded("normalScale", input.normal_scale.unwrap_or(self.normal_scale), 0.0, 2.0)?;

        self.base_color = base_color;
        self.roughness = roughness;
        self.metalness = metalness;
        self.normal_scale = normal_scale;
        self.name = input.name.trim().to_string();
        self.category = input.category;
        self.color_map_url = input.color_map_url;
        self.normal_map_url = input.normal_map_url;
        self.roughness_map_url = input.roughness_map_url;
        self.price = price;
        if let Some(active) = input.is_active { self.is_active = active; }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn bounded(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, PbrFabricError> {
    if value.is_finite() && (min..=max).contains(&value) { Ok(value) } else { Err(PbrFabricError::OutOfRange(field)) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PbrFabricError { MissingName, MissingColorMap, NegativePrice, BaseColor(HexColorError), OutOfRange(&'static str) }
impl std::error::Error for PbrFabricError {}
impl std::fmt::Display for PbrFabricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "Missing name"),
            Self::MissingColorMap => write!(f, "Missing colour map"),
            Self::NegativePrice => write!(f, "Price cannot be negative"),
            Self::BaseColor(e) => write!(f, "Invalid base colour: {e}"),
            Self::OutOfRange(field) => write!(f, "{field} is out of range"),
        }
    }
}
