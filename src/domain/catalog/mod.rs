//! Option catalog: fabrics, option groups and their variant imagery.
//!
//! Catalogs arrive in one of three shapes (the global flat shirt catalog, a
//! product's `optionGroups`, or a product's legacy `styles` map). They are
//! accepted as a [`CatalogShape`] and normalized straight away into a
//! [`NormalizedCatalog`], an ordered list of `step id -> options`, so nothing
//! downstream has to branch on the original shape.

pub mod editor;
pub mod loader;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::value_objects::{StepId, View};

/// Largest magnitude accepted for a base price or modifier, in minor units
pub const MAX_PRICE: i64 = 100_000_000_000;

pub fn price_in_range(amount: i64) -> bool { (-MAX_PRICE..=MAX_PRICE).contains(&amount) }

// =============================================================================
// Wire Types
// =============================================================================

/// Front/back image pair
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLayers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
}

impl ViewLayers {
    pub fn get(&self, view: View) -> Option<&str> {
        let image = match view { View::Front => &self.front, View::Back => &self.back };
        non_empty(image.as_deref())
    }
    pub fn set(&mut self, view: View, image: Option<String>) {
        match view { View::Front => self.front = image, View::Back => self.back = image }
    }
    pub fn is_empty(&self) -> bool { self.get(View::Front).is_none() && self.get(View::Back).is_none() }
}

/// Per-fabric overlay entry. Older catalogs stored a bare string, which only
/// ever described the front of the garment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FabricLayer {
    Front(String),
    Views(ViewLayers),
}

/// One selectable choice inside an option group
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOption {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<i64>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layers_by_fabric: BTreeMap<String, FabricLayer>,
    #[serde(default, skip_serializing_if = "ViewLayers::is_empty")]
    pub layers_by_view: ViewLayers,
    /// Front-only per-fabric previews from the first catalog revision
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fabric_preview_images: BTreeMap<String, String>,
}

impl StyleOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), ..Default::default() }
    }

    pub fn with_price(mut self, price_modifier: i64) -> Self {
        self.price_modifier = Some(price_modifier);
        self
    }

    pub fn price_modifier(&self) -> i64 { self.price_modifier.unwrap_or(0) }

    pub fn price_in_range(&self) -> bool { price_in_range(self.price_modifier()) }

    /// Flat display image: `image`, else `previewImage`
    pub fn display_image(&self) -> Option<&str> {
        non_empty(self.image.as_deref()).or_else(|| non_empty(self.preview_image.as_deref()))
    }

    fn normalized(mut self) -> Self {
        self.image = self.display_image().map(str::to_owned);
        self
    }
}

/// A selectable colour of a fabric
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricColor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// 2D customization fabric (pattern tile plus base garment renders)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricOption {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<FabricColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<i64>,
}

impl FabricOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), ..Default::default() }
    }

    pub fn price_modifier(&self) -> i64 { self.price_modifier.unwrap_or(0) }

    pub fn price_in_range(&self) -> bool { price_in_range(self.price_modifier()) }

    /// Pattern tile: `imageUrl`, else `image`, else `previewImage`
    pub fn display_image(&self) -> Option<&str> {
        non_empty(self.image_url.as_deref())
            .or_else(|| non_empty(self.image.as_deref()))
            .or_else(|| non_empty(self.preview_image.as_deref()))
    }

    /// Base garment render for a view
    pub fn base_image(&self, view: View) -> Option<&str> {
        match view {
            View::Front => non_empty(self.front_image.as_deref()),
            View::Back => non_empty(self.back_image.as_deref()),
        }
    }

    pub fn color(&self, name: &str) -> Option<&FabricColor> {
        self.colors.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn normalized(mut self) -> Self {
        self.image = self.display_image().map(str::to_owned);
        self
    }
}

/// Admin-defined group of mutually exclusive options
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroup {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub options: Vec<StyleOption>,
}

impl OptionGroup {
    /// Step identifier: the category key, or the group id when no key was given
    pub fn step_id(&self) -> StepId {
        if self.category.trim().is_empty() { StepId::new(self.id.clone()) } else { StepId::new(self.category.clone()) }
    }
}

/// The global shirt catalog served from `/api/data`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCatalog {
    #[serde(default)] pub fabrics: Vec<FabricOption>,
    #[serde(default)] pub collars: Vec<StyleOption>,
    #[serde(default)] pub cuffs: Vec<StyleOption>,
    #[serde(default)] pub pockets: Vec<StyleOption>,
    #[serde(default)] pub buttons: Vec<StyleOption>,
    #[serde(default)] pub sleeves: Vec<StyleOption>,
    #[serde(default)] pub plackets: Vec<StyleOption>,
    #[serde(default)] pub backs: Vec<StyleOption>,
    #[serde(default)] pub neckties: Vec<StyleOption>,
    #[serde(default)] pub bowties: Vec<StyleOption>,
}

impl LegacyCatalog {
    /// Id of the first fabric or option whose modifier exceeds [`MAX_PRICE`]
    pub fn out_of_range_price(&self) -> Option<&str> {
        let fabric = self.fabrics.iter().find(|f| !f.price_in_range()).map(|f| f.id.as_str());
        fabric.or_else(|| {
            [&self.collars, &self.cuffs, &self.pockets, &self.buttons, &self.sleeves,
                &self.plackets, &self.backs, &self.neckties, &self.bowties]
                .into_iter()
                .flatten()
                .find(|o| !o.price_in_range())
                .map(|o| o.id.as_str())
        })
    }

    /// `(step id, label, options)` in the canonical shirt order; placket has
    /// no step of its own but is still a priced selection.
    fn into_groups(self) -> Vec<(StepId, &'static str, Vec<StyleOption>)> {
        vec![
            ("sleeve".into(), "Sleeve", self.sleeves),
            ("collar".into(), "Collar", self.collars),
            ("cuff".into(), "Cuff", self.cuffs),
            ("chestpocket".into(), "Chest Pocket", self.pockets),
            ("button".into(), "Button", self.buttons),
            ("necktie".into(), "Necktie", self.neckties),
            ("bowtie".into(), "Bowtie", self.bowties),
            ("back".into(), "Back", self.backs),
            ("placket".into(), "Placket", self.plackets),
        ]
    }
}

/// Product-level customization block. `styles` keeps the admin's key order,
/// which becomes the wizard's step order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationOptions {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub styles: IndexMap<String, Vec<StyleOption>>,
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
}

// =============================================================================
// Normalization
// =============================================================================

/// Catalog as ingested, before normalization
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogShape {
    /// Global fixed-category shirt catalog
    Flat(LegacyCatalog),
    /// Per-product option groups
    Grouped { fabrics: Vec<FabricOption>, groups: Vec<OptionGroup> },
    /// Per-product legacy `styles` map for non-shirt garments
    Styles { fabrics: Vec<FabricOption>, styles: IndexMap<String, Vec<StyleOption>> },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogKind {
    #[default]
    Grouped,
    LegacyShirt,
    LegacyStyles,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogGroup {
    pub step: StepId,
    pub label: String,
    pub options: Vec<StyleOption>,
}

impl CatalogGroup {
    /// The option flagged `isDefault`, else the first one, else none
    pub fn default_option(&self) -> Option<&StyleOption> {
        self.options.iter().find(|o| o.is_default).or_else(|| self.options.first())
    }

    pub fn option(&self, id: &str) -> Option<&StyleOption> { self.options.iter().find(|o| o.id == id) }
}

/// Canonical catalog consumed by the configurator
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCatalog {
    pub kind: CatalogKind,
    pub fabrics: Vec<FabricOption>,
    pub groups: Vec<CatalogGroup>,
}

impl NormalizedCatalog {
    pub fn empty(kind: CatalogKind) -> Self { Self { kind, fabrics: vec![], groups: vec![] } }

    pub fn from_shape(shape: CatalogShape) -> Self {
        match shape {
            CatalogShape::Flat(mut legacy) => {
                let fabrics = normalize_fabrics(std::mem::take(&mut legacy.fabrics));
                let groups = legacy
                    .into_groups()
                    .into_iter()
                    .map(|(step, label, options)| CatalogGroup { step, label: label.to_string(), options: normalize_options(options) })
                    .collect();
                Self { kind: CatalogKind::LegacyShirt, fabrics, groups }
            }
            CatalogShape::Grouped { fabrics, mut groups } => {
                groups.sort_by_key(|g| g.order);
                let groups = groups
                    .into_iter()
                    .map(|g| {
                        let step = g.step_id();
                        let label = if g.label.trim().is_empty() { step.to_string() } else { g.label };
                        CatalogGroup { step, label, options: normalize_options(g.options) }
                    })
                    .collect();
                Self { kind: CatalogKind::Grouped, fabrics: normalize_fabrics(fabrics), groups }
            }
            CatalogShape::Styles { fabrics, styles } => {
                let groups = styles
                    .into_iter()
                    .map(|(key, options)| CatalogGroup { step: StepId::new(key.clone()), label: key, options: normalize_options(options) })
                    .collect();
                Self { kind: CatalogKind::LegacyStyles, fabrics: normalize_fabrics(fabrics), groups }
            }
        }
    }

    pub fn group(&self, step: &str) -> Option<&CatalogGroup> { self.groups.iter().find(|g| g.step == step) }

    pub fn options(&self, step: &str) -> &[StyleOption] {
        self.group(step).map(|g| g.options.as_slice()).unwrap_or(&[])
    }

    pub fn fabric(&self, id: &str) -> Option<&FabricOption> { self.fabrics.iter().find(|f| f.id == id) }

    pub fn is_empty(&self) -> bool { self.fabrics.is_empty() && self.groups.iter().all(|g| g.options.is_empty()) }
}

fn normalize_options(options: Vec<StyleOption>) -> Vec<StyleOption> {
    options.into_iter().map(StyleOption::normalized).collect()
}

fn normalize_fabrics(fabrics: Vec<FabricOption>) -> Vec<FabricOption> {
    fabrics.into_iter().map(FabricOption::normalized).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> { value.filter(|s| !s.trim().is_empty()) }
