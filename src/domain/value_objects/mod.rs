//! Value Objects for the tailoring configurator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Garment category a product belongs to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    #[default]
    Shirt,
    Suit,
    Pants,
    Blazer,
    Vest,
    Tuxedo,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shirt => "shirt",
            Self::Suit => "suit",
            Self::Pants => "pants",
            Self::Blazer => "blazer",
            Self::Vest => "vest",
            Self::Tuxedo => "tuxedo",
        }
    }

    /// Measurement fields that apply to garments of this category
    pub fn measurement_fields(&self) -> &'static [MeasurementField] {
        use MeasurementField::*;
        match self {
            Self::Shirt => &[Neck, Chest, Waist, Hips, Shoulder, SleeveLength, ShirtLength, Bicep, Wrist],
            Self::Suit | Self::Tuxedo => &[Chest, Waist, Hips, Shoulder, SleeveLength, JacketLength, Inseam, Outseam, Thigh],
            Self::Blazer => &[Chest, Waist, Hips, Shoulder, SleeveLength, JacketLength, Bicep],
            Self::Vest => &[Chest, Waist, Shoulder, VestLength],
            Self::Pants => &[Waist, Hips, Inseam, Outseam, Thigh, Knee, LegOpening, Rise],
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Which side of the garment is being rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Front,
    Back,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Front => "front", Self::Back => "back" }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Identifier of one configurator step.
///
/// Option group categories are free-form, so a step id is just a string;
/// `fabric` and `measurements` are the two fixed steps every product has.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub const FABRIC: &'static str = "fabric";
    pub const MEASUREMENTS: &'static str = "measurements";

    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    pub fn fabric() -> Self { Self::new(Self::FABRIC) }
    pub fn measurements() -> Self { Self::new(Self::MEASUREMENTS) }
    pub fn as_str(&self) -> &str { &self.0 }

    /// Steps that offer an explicit "none" choice
    pub fn is_optional(&self) -> bool { matches!(self.0.as_str(), "back" | "necktie" | "bowtie") }

    /// Steps backed by option lists rather than fabric or measurement input
    pub fn is_style_step(&self) -> bool { !matches!(self.0.as_str(), Self::FABRIC | Self::MEASUREMENTS) }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for StepId {
    fn from(value: String) -> Self { Self(value) }
}

impl PartialEq<&str> for StepId {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

/// Named body measurement captured on the measurements step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementField {
    Neck,
    Chest,
    Waist,
    Hips,
    Shoulder,
    SleeveLength,
    ShirtLength,
    JacketLength,
    VestLength,
    Bicep,
    Wrist,
    Inseam,
    Outseam,
    Thigh,
    Knee,
    LegOpening,
    Rise,
}

impl MeasurementField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neck => "neck",
            Self::Chest => "chest",
            Self::Waist => "waist",
            Self::Hips => "hips",
            Self::Shoulder => "shoulder",
            Self::SleeveLength => "sleeveLength",
            Self::ShirtLength => "shirtLength",
            Self::JacketLength => "jacketLength",
            Self::VestLength => "vestLength",
            Self::Bicep => "bicep",
            Self::Wrist => "wrist",
            Self::Inseam => "inseam",
            Self::Outseam => "outseam",
            Self::Thigh => "thigh",
            Self::Knee => "knee",
            Self::LegOpening => "legOpening",
            Self::Rise => "rise",
        }
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// `#rrggbb` colour value object, stored lowercase
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn new(value: impl Into<String>) -> Result<Self, HexColorError> {
        let value = value.into().trim().to_lowercase();
        let digits = value.strip_prefix('#').ok_or(HexColorError::MissingHash)?;
        if digits.len() != 6 && digits.len() != 3 { return Err(HexColorError::BadLength); }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) { return Err(HexColorError::NotHex); }
        Ok(Self(value))
    }
    pub fn white() -> Self { Self("#ffffff".to_string()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for HexColor { fn default() -> Self { Self::white() } }

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl TryFrom<String> for HexColor {
    type Error = HexColorError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self { value.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum HexColorError { MissingHash, BadLength, NotHex }
impl std::error::Error for HexColorError {}
impl fmt::Display for HexColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHash => write!(f, "colour must start with '#'"),
            Self::BadLength => write!(f, "colour must have 3 or 6 hex digits"),
            Self::NotHex => write!(f, "colour contains non-hex characters"),
        }
    }
}
