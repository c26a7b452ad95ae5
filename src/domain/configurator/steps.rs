//! Wizard steps derived from the catalog, and the active step/view pointer.

use serde::Serialize;

use super::configuration::{Configuration, ConfigurationError};
use crate::domain::catalog::{CatalogKind, NormalizedCatalog};
use crate::domain::value_objects::{StepId, View};

/// Canonical step order for legacy shirt catalogs
pub const LEGACY_SHIRT_STEPS: [&str; 10] =
    ["fabric", "sleeve", "collar", "cuff", "chestpocket", "button", "necktie", "bowtie", "back", "measurements"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    pub id: StepId,
    pub label: String,
    pub optional: bool,
}

/// Ordered list of steps for the current catalog and selections.
///
/// Grouped and legacy-styles catalogs get one step per group between
/// `fabric` and `measurements`. Legacy shirts follow the canonical order,
/// skipping empty lists, and drop `cuff` while a half sleeve is selected.
pub fn derive_steps(catalog: &NormalizedCatalog, config: &Configuration) -> Vec<StepId> {
    let mut steps = vec![StepId::fabric()];
    match catalog.kind {
        CatalogKind::Grouped | CatalogKind::LegacyStyles => {
            steps.extend(catalog.groups.iter().map(|g| g.step.clone()));
        }
        CatalogKind::LegacyShirt => {
            let half_sleeve = config.chosen("sleeve").map(|s| s.name.to_lowercase().contains("half")).unwrap_or(false);
            steps.extend(
                LEGACY_SHIRT_STEPS
                    .iter()
                    .filter(|s| StepId::from(**s).is_style_step())
                    .filter(|s| !(half_sleeve && **s == "cuff"))
                    .filter(|s| !catalog.options(s).is_empty())
                    .map(|s| StepId::from(*s)),
            );
        }
    }
    steps.push(StepId::measurements());
    steps
}

pub fn describe_steps(catalog: &NormalizedCatalog, steps: &[StepId]) -> Vec<StepDescriptor> {
    steps
        .iter()
        .map(|id| {
            let label = match id.as_str() {
                StepId::FABRIC => "Fabric".to_string(),
                StepId::MEASUREMENTS => "Measurements".to_string(),
                other => catalog.group(other).map(|g| g.label.clone()).unwrap_or_else(|| other.to_string()),
            };
            StepDescriptor { id: id.clone(), label, optional: id.is_optional() }
        })
        .collect()
}

/// Active step and view for one editing session
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepNavigator {
    steps: Vec<StepId>,
    active: StepId,
    view: View,
}

impl StepNavigator {
    pub fn new(steps: Vec<StepId>) -> Self {
        let active = steps.first().cloned().unwrap_or_else(StepId::fabric);
        Self { steps, active, view: View::Front }
    }

    pub fn steps(&self) -> &[StepId] { &self.steps }
    pub fn active(&self) -> &StepId { &self.active }
    pub fn view(&self) -> View { self.view }
    pub fn set_view(&mut self, view: View) { self.view = view; }

    fn position(&self) -> Option<usize> { self.steps.iter().position(|s| *s == self.active) }

    /// Swap in a freshly derived step list. When the active step is gone it
    /// resets to the first step (or `fabric`); returns whether that happened.
    pub fn refresh(&mut self, steps: Vec<StepId>) -> bool {
        self.steps = steps;
        if self.position().is_some() { return false; }
        self.active = self.steps.first().cloned().unwrap_or_else(StepId::fabric);
        true
    }

    pub fn go_to(&mut self, step: &str) -> Result<(), ConfigurationError> {
        let found = self.steps.iter().find(|s| *s == &step).cloned().ok_or_else(|| ConfigurationError::UnknownStep(step.into()))?;
        self.active = found;
        Ok(())
    }

    /// Advance, staying put on the last step
    pub fn next(&mut self) -> &StepId {
        if let Some(i) = self.position() {
            if let Some(step) = self.steps.get(i + 1) { self.active = step.clone(); }
        }
        &self.active
    }

    /// Go back, staying put on the first step
    pub fn previous(&mut self) -> &StepId {
        if let Some(i) = self.position() {
            if i > 0 { self.active = self.steps[i - 1].clone(); }
        }
        &self.active
    }
}
