//! Overlay image resolution for chosen options.
//!
//! Images are opaque URLs here. Nothing is tinted or composited; the
//! renderer stacks the returned layers on top of the fabric's base image.

use serde::Serialize;

use super::configuration::Configuration;
use crate::domain::catalog::{FabricLayer, FabricOption, StyleOption};
use crate::domain::value_objects::{StepId, View};

/// Overlay image for `option` on the given fabric and view, first match wins:
///
/// 1. `layersByFabric[fabric]`: a bare string is a front-only image; a
///    front/back pair yields the entry for `view`, which may be missing.
/// 2. `layersByView[view]`, for artwork that does not depend on the fabric.
/// 3. `fabricPreviewImages[fabric]`, front view only.
/// 4. The flat `image`/`previewImage`, whatever the view. On the back view
///    this is usually front artwork; kept as a best-effort fallback.
/// 5. Nothing.
pub fn resolve_layer<'a>(option: &'a StyleOption, fabric: Option<&FabricOption>, view: View) -> Option<&'a str> {
    if let Some(layer) = fabric.and_then(|f| option.layers_by_fabric.get(&f.id)) {
        return match layer {
            FabricLayer::Front(image) => (view == View::Front).then_some(image.as_str()).filter(|s| !s.is_empty()),
            FabricLayer::Views(views) => views.get(view),
        };
    }
    if let Some(image) = option.layers_by_view.get(view) {
        return Some(image);
    }
    if view == View::Front {
        if let Some(image) = fabric.and_then(|f| option.fabric_preview_images.get(&f.id)).map(String::as_str).filter(|s| !s.is_empty()) {
            return Some(image);
        }
    }
    option.display_image()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub step: StepId,
    pub image: String,
}

/// Everything the renderer needs for one view
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub view: View,
    pub base: Option<String>,
    pub overlays: Vec<Layer>,
}

/// Base fabric render plus one overlay per chosen option that resolves to an
/// image. Overlays follow `steps`; selections without a step of their own
/// (the legacy placket) go last.
pub fn compose_preview(config: &Configuration, steps: &[StepId], view: View) -> Preview {
    let fabric = config.fabric();
    let base = fabric.and_then(|f| f.base_image(view).or_else(|| f.display_image())).map(str::to_owned);

    let mut ordered: Vec<(&StepId, &StyleOption)> = Vec::new();
    for step in steps {
        if let Some(option) = config.chosen(step.as_str()) { ordered.push((step, option)); }
    }
    for (step, selection) in config.selections() {
        if steps.contains(step) { continue; }
        if let Some(option) = selection.option() { ordered.push((step, option)); }
    }

    let overlays = ordered
        .into_iter()
        .filter_map(|(step, option)| resolve_layer(option, fabric, view).map(|image| Layer { step: step.clone(), image: image.to_string() }))
        .collect();
    Preview { view, base, overlays }
}
