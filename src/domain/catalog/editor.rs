//! Admin-side editing of a product's option groups.
//!
//! Groups and options get stable keys when loaded or created, and every edit
//! goes through a key. Positions only matter when exporting, where the
//! ordering indices are rewritten from the current order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{FabricLayer, OptionGroup, StyleOption, ViewLayers};
use crate::domain::value_objects::View;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionKey(u32);

#[derive(Clone, Debug)]
struct GroupEntry {
    group: OptionGroup,
    options: Vec<OptionKey>,
}

#[derive(Clone, Debug, Default)]
pub struct OptionGroupEditor {
    next_key: u32,
    group_order: Vec<GroupKey>,
    groups: BTreeMap<GroupKey, GroupEntry>,
    options: BTreeMap<OptionKey, (GroupKey, StyleOption)>,
}

impl OptionGroupEditor {
    pub fn new() -> Self { Self::default() }

    pub fn from_groups(groups: Vec<OptionGroup>) -> Self {
        let mut editor = Self::new();
        editor.load(groups);
        editor
    }

    fn load(&mut self, groups: Vec<OptionGroup>) {
        *self = Self { next_key: self.next_key, ..Self::default() };
        for mut group in groups {
            let options = std::mem::take(&mut group.options);
            let key = self.insert_group(group);
            for option in options {
                self.insert_option(key, option);
            }
        }
    }

    fn fresh(&mut self) -> u32 {
        self.next_key += 1;
        self.next_key
    }

    fn insert_group(&mut self, group: OptionGroup) -> GroupKey {
        let key = GroupKey(self.fresh());
        self.groups.insert(key, GroupEntry { group, options: vec![] });
        self.group_order.push(key);
        key
    }

    fn insert_option(&mut self, group: GroupKey, option: StyleOption) -> OptionKey {
        let key = OptionKey(self.fresh());
        self.options.insert(key, (group, option));
        if let Some(entry) = self.groups.get_mut(&group) { entry.options.push(key); }
        key
    }

    pub fn group_keys(&self) -> &[GroupKey] { &self.group_order }

    pub fn option_keys(&self, group: GroupKey) -> Result<&[OptionKey], EditorError> {
        self.groups.get(&group).map(|e| e.options.as_slice()).ok_or(EditorError::UnknownGroup(group))
    }

    pub fn group(&self, key: GroupKey) -> Result<&OptionGroup, EditorError> {
        self.groups.get(&key).map(|e| &e.group).ok_or(EditorError::UnknownGroup(key))
    }

    pub fn option(&self, key: OptionKey) -> Result<&StyleOption, EditorError> {
        self.options.get(&key).map(|(_, o)| o).ok_or(EditorError::UnknownOption(key))
    }

    pub fn option_mut(&mut self, key: OptionKey) -> Result<&mut StyleOption, EditorError> {
        self.options.get_mut(&key).map(|(_, o)| o).ok_or(EditorError::UnknownOption(key))
    }

    pub fn add_group(&mut self, label: impl Into<String>, category: impl Into<String>) -> GroupKey {
        let group = OptionGroup { label: label.into(), category: category.into(), ..Default::default() };
        self.insert_group(group)
    }

    pub fn remove_group(&mut self, key: GroupKey) -> Result<OptionGroup, EditorError> {
        let entry = self.groups.remove(&key).ok_or(EditorError::UnknownGroup(key))?;
        self.group_order.retain(|k| *k != key);
        for option in &entry.options { self.options.remove(option); }
        Ok(entry.group)
    }

    pub fn rename_group(&mut self, key: GroupKey, label: impl Into<String>) -> Result<(), EditorError> {
        self.groups.get_mut(&key).ok_or(EditorError::UnknownGroup(key))?.group.label = label.into();
        Ok(())
    }

    pub fn set_group_category(&mut self, key: GroupKey, category: impl Into<String>) -> Result<(), EditorError> {
        self.groups.get_mut(&key).ok_or(EditorError::UnknownGroup(key))?.group.category = category.into();
        Ok(())
    }

    /// Move a group to `index` (clamped to the end)
    pub fn move_group(&mut self, key: GroupKey, index: usize) -> Result<(), EditorError> {
        let from = self.group_order.iter().position(|k| *k == key).ok_or(EditorError::UnknownGroup(key))?;
        let key = self.group_order.remove(from);
        let index = index.min(self.group_order.len());
        self.group_order.insert(index, key);
        Ok(())
    }

    pub fn add_option(&mut self, group: GroupKey, name: impl Into<String>) -> Result<OptionKey, EditorError> {
        if !self.groups.contains_key(&group) { return Err(EditorError::UnknownGroup(group)); }
        Ok(self.insert_option(group, StyleOption { name: name.into(), ..Default::default() }))
    }

    pub fn remove_option(&mut self, key: OptionKey) -> Result<StyleOption, EditorError> {
        let (group, option) = self.options.remove(&key).ok_or(EditorError::UnknownOption(key))?;
        if let Some(entry) = self.groups.get_mut(&group) { entry.options.retain(|k| *k != key); }
        Ok(option)
    }

    pub fn move_option(&mut self, key: OptionKey, index: usize) -> Result<(), EditorError> {
        let group = self.options.get(&key).map(|(g, _)| *g).ok_or(EditorError::UnknownOption(key))?;
        let entry = self.groups.get_mut(&group).ok_or(EditorError::UnknownGroup(group))?;
        entry.options.retain(|k| *k != key);
        let index = index.min(entry.options.len());
        entry.options.insert(index, key);
        Ok(())
    }

    pub fn set_price(&mut self, key: OptionKey, price_modifier: Option<i64>) -> Result<(), EditorError> {
        self.option_mut(key)?.price_modifier = price_modifier;
        Ok(())
    }

    /// Flag one option as its group's default, clearing the flag on siblings
    pub fn set_default(&mut self, key: OptionKey) -> Result<(), EditorError> {
        let group = self.options.get(&key).map(|(g, _)| *g).ok_or(EditorError::UnknownOption(key))?;
        for (k, (g, option)) in self.options.iter_mut() {
            if *g == group { option.is_default = *k == key; }
        }
        Ok(())
    }

    /// Set or clear the overlay of an option for one fabric and view. A
    /// legacy front-only string entry is upgraded to a front/back pair.
    pub fn set_fabric_layer(&mut self, key: OptionKey, fabric_id: &str, view: View, image: Option<String>) -> Result<(), EditorError> {
        let option = self.option_mut(key)?;
        let mut layers = match option.layers_by_fabric.remove(fabric_id) {
            Some(FabricLayer::Views(v)) => v,
            Some(FabricLayer::Front(front)) => ViewLayers { front: Some(front), back: None },
            None => ViewLayers::default(),
        };
        layers.set(view, image);
        if !layers.is_empty() {
            option.layers_by_fabric.insert(fabric_id.to_string(), FabricLayer::Views(layers));
        }
        Ok(())
    }

    /// Fabric-independent overlay, e.g. a belt whose artwork never changes
    pub fn set_view_layer(&mut self, key: OptionKey, view: View, image: Option<String>) -> Result<(), EditorError> {
        self.option_mut(key)?.layers_by_view.set(view, image);
        Ok(())
    }

    /// Current state as groups, with ordering indices taken from position
    pub fn to_groups(&self) -> Vec<OptionGroup> {
        self.group_order
            .iter()
            .enumerate()
            .filter_map(|(gi, key)| self.groups.get(key).map(|entry| (gi, entry)))
            .map(|(gi, entry)| {
                let mut group = entry.group.clone();
                group.order = gi as i32;
                group.options = entry
                    .options
                    .iter()
                    .filter_map(|k| self.options.get(k))
                    .enumerate()
                    .map(|(oi, (_, option))| StyleOption { order: oi as i32, ..option.clone() })
                    .collect();
                group
            })
            .collect()
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        serde_json::to_string_pretty(&self.to_groups()).map_err(|e| EditorError::InvalidJson(e.to_string()))
    }

    /// Replace everything from the advanced JSON editor. On any error the
    /// current edit is left exactly as it was.
    pub fn import_json(&mut self, json: &str) -> Result<(), EditorError> {
        let groups: Vec<OptionGroup> = serde_json::from_str(json).map_err(|e| EditorError::InvalidJson(e.to_string()))?;
        let mut seen = HashSet::new();
        for group in &groups {
            let step = group.step_id();
            if step.as_str().trim().is_empty() { return Err(EditorError::MissingCategory); }
            if !seen.insert(step.clone()) { return Err(EditorError::DuplicateCategory(step.to_string())); }
        }
        self.load(groups);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError { UnknownGroup(GroupKey), UnknownOption(OptionKey), InvalidJson(String), MissingCategory, DuplicateCategory(String) }
impl std::error::Error for EditorError {}
impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownGroup(k) => write!(f, "Unknown option group {}", k.0),
            Self::UnknownOption(k) => write!(f, "Unknown option {}", k.0),
            Self::InvalidJson(e) => write!(f, "Invalid option JSON: {e}"),
            Self::MissingCategory => write!(f, "Every option group needs a category or id"),
            Self::DuplicateCategory(c) => write!(f, "Duplicate option group category '{c}'"),
        }
    }
}
