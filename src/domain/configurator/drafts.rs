//! Locally saved configuration drafts.
//!
//! Drafts live in a single JSON file on the customer's side, newest first,
//! capped at [`MAX_DRAFTS`]. Nothing here touches the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::configuration::Configuration;

pub const MAX_DRAFTS: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub saved_at: DateTime<Utc>,
    pub total_price: i64,
    pub configuration: Configuration,
}

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("failed to access drafts file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode drafts: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Put `draft` at the front, replacing any older copy with the same id, and
/// drop whatever falls past the cap.
pub fn push_draft(drafts: &mut Vec<Draft>, draft: Draft) {
    drafts.retain(|d| d.id != draft.id);
    drafts.insert(0, draft);
    drafts.truncate(MAX_DRAFTS);
}

pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    /// All drafts, newest first. A missing or unreadable file is an empty list.
    pub fn list(&self) -> Vec<Draft> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return vec![],
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read drafts file");
                return vec![];
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "drafts file is corrupt, ignoring it");
            vec![]
        })
    }

    pub fn get(&self, id: Uuid) -> Option<Draft> { self.list().into_iter().find(|d| d.id == id) }

    pub fn save(&self, draft: Draft) -> Result<(), DraftError> {
        let mut drafts = self.list();
        let id = draft.id;
        push_draft(&mut drafts, draft);
        self.write(&drafts)?;
        info!(draft_id = %id, count = drafts.len(), "saved configuration draft");
        Ok(())
    }

    /// Returns whether a draft was removed
    pub fn delete(&self, id: Uuid) -> Result<bool, DraftError> {
        let mut drafts = self.list();
        let before = drafts.len();
        drafts.retain(|d| d.id != id);
        if drafts.len() == before { return Ok(false); }
        self.write(&drafts)?;
        Ok(true)
    }

    fn write(&self, drafts: &[Draft]) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(drafts)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProductCategory;

    fn draft(id: Uuid) -> Draft {
        Draft {
            id, product_id: None, product_name: "Shirt".into(), saved_at: Utc::now(), total_price: 5000,
            configuration: Configuration::new(ProductCategory::Shirt),
        }
    }

    #[test]
    fn test_push_caps_and_orders() {
        let mut drafts = Vec::new();
        let ids: Vec<Uuid> = (0..25).map(|_| Uuid::new_v4()).collect();
        for id in &ids { push_draft(&mut drafts, draft(*id)); }
        assert_eq!(drafts.len(), MAX_DRAFTS);
        assert_eq!(drafts[0].id, ids[24]);
        assert!(!drafts.iter().any(|d| d.id == ids[0]));

        push_draft(&mut drafts, draft(ids[10]));
        assert_eq!(drafts[0].id, ids[10]);
        assert_eq!(drafts.iter().filter(|d| d.id == ids[10]).count(), 1);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DraftStore::new(dir.path().join("nested").join("drafts.json"));
        assert!(store.list().is_empty());

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.save(draft(a)).unwrap();
        store.save(draft(b)).unwrap();
        let listed: Vec<Uuid> = store.list().iter().map(|d| d.id).collect();
        assert_eq!(listed, vec![b, a]);
        assert!(store.get(a).is_some());

        assert!(store.delete(a).unwrap());
        assert!(!store.delete(a).unwrap());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        fs::write(&path, "{ not json").unwrap();
        let store = DraftStore::new(&path);
        assert!(store.list().is_empty());
        store.save(draft(Uuid::new_v4())).unwrap();
        assert_eq!(store.list().len(), 1);
    }
}
