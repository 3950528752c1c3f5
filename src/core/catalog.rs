//! JSON-file-backed object catalog — the CLI's concrete `RenameHost`.
//!
//! A catalog is a flat list of entries, loaded whole and written back
//! atomically. Persistent-asset entries carry a storage path whose filename
//! segment tracks the entry name; renames of assets are refused when
//! another asset already holds the target name, mirroring a storage layer
//! rejecting on collision.

use crate::core::error::{Error, Result};
use crate::core::handle::{RenamableHandle, RenameRecord};
use crate::core::host::{rewrite_path_name, RenameHost, TargetFilter};
use crate::utils::io;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub is_asset: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CatalogEntry {
    fn to_handle(&self) -> RenamableHandle {
        RenamableHandle {
            stable_id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            is_asset: self.is_asset,
            asset_path: self.path.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog file at `path`.
    pub fn init(path: &Path) -> Result<Self> {
        let catalog = Catalog {
            path: path.to_path_buf(),
            entries: Vec::new(),
        };
        catalog.save()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::catalog_not_found(path.display().to_string()));
        }
        let raw = io::read_file(path, "read catalog")?;
        let file: CatalogFile = serde_json::from_str(&raw)
            .map_err(|e| Error::validation_invalid_json(e, Some("parse catalog".to_string())))?;
        Ok(Catalog {
            path: path.to_path_buf(),
            entries: file.entries,
        })
    }

    pub fn save(&self) -> Result<()> {
        let file = CatalogFile {
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::internal_json(e.to_string(), Some("serialize catalog".to_string())))?;
        io::write_file_atomic(&self.path, &json, "write catalog")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Add an entry with a generated stable id. Asset entries get a storage
    /// path under `assets/<kind>/`.
    pub fn add(&mut self, name: &str, kind: &str, is_asset: bool) -> Result<&CatalogEntry> {
        if name.is_empty() {
            return Err(Error::validation_invalid_argument(
                "name",
                "Entry name must not be empty",
                None,
            ));
        }
        if is_asset && self.entries.iter().any(|e| e.is_asset && e.name == name) {
            return Err(Error::validation_invalid_argument(
                "name",
                format!("An asset named '{}' already exists", name),
                Some(name.to_string()),
            ));
        }

        let path = is_asset.then(|| format!("assets/{}/{}", kind.to_lowercase(), name));
        self.entries.push(CatalogEntry {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            is_asset,
            path,
        });
        Ok(self.entries.last().expect("entry just pushed"))
    }

    /// Remove an entry by current name.
    pub fn remove(&mut self, name: &str) -> Result<CatalogEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| Error::catalog_entry_not_found(name))?;
        Ok(self.entries.remove(idx))
    }
}

impl RenameHost for Catalog {
    fn enumerate_targets(&self, filter: &TargetFilter) -> Vec<RenamableHandle> {
        self.entries
            .iter()
            .map(CatalogEntry::to_handle)
            .filter(|h| filter.matches(h))
            .collect()
    }

    fn rename(&mut self, handle: &RenamableHandle, new_name: &str) -> bool {
        if new_name.is_empty() {
            return false;
        }
        if handle.is_asset
            && self
                .entries
                .iter()
                .any(|e| e.is_asset && e.id != handle.stable_id && e.name == new_name)
        {
            return false;
        }
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == handle.stable_id) else {
            return false;
        };
        entry.name = new_name.to_string();
        if let Some(path) = &entry.path {
            entry.path = Some(rewrite_path_name(path, new_name));
        }
        true
    }

    fn resolve(&self, record: &RenameRecord) -> Option<RenamableHandle> {
        if let Some(id) = &record.stable_id {
            if let Some(entry) = self.entries.iter().find(|e| &e.id == id) {
                return Some(entry.to_handle());
            }
        }
        if record.is_asset {
            if let Some(path) = &record.asset_path {
                return self
                    .entries
                    .iter()
                    .find(|e| e.path.as_ref() == Some(path) && e.kind == record.kind)
                    .map(CatalogEntry::to_handle);
            }
        }
        None
    }

    fn refresh_persistent_view(&mut self) {
        crate::log_status!("catalog", "Asset view refresh requested");
    }
}
