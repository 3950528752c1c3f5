//! Host seam: the collaborator surface the engine renames through.
//!
//! The engine is host-agnostic. Anything that can enumerate targets, apply
//! a single rename, and re-resolve an entity from a `RenameRecord` locator
//! can drive it. `MemoryHost` is the in-memory implementation used by the
//! test suite and available to embedders; `core::catalog` provides a
//! JSON-file-backed implementation for the CLI.

use crate::core::handle::{RenamableHandle, RenameRecord};
use std::collections::HashSet;

/// Target selection passed to `enumerate_targets`.
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    /// Restrict to a kind tag. `None` matches every kind.
    pub kind: Option<String>,
    /// Restrict to specific current display names. Empty matches everything.
    pub names: Vec<String>,
}

impl TargetFilter {
    pub fn matches(&self, handle: &RenamableHandle) -> bool {
        if let Some(kind) = &self.kind {
            if !handle.kind.eq_ignore_ascii_case(kind) {
                return false;
            }
        }
        if !self.names.is_empty() && !self.names.iter().any(|n| n == &handle.name) {
            return false;
        }
        true
    }
}

/// External collaborator contract for enumeration, renaming, and re-lookup.
///
/// `rename` reports success as a bool rather than an error: a refused rename
/// (storage collision, empty name) is an expected per-entry outcome, not a
/// batch failure.
pub trait RenameHost {
    /// Supply fresh handles for a planning pass.
    fn enumerate_targets(&self, filter: &TargetFilter) -> Vec<RenamableHandle>;

    /// Apply one rename. Persistent-asset renames may be refused on a
    /// storage-layer name collision; transient renames succeed for any
    /// non-empty name.
    fn rename(&mut self, handle: &RenamableHandle, new_name: &str) -> bool;

    /// Re-resolve a live handle from a record's locator. Returns `None`
    /// when the entity no longer exists.
    fn resolve(&self, record: &RenameRecord) -> Option<RenamableHandle>;

    /// Fire-and-forget hint that persistent storage changed. Called at most
    /// once per executed or reversed batch.
    fn refresh_persistent_view(&mut self) {}
}

/// In-memory host for tests and embedders without a real backing store.
#[derive(Debug, Default)]
pub struct MemoryHost {
    entries: Vec<RenamableHandle>,
    /// New names the host refuses, for exercising per-entry failure paths.
    refuse_names: HashSet<String>,
    refresh_count: usize,
}

impl MemoryHost {
    pub fn new(entries: Vec<RenamableHandle>) -> Self {
        MemoryHost {
            entries,
            refuse_names: HashSet::new(),
            refresh_count: 0,
        }
    }

    /// Convenience constructor: transient objects of one kind.
    pub fn with_objects(kind: &str, names: &[&str]) -> Self {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| RenamableHandle {
                stable_id: format!("obj-{}", i + 1),
                name: name.to_string(),
                kind: kind.to_string(),
                is_asset: false,
                asset_path: None,
            })
            .collect();
        Self::new(entries)
    }

    /// Make `rename` refuse a specific target name.
    pub fn refuse(&mut self, new_name: &str) {
        self.refuse_names.insert(new_name.to_string());
    }

    /// Rename an entry out-of-band, bypassing the engine. Simulates an
    /// external mutation between execute and reverse.
    pub fn rename_externally(&mut self, stable_id: &str, new_name: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.stable_id == stable_id) {
            entry.name = new_name.to_string();
        }
    }

    /// Remove an entry out-of-band.
    pub fn remove(&mut self, stable_id: &str) {
        self.entries.retain(|e| e.stable_id != stable_id);
    }

    pub fn name_of(&self, stable_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.stable_id == stable_id)
            .map(|e| e.name.as_str())
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }
}

impl RenameHost for MemoryHost {
    fn enumerate_targets(&self, filter: &TargetFilter) -> Vec<RenamableHandle> {
        self.entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    fn rename(&mut self, handle: &RenamableHandle, new_name: &str) -> bool {
        if new_name.is_empty() || self.refuse_names.contains(new_name) {
            return false;
        }
        // Storage-layer collision: two assets cannot share a name
        if handle.is_asset
            && self
                .entries
                .iter()
                .any(|e| e.is_asset && e.stable_id != handle.stable_id && e.name == new_name)
        {
            return false;
        }
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.stable_id == handle.stable_id)
        else {
            return false;
        };
        entry.name = new_name.to_string();
        if let Some(path) = &entry.asset_path {
            entry.asset_path = Some(rewrite_path_name(path, new_name));
        }
        true
    }

    fn resolve(&self, record: &RenameRecord) -> Option<RenamableHandle> {
        if let Some(id) = &record.stable_id {
            if let Some(entry) = self.entries.iter().find(|e| &e.stable_id == id) {
                return Some(entry.clone());
            }
        }
        if record.is_asset {
            if let Some(path) = &record.asset_path {
                return self
                    .entries
                    .iter()
                    .find(|e| e.asset_path.as_ref() == Some(path) && e.kind == record.kind)
                    .cloned();
            }
        }
        None
    }

    fn refresh_persistent_view(&mut self) {
        self.refresh_count += 1;
    }
}

/// Replace the final path segment's stem with `new_name`, keeping any
/// extension.
pub(crate) fn rewrite_path_name(path: &str, new_name: &str) -> String {
    let (dir, file) = match path.rfind('/') {
        Some(idx) => (&path[..idx + 1], &path[idx + 1..]),
        None => ("", path),
    };
    let ext = match file.rfind('.') {
        Some(idx) if idx > 0 => &file[idx..],
        _ => "",
    };
    format!("{}{}{}", dir, new_name, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, name: &str, path: &str) -> RenamableHandle {
        RenamableHandle {
            stable_id: id.to_string(),
            name: name.to_string(),
            kind: "Texture".to_string(),
            is_asset: true,
            asset_path: Some(path.to_string()),
        }
    }

    #[test]
    fn filter_matches_kind_case_insensitively() {
        let handle = asset("t1", "grass", "textures/grass.png");
        let filter = TargetFilter {
            kind: Some("texture".to_string()),
            names: Vec::new(),
        };
        assert!(filter.matches(&handle));
    }

    #[test]
    fn filter_restricts_by_name() {
        let handle = asset("t1", "grass", "textures/grass.png");
        let filter = TargetFilter {
            kind: None,
            names: vec!["stone".to_string()],
        };
        assert!(!filter.matches(&handle));
    }

    #[test]
    fn rename_rejects_empty_name() {
        let mut host = MemoryHost::with_objects("GameObject", &["a"]);
        let handle = host.enumerate_targets(&TargetFilter::default())[0].clone();
        assert!(!host.rename(&handle, ""));
    }

    #[test]
    fn asset_rename_rejects_storage_collision() {
        let mut host = MemoryHost::new(vec![
            asset("t1", "grass", "textures/grass.png"),
            asset("t2", "stone", "textures/stone.png"),
        ]);
        let handle = host.enumerate_targets(&TargetFilter::default())[0].clone();
        assert!(!host.rename(&handle, "stone"));
        assert_eq!(host.name_of("t1"), Some("grass"));
    }

    #[test]
    fn asset_rename_updates_storage_path() {
        let mut host = MemoryHost::new(vec![asset("t1", "grass", "textures/grass.png")]);
        let handle = host.enumerate_targets(&TargetFilter::default())[0].clone();
        assert!(host.rename(&handle, "dirt"));

        let record = RenameRecord {
            stable_id: None,
            asset_path: Some("textures/dirt.png".to_string()),
            kind: "Texture".to_string(),
            is_asset: true,
            old_name: "grass".to_string(),
            new_name: "dirt".to_string(),
        };
        assert!(host.resolve(&record).is_some());
    }

    #[test]
    fn resolve_prefers_stable_id() {
        let host = MemoryHost::with_objects("GameObject", &["a", "b"]);
        let record = RenameRecord {
            stable_id: Some("obj-2".to_string()),
            asset_path: None,
            kind: "GameObject".to_string(),
            is_asset: false,
            old_name: "b".to_string(),
            new_name: "c".to_string(),
        };
        let resolved = host.resolve(&record).unwrap();
        assert_eq!(resolved.name, "b");
    }

    #[test]
    fn resolve_returns_none_for_deleted_entity() {
        let mut host = MemoryHost::with_objects("GameObject", &["a"]);
        host.remove("obj-1");
        let record = RenameRecord {
            stable_id: Some("obj-1".to_string()),
            asset_path: None,
            kind: "GameObject".to_string(),
            is_asset: false,
            old_name: "a".to_string(),
            new_name: "b".to_string(),
        };
        assert!(host.resolve(&record).is_none());
    }

    #[test]
    fn rewrite_path_name_keeps_extension() {
        assert_eq!(
            rewrite_path_name("textures/grass.png", "dirt"),
            "textures/dirt.png"
        );
        assert_eq!(rewrite_path_name("grass.png", "dirt"), "dirt.png");
        assert_eq!(rewrite_path_name("materials/wood", "oak"), "materials/oak");
    }
}
