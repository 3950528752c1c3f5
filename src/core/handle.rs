//! Handle and locator types for renamable entities.
//!
//! The engine never owns live entities. A `RenamableHandle` is a lightweight
//! snapshot supplied fresh by the host for every planning pass; a
//! `RenameRecord` keeps only the locator fields needed to re-resolve the
//! entity later (for reversal staleness checks).

use serde::{Deserialize, Serialize};

/// Snapshot of a renamable entity as supplied by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamableHandle {
    /// Stable identifier used for re-lookup after an operation completes.
    pub stable_id: String,
    /// Current display name.
    pub name: String,
    /// Kind tag, e.g. "GameObject", "Texture", "Material".
    pub kind: String,
    /// Persistent assets have durable storage semantics; transient objects
    /// live only in the host session.
    pub is_asset: bool,
    /// Stable storage locator, present when `is_asset` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
}

/// One entity's entry in a completed rename operation.
///
/// Deliberately a flat struct with a discriminator bool rather than an
/// asset/object hierarchy: both variants serialize and revert identically,
/// they only differ in how the host re-resolves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
    pub kind: String,
    pub is_asset: bool,
    pub old_name: String,
    pub new_name: String,
}

impl RenameRecord {
    /// Build the record for a successful rename of `handle` to `new_name`.
    ///
    /// Asset records keep the post-rename storage path so the locator stays
    /// valid after the storage layer moves the entity.
    pub fn for_rename(handle: &RenamableHandle, new_name: &str, new_path: Option<String>) -> Self {
        RenameRecord {
            stable_id: Some(handle.stable_id.clone()),
            asset_path: if handle.is_asset {
                new_path.or_else(|| handle.asset_path.clone())
            } else {
                None
            },
            kind: handle.kind.clone(),
            is_asset: handle.is_asset,
            old_name: handle.name.clone(),
            new_name: new_name.to_string(),
        }
    }

    /// Short human-readable locator for reports and status lines.
    pub fn locator_label(&self) -> String {
        match (&self.asset_path, &self.stable_id) {
            (Some(path), _) => path.clone(),
            (None, Some(id)) => format!("{}#{}", self.kind, id),
            (None, None) => self.kind.clone(),
        }
    }
}
