use crate::core::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Base renamekit config directory (universal ~/.config/renamekit/ on all platforms)
pub fn renamekit() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("renamekit"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("renamekit"))
    }
}

/// Default convention rules file path
pub fn rules_json() -> Result<PathBuf> {
    Ok(renamekit()?.join("rules.json"))
}

/// History file path for a given catalog: `<catalog>.history.json`
pub fn history_for_catalog(catalog: &Path) -> PathBuf {
    let mut name = catalog
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "catalog".to_string());
    name.push_str(".history.json");
    catalog.with_file_name(name)
}
