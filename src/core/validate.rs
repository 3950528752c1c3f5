//! Charset validation for proposed names.
//!
//! Advisory only: an invalid name produces a warning and a sanitized
//! suggestion, never a blocked batch. The operator decides whether to take
//! the suggestion.

use serde::{Deserialize, Serialize};

/// Punctuation rejected in transient-object names.
pub const OBJECT_INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Character policy for persistent-asset names, supplied by the storage
/// collaborator. The default mirrors the same reserved punctuation, which
/// matches common storage layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharsetPolicy {
    pub asset_invalid_chars: Vec<char>,
}

impl Default for CharsetPolicy {
    fn default() -> Self {
        CharsetPolicy {
            asset_invalid_chars: OBJECT_INVALID_CHARS.to_vec(),
        }
    }
}

impl CharsetPolicy {
    fn invalid_chars(&self, is_asset: bool) -> &[char] {
        if is_asset {
            &self.asset_invalid_chars
        } else {
            OBJECT_INVALID_CHARS
        }
    }
}

/// Outcome of validating one name. `sanitized` is always populated; callers
/// ignore it when `ok` is true.
#[derive(Debug, Clone)]
pub struct Validation {
    pub ok: bool,
    pub sanitized: String,
}

/// Check `name` against the target-kind-specific charset policy.
pub fn validate(name: &str, is_asset: bool, policy: &CharsetPolicy) -> Validation {
    let invalid = policy.invalid_chars(is_asset);
    Validation {
        ok: !name.is_empty() && !name.contains(invalid),
        sanitized: sanitize(name, is_asset, policy),
    }
}

/// Replace every disallowed character with `_`.
pub fn sanitize(name: &str, is_asset: bool, policy: &CharsetPolicy) -> String {
    let invalid = policy.invalid_chars(is_asset);
    name.chars()
        .map(|c| if invalid.contains(&c) { '_' } else { c })
        .collect()
}
