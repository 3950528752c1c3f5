//! Rename planning — the auditable preview.
//!
//! Orchestrates transform → duplicate resolution → validation over a target
//! list. Planning is pure and partial-failure tolerant: one bad target gets
//! an index-tagged warning, never aborts the batch.
//!
//! Entry order matters: `add_index` numbering and duplicate markers are
//! position-dependent, so re-planning a reordered target list can
//! legitimately propose different names.

use crate::core::collide;
use crate::core::handle::RenamableHandle;
use crate::core::transform::{self, RenameRule};
use crate::core::validate::{self, CharsetPolicy};
use serde::Serialize;

/// Per-target output of planning.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub handle: RenamableHandle,
    pub original: String,
    pub proposed: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PlanEntry {
    /// True when executing this entry would change nothing.
    pub fn is_noop(&self) -> bool {
        self.original == self.proposed
    }
}

/// The preview output of a planning pass; not yet applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePlan {
    pub entries: Vec<PlanEntry>,
}

impl RenamePlan {
    pub fn warning_count(&self) -> usize {
        self.entries.iter().map(|e| e.warnings.len()).sum()
    }

    pub fn change_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_noop()).count()
    }
}

/// Plan a rename batch over `targets` in input order.
///
/// Duplicate resolution runs once over the whole batch — uniqueness is
/// global within the batch, not per kind.
pub fn plan(targets: &[RenamableHandle], rule: &RenameRule, policy: &CharsetPolicy) -> RenamePlan {
    let mut proposed = Vec::with_capacity(targets.len());
    let mut warnings: Vec<Vec<String>> = Vec::with_capacity(targets.len());

    for (index, target) in targets.iter().enumerate() {
        let out = transform::transform(&target.name, rule, index);
        warnings.push(
            out.warnings
                .into_iter()
                .map(|w| format!("[{}] {}", index + 1, w))
                .collect(),
        );
        proposed.push(out.name);
    }

    let resolved = collide::resolve_duplicates(&proposed);

    let entries = targets
        .iter()
        .zip(proposed.iter().zip(resolved))
        .zip(warnings)
        .map(|((target, (raw, name)), mut entry_warnings)| {
            if &name != raw {
                entry_warnings.push(format!(
                    "Duplicate proposed name '{}'; disambiguated to '{}'",
                    raw, name
                ));
            }

            let validation = validate::validate(&name, target.is_asset, policy);
            if !validation.ok {
                entry_warnings.push(format!(
                    "'{}' contains disallowed characters; suggested: '{}'",
                    name, validation.sanitized
                ));
            }

            PlanEntry {
                handle: target.clone(),
                original: target.name.clone(),
                proposed: name,
                warnings: entry_warnings,
            }
        })
        .collect();

    RenamePlan { entries }
}
