//! Plan execution — apply a confirmed plan through the host and record the
//! outcome.
//!
//! Per-entry failures are non-fatal: a refused rename is logged, excluded
//! from the operation record, and the batch continues. No-op entries are
//! skipped before the host is ever called, so history carries no noise.

use crate::core::handle::RenameRecord;
use crate::core::history::{HistoryLedger, OperationRecord};
use crate::core::host::RenameHost;
use crate::core::plan::RenamePlan;
use crate::log_status;
use serde::Serialize;

/// Aggregate outcome of one executed batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    /// Entries in the plan.
    pub attempted: usize,
    /// Entries the host renamed successfully.
    pub renamed: usize,
    /// Entries skipped because the proposed name equals the original.
    pub skipped_noop: usize,
    /// Display names of entries the host refused.
    pub failed: Vec<String>,
    /// Whether an operation record was added to the ledger.
    pub recorded: bool,
}

/// Execute `plan` against `host`, recording the completed batch in `ledger`.
///
/// If zero entries actually change, nothing is recorded and the ledger is
/// untouched. When at least one renamed entry is a persistent asset, the
/// host gets exactly one `refresh_persistent_view` call for the batch.
pub fn execute(
    plan: &RenamePlan,
    description: &str,
    host: &mut dyn RenameHost,
    ledger: &mut HistoryLedger,
) -> ExecutionSummary {
    let mut records: Vec<RenameRecord> = Vec::new();
    let mut skipped_noop = 0usize;
    let mut failed = Vec::new();
    let mut renamed_asset = false;

    for entry in &plan.entries {
        if entry.is_noop() {
            skipped_noop += 1;
            continue;
        }

        if !host.rename(&entry.handle, &entry.proposed) {
            log_status!(
                "rename",
                "Host refused '{}' -> '{}'",
                entry.original,
                entry.proposed
            );
            failed.push(entry.original.clone());
            continue;
        }

        let mut record = RenameRecord::for_rename(&entry.handle, &entry.proposed, None);
        if record.is_asset {
            // Re-resolve so the record's locator reflects the post-rename
            // storage path rather than the pre-rename one
            if let Some(live) = host.resolve(&record) {
                record.asset_path = live.asset_path;
            }
            renamed_asset = true;
        }
        records.push(record);
    }

    let renamed = records.len();
    let recorded = !records.is_empty();

    if recorded {
        ledger.record(OperationRecord {
            operation: "rename.batch".to_string(),
            description: description.to_string(),
            timestamp: chrono::Utc::now(),
            entries: records,
        });
        if renamed_asset {
            host.refresh_persistent_view();
        }
    }

    log_status!(
        "rename",
        "Renamed {} of {} targets ({} unchanged, {} refused)",
        renamed,
        plan.entries.len(),
        skipped_noop,
        failed.len()
    );

    ExecutionSummary {
        attempted: plan.entries.len(),
        renamed,
        skipped_noop,
        failed,
        recorded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handle::RenamableHandle;
    use crate::core::host::{MemoryHost, TargetFilter};
    use crate::core::plan;
    use crate::core::transform::RenameRule;
    use crate::core::validate::CharsetPolicy;

    fn plan_for(host: &MemoryHost, rule: &RenameRule) -> RenamePlan {
        let targets = host.enumerate_targets(&TargetFilter::default());
        plan::plan(&targets, rule, &CharsetPolicy::default())
    }

    #[test]
    fn noop_entries_never_reach_the_host_or_the_record() {
        let mut host = MemoryHost::with_objects("GameObject", &["keep", "change"]);
        let rule = RenameRule {
            search: "change".to_string(),
            replace: "changed".to_string(),
            case_sensitive: true,
            ..Default::default()
        };
        let plan = plan_for(&host, &rule);
        let mut ledger = HistoryLedger::default();

        let summary = execute(&plan, "test", &mut host, &mut ledger);
        assert_eq!(summary.skipped_noop, 1);
        assert_eq!(summary.renamed, 1);

        let record = &ledger.entries()[0];
        assert_eq!(record.entries.len(), 1);
        assert!(record.entries.iter().all(|e| e.old_name != e.new_name));
    }

    #[test]
    fn refused_entries_are_excluded_but_batch_continues() {
        let mut host = MemoryHost::with_objects("GameObject", &["a", "b"]);
        host.refuse("X_a");
        let rule = RenameRule {
            prefix: "X_".to_string(),
            ..Default::default()
        };
        let plan = plan_for(&host, &rule);
        let mut ledger = HistoryLedger::default();

        let summary = execute(&plan, "test", &mut host, &mut ledger);
        assert_eq!(summary.renamed, 1);
        assert_eq!(summary.failed, vec!["a".to_string()]);
        assert_eq!(host.name_of("obj-1"), Some("a"));
        assert_eq!(host.name_of("obj-2"), Some("X_b"));
        assert_eq!(ledger.entries()[0].entries.len(), 1);
    }

    #[test]
    fn all_noop_batch_records_nothing() {
        let mut host = MemoryHost::with_objects("GameObject", &["a", "b"]);
        let plan = plan_for(&host, &RenameRule::default());
        let mut ledger = HistoryLedger::default();

        let summary = execute(&plan, "test", &mut host, &mut ledger);
        assert!(!summary.recorded);
        assert_eq!(summary.renamed, 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn all_refused_batch_records_nothing() {
        let mut host = MemoryHost::with_objects("GameObject", &["a"]);
        host.refuse("X_a");
        let rule = RenameRule {
            prefix: "X_".to_string(),
            ..Default::default()
        };
        let plan = plan_for(&host, &rule);
        let mut ledger = HistoryLedger::default();

        let summary = execute(&plan, "test", &mut host, &mut ledger);
        assert!(!summary.recorded);
        assert!(ledger.is_empty());
    }

    #[test]
    fn asset_batch_refreshes_exactly_once() {
        let entries = (1..=3)
            .map(|i| RenamableHandle {
                stable_id: format!("t{}", i),
                name: format!("tex{}", i),
                kind: "Texture".to_string(),
                is_asset: true,
                asset_path: Some(format!("textures/tex{}.png", i)),
            })
            .collect();
        let mut host = MemoryHost::new(entries);
        let rule = RenameRule {
            prefix: "T_".to_string(),
            ..Default::default()
        };
        let plan = plan_for(&host, &rule);
        let mut ledger = HistoryLedger::default();

        execute(&plan, "test", &mut host, &mut ledger);
        assert_eq!(host.refresh_count(), 1);
    }

    #[test]
    fn object_only_batch_never_refreshes() {
        let mut host = MemoryHost::with_objects("GameObject", &["a"]);
        let rule = RenameRule {
            prefix: "X_".to_string(),
            ..Default::default()
        };
        let plan = plan_for(&host, &rule);
        let mut ledger = HistoryLedger::default();

        execute(&plan, "test", &mut host, &mut ledger);
        assert_eq!(host.refresh_count(), 0);
    }

    #[test]
    fn asset_record_carries_post_rename_path() {
        let mut host = MemoryHost::new(vec![RenamableHandle {
            stable_id: "t1".to_string(),
            name: "grass".to_string(),
            kind: "Texture".to_string(),
            is_asset: true,
            asset_path: Some("textures/grass.png".to_string()),
        }]);
        let rule = RenameRule {
            search: "grass".to_string(),
            replace: "dirt".to_string(),
            case_sensitive: true,
            ..Default::default()
        };
        let plan = plan_for(&host, &rule);
        let mut ledger = HistoryLedger::default();

        execute(&plan, "test", &mut host, &mut ledger);
        let record = &ledger.entries()[0].entries[0];
        assert_eq!(record.asset_path.as_deref(), Some("textures/dirt.png"));
    }
}
