//! Append-only operation history with selective, out-of-order reversal.
//!
//! The ledger is an explicit service object owned by the hosting
//! application: construct it from persisted records with [`HistoryLedger::with_entries`],
//! drain it back out with [`HistoryLedger::into_entries`]. No module-level
//! state, no lazy loading.
//!
//! Reversal must survive out-of-band mutation: entities may have been
//! deleted, moved, or renamed again since the operation ran. Each sub-record
//! is therefore re-resolved and staleness-checked individually; a stale
//! sub-record is skipped and reported, never an error for the whole
//! operation.

use crate::core::error::{Error, Result};
use crate::core::handle::RenameRecord;
use crate::core::host::RenameHost;
use crate::log_status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default bound on recorded operations.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// One committed rename batch, reversible as a unit.
///
/// Immutable after creation; the ledger only ever removes or evicts whole
/// records. Invariant: every entry has `old_name != new_name` (no-op renames
/// are never recorded).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    /// Machine-readable operation type, e.g. "rename.batch".
    pub operation: String,
    /// Human-readable summary of the rule that produced the batch.
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub entries: Vec<RenameRecord>,
}

/// Outcome of reversing one operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversalReport {
    pub description: String,
    /// Sub-records whose old names were restored.
    pub reverted: usize,
    /// Locators skipped because the live name diverged or the entity is gone.
    pub skipped_stale: Vec<String>,
    /// Locators where the host refused the restoring rename.
    pub failed: Vec<String>,
    /// Whether the record was removed from the ledger (true iff `reverted > 0`).
    pub removed: bool,
}

/// Bounded FIFO log of executed operations.
#[derive(Debug)]
pub struct HistoryLedger {
    entries: Vec<OperationRecord>,
    max_entries: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl HistoryLedger {
    pub fn new(max_entries: usize) -> Self {
        HistoryLedger {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Rebuild from persisted records. Anything past the bound is evicted
    /// oldest-first, same as live recording.
    pub fn with_entries(entries: Vec<OperationRecord>, max_entries: usize) -> Self {
        let mut ledger = Self::new(max_entries);
        for record in entries {
            ledger.record(record);
        }
        ledger
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chronological view, oldest first.
    pub fn entries(&self) -> &[OperationRecord] {
        &self.entries
    }

    /// Drain for persistence by the hosting application.
    pub fn into_entries(self) -> Vec<OperationRecord> {
        self.entries
    }

    /// Append an operation, evicting the oldest entry past the bound.
    /// Eviction is unconditional FIFO — reversal state plays no part.
    pub fn record(&mut self, record: OperationRecord) {
        self.entries.push(record);
        while self.entries.len() > self.max_entries {
            let evicted = self.entries.remove(0);
            log_status!(
                "history",
                "Evicted oldest operation '{}' (bound {})",
                evicted.description,
                self.max_entries
            );
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reverse the operation at chronological `index` (0 = oldest).
    ///
    /// Per sub-record: re-resolve the live handle by locator; apply only
    /// when the live name still equals the recorded `new_name`; write the
    /// recorded `old_name` back through the same rename primitive used for
    /// forward execution, with the same no-op-skip and partial-failure
    /// policies. At least one restored sub-record removes the whole record
    /// from the ledger — reversal deletes history rather than recording a
    /// new forward operation. Zero restored sub-records leave the ledger
    /// unchanged.
    pub fn reverse(&mut self, index: usize, host: &mut dyn RenameHost) -> Result<ReversalReport> {
        let record = self
            .entries
            .get(index)
            .ok_or_else(|| Error::history_entry_not_found(index + 1))?;

        let mut reverted = 0usize;
        let mut reverted_asset = false;
        let mut skipped_stale = Vec::new();
        let mut failed = Vec::new();

        for entry in &record.entries {
            let locator = entry.locator_label();

            let Some(live) = host.resolve(entry) else {
                log_status!("history", "Skipping {}: entity no longer exists", locator);
                skipped_stale.push(locator);
                continue;
            };

            // Staleness check: only revert what this operation produced
            if live.name != entry.new_name {
                log_status!(
                    "history",
                    "Skipping {}: live name '{}' no longer matches recorded '{}'",
                    locator,
                    live.name,
                    entry.new_name
                );
                skipped_stale.push(locator);
                continue;
            }

            if entry.old_name == live.name {
                continue;
            }

            if host.rename(&live, &entry.old_name) {
                reverted += 1;
                reverted_asset |= entry.is_asset;
            } else {
                log_status!("history", "Host refused to restore {}", locator);
                failed.push(locator);
            }
        }

        let description = record.description.clone();
        let removed = reverted > 0;
        if removed {
            self.entries.remove(index);
            if reverted_asset {
                host.refresh_persistent_view();
            }
        }

        Ok(ReversalReport {
            description,
            reverted,
            skipped_stale,
            failed,
            removed,
        })
    }

    /// Reverse the most recently recorded operation.
    pub fn reverse_latest(&mut self, host: &mut dyn RenameHost) -> Result<ReversalReport> {
        if self.entries.is_empty() {
            return Err(Error::history_empty());
        }
        self.reverse(self.entries.len() - 1, host)
    }

    /// Plain-text chronological report, most recent first. Pure read.
    pub fn export_report(&self) -> String {
        let mut out = String::new();
        for record in self.entries.iter().rev() {
            out.push_str(&format!(
                "{} | {} | {} ({} renamed)\n",
                record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                record.operation,
                record.description,
                record.entries.len()
            ));
            for entry in &record.entries {
                out.push_str(&format!(
                    "  - [{}] {}: '{}' -> '{}'\n",
                    if entry.is_asset { "asset" } else { "object" },
                    entry.locator_label(),
                    entry.old_name,
                    entry.new_name
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::execute;
    use crate::core::host::{MemoryHost, RenameHost, TargetFilter};
    use crate::core::plan;
    use crate::core::transform::RenameRule;
    use crate::core::validate::CharsetPolicy;
    use chrono::TimeZone;

    fn record_named(description: &str) -> OperationRecord {
        OperationRecord {
            operation: "rename.batch".to_string(),
            description: description.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
            entries: vec![RenameRecord {
                stable_id: Some("obj-1".to_string()),
                asset_path: None,
                kind: "GameObject".to_string(),
                is_asset: false,
                old_name: "old".to_string(),
                new_name: "new".to_string(),
            }],
        }
    }

    fn run_prefix_batch(host: &mut MemoryHost, ledger: &mut HistoryLedger, prefix: &str) {
        let rule = RenameRule {
            prefix: prefix.to_string(),
            ..Default::default()
        };
        let targets = host.enumerate_targets(&TargetFilter::default());
        let plan = plan::plan(&targets, &rule, &CharsetPolicy::default());
        execute::execute(&plan, &format!("prefix '{}'", prefix), host, ledger);
    }

    #[test]
    fn ledger_never_exceeds_bound() {
        let mut ledger = HistoryLedger::new(3);
        for i in 0..10 {
            ledger.record(record_named(&format!("op {}", i)));
        }
        assert_eq!(ledger.len(), 3);
        // Survivors are the most recently recorded
        let names: Vec<&str> = ledger
            .entries()
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(names, vec!["op 7", "op 8", "op 9"]);
    }

    #[test]
    fn with_entries_applies_bound() {
        let records = (0..5).map(|i| record_named(&format!("op {}", i))).collect();
        let ledger = HistoryLedger::with_entries(records, 2);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].description, "op 3");
    }

    #[test]
    fn reverse_latest_on_empty_ledger_errors() {
        let mut ledger = HistoryLedger::default();
        let mut host = MemoryHost::with_objects("GameObject", &[]);
        let err = ledger.reverse_latest(&mut host).unwrap_err();
        assert_eq!(err.code.as_str(), "history.empty");
    }

    #[test]
    fn reversal_round_trip_restores_names() {
        let mut host = MemoryHost::with_objects("GameObject", &["A", "B"]);
        let mut ledger = HistoryLedger::default();
        run_prefix_batch(&mut host, &mut ledger, "X_");
        assert_eq!(host.name_of("obj-1"), Some("X_A"));

        let report = ledger.reverse_latest(&mut host).unwrap();
        assert_eq!(report.reverted, 2);
        assert!(report.removed);
        assert_eq!(host.name_of("obj-1"), Some("A"));
        assert_eq!(host.name_of("obj-2"), Some("B"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn stale_sub_record_is_skipped_others_revert() {
        let mut host = MemoryHost::with_objects("GameObject", &["A", "B"]);
        let mut ledger = HistoryLedger::default();
        run_prefix_batch(&mut host, &mut ledger, "X_");

        // External interference between execute and reverse
        host.rename_externally("obj-1", "SomethingElse");

        let report = ledger.reverse_latest(&mut host).unwrap();
        assert_eq!(report.reverted, 1);
        assert_eq!(report.skipped_stale.len(), 1);
        assert!(report.removed);
        assert_eq!(host.name_of("obj-1"), Some("SomethingElse"));
        assert_eq!(host.name_of("obj-2"), Some("B"));
    }

    #[test]
    fn deleted_entity_is_skipped_as_stale() {
        let mut host = MemoryHost::with_objects("GameObject", &["A", "B"]);
        let mut ledger = HistoryLedger::default();
        run_prefix_batch(&mut host, &mut ledger, "X_");

        host.remove("obj-2");

        let report = ledger.reverse_latest(&mut host).unwrap();
        assert_eq!(report.reverted, 1);
        assert_eq!(report.skipped_stale.len(), 1);
    }

    #[test]
    fn fully_stale_reversal_retains_ledger_entry() {
        let mut host = MemoryHost::with_objects("GameObject", &["A"]);
        let mut ledger = HistoryLedger::default();
        run_prefix_batch(&mut host, &mut ledger, "X_");

        host.rename_externally("obj-1", "Changed");

        let report = ledger.reverse_latest(&mut host).unwrap();
        assert_eq!(report.reverted, 0);
        assert!(!report.removed);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn out_of_order_reversal_targets_arbitrary_entry() {
        let mut host = MemoryHost::with_objects("GameObject", &["A"]);
        let mut ledger = HistoryLedger::default();
        run_prefix_batch(&mut host, &mut ledger, "X_");
        run_prefix_batch(&mut host, &mut ledger, "Y_");
        assert_eq!(host.name_of("obj-1"), Some("Y_X_A"));
        assert_eq!(ledger.len(), 2);

        // Reversing the older entry fails its staleness check (the second
        // batch renamed the object again), so it stays in the ledger
        let report = ledger.reverse(0, &mut host).unwrap();
        assert_eq!(report.reverted, 0);
        assert!(!report.removed);
        assert_eq!(ledger.len(), 2);

        // The newer entry reverses cleanly, after which the older one does too
        assert!(ledger.reverse(1, &mut host).unwrap().removed);
        assert!(ledger.reverse(0, &mut host).unwrap().removed);
        assert_eq!(host.name_of("obj-1"), Some("A"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn reversal_refresh_fires_for_assets() {
        let mut host = MemoryHost::new(vec![crate::core::handle::RenamableHandle {
            stable_id: "t1".to_string(),
            name: "grass".to_string(),
            kind: "Texture".to_string(),
            is_asset: true,
            asset_path: Some("textures/grass.png".to_string()),
        }]);
        let mut ledger = HistoryLedger::default();
        run_prefix_batch(&mut host, &mut ledger, "T_");
        assert_eq!(host.refresh_count(), 1);

        ledger.reverse_latest(&mut host).unwrap();
        assert_eq!(host.refresh_count(), 2);
    }

    #[test]
    fn export_report_is_most_recent_first() {
        let mut ledger = HistoryLedger::default();
        ledger.record(record_named("first"));
        ledger.record(record_named("second"));

        let report = ledger.export_report();
        let first_pos = report.find("first").unwrap();
        let second_pos = report.find("second").unwrap();
        assert!(second_pos < first_pos);
        assert!(report.contains("  - [object] GameObject#obj-1: 'old' -> 'new'"));
    }

    #[test]
    fn export_report_tags_assets_and_objects() {
        let mut ledger = HistoryLedger::default();
        let mut record = record_named("mixed");
        record.entries.push(RenameRecord {
            stable_id: Some("t1".to_string()),
            asset_path: Some("textures/dirt.png".to_string()),
            kind: "Texture".to_string(),
            is_asset: true,
            old_name: "grass".to_string(),
            new_name: "dirt".to_string(),
        });
        ledger.record(record);

        let report = ledger.export_report();
        assert!(report.contains("  - [object] GameObject#obj-1: 'old' -> 'new'"));
        assert!(report.contains("  - [asset] textures/dirt.png: 'grass' -> 'dirt'"));
    }

    #[test]
    fn export_report_is_pure() {
        let mut ledger = HistoryLedger::default();
        ledger.record(record_named("only"));
        let before = ledger.len();
        let a = ledger.export_report();
        let b = ledger.export_report();
        assert_eq!(a, b);
        assert_eq!(ledger.len(), before);
    }

    #[test]
    fn records_survive_serde_round_trip() {
        let record = record_named("persisted");
        let json = serde_json::to_string(&record).unwrap();
        let back: OperationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.description, "persisted");
        assert_eq!(back.entries.len(), 1);
        assert_eq!(back.entries[0].old_name, "old");
    }
}
