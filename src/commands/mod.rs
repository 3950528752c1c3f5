use renamekit::catalog::Catalog;
use renamekit::history::{HistoryLedger, OperationRecord, DEFAULT_MAX_ENTRIES};
use renamekit::{paths, utils};
use std::path::{Path, PathBuf};

pub type CmdResult<T> = renamekit::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

/// One command's view of a catalog and its history file.
///
/// The ledger has no hidden global state: it is rebuilt from
/// `<catalog>.history.json` at the start of every command and drained back
/// after any mutation.
pub(crate) struct Session {
    pub catalog: Catalog,
    pub ledger: HistoryLedger,
    history_path: PathBuf,
}

impl Session {
    pub fn open(catalog_path: &Path) -> renamekit::Result<Self> {
        let catalog = Catalog::load(catalog_path)?;
        let history_path = paths::history_for_catalog(catalog_path);

        let ledger = if history_path.exists() {
            let raw = utils::io::read_file(&history_path, "read history")?;
            let records: Vec<OperationRecord> = serde_json::from_str(&raw).map_err(|e| {
                renamekit::Error::validation_invalid_json(e, Some("parse history".to_string()))
            })?;
            HistoryLedger::with_entries(records, DEFAULT_MAX_ENTRIES)
        } else {
            HistoryLedger::default()
        };

        Ok(Session {
            catalog,
            ledger,
            history_path,
        })
    }

    /// Write the catalog and drain the ledger back to disk.
    pub fn persist(self) -> renamekit::Result<()> {
        self.catalog.save()?;
        let records = self.ledger.into_entries();
        let json = serde_json::to_string_pretty(&records).map_err(|e| {
            renamekit::Error::internal_json(e.to_string(), Some("serialize history".to_string()))
        })?;
        utils::io::write_file_atomic(&self.history_path, &json, "write history")
    }
}

pub mod catalog;
pub mod convention;
pub mod history;
pub mod rename;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (renamekit::Result<serde_json::Value>, i32) {
    crate::tty::status("renamekit is working...");

    match command {
        crate::Commands::Rename(args) => dispatch!(args, global, rename),
        crate::Commands::History(args) => dispatch!(args, global, history),
        crate::Commands::Convention(args) => dispatch!(args, global, convention),
        crate::Commands::Catalog(args) => dispatch!(args, global, catalog),
    }
}

/// Commands whose output is plain text rather than the JSON envelope
/// (currently only `history export`).
pub(crate) fn run_text(
    command: crate::Commands,
    _global: &GlobalArgs,
) -> renamekit::Result<(String, i32)> {
    match command {
        crate::Commands::History(args) => history::run_text(args),
        _ => Err(renamekit::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support text output",
            None,
        )),
    }
}
