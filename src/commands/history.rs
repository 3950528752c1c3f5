use clap::{Args, Subcommand};
use serde::Serialize;

use renamekit::history::ReversalReport;
use renamekit::Error;

use crate::commands::{CmdResult, Session};

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Args)]
pub struct CatalogArg {
    /// Catalog file
    #[arg(long, default_value = "catalog.json")]
    catalog: String,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List recorded operations, most recent first
    List(CatalogArg),
    /// Reverse the operation numbered as in `history list` (1 = most recent)
    Undo {
        #[command(flatten)]
        catalog: CatalogArg,

        /// Operation number from `history list`
        number: usize,
    },
    /// Reverse the most recent operation
    UndoLast(CatalogArg),
    /// Discard all recorded operations
    Clear(CatalogArg),
    /// Print the plain-text operation report
    Export(CatalogArg),
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum HistoryOutput {
    #[serde(rename = "history.list")]
    List {
        catalog: String,
        operations: Vec<OperationSummary>,
    },
    #[serde(rename = "history.undo")]
    Undo {
        catalog: String,
        report: ReversalReport,
    },
    #[serde(rename = "history.clear")]
    Clear { catalog: String, discarded: usize },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    /// 1-based, most recent first; feeds `history undo <number>`
    pub number: usize,
    pub description: String,
    pub timestamp: String,
    pub renamed: usize,
}

/// True when the command bypasses the JSON envelope.
pub fn is_export(args: &HistoryArgs) -> bool {
    matches!(args.command, HistoryCommand::Export(_))
}

pub fn run(args: HistoryArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<HistoryOutput> {
    match args.command {
        HistoryCommand::List(cat) => run_list(&cat),
        HistoryCommand::Undo { catalog, number } => run_undo(&catalog, Some(number)),
        HistoryCommand::UndoLast(cat) => run_undo(&cat, None),
        HistoryCommand::Clear(cat) => run_clear(&cat),
        HistoryCommand::Export(cat) => Err(Error::validation_invalid_argument(
            "output_mode",
            format!("Export of '{}' uses text output mode", cat.catalog),
            None,
        )),
    }
}

pub fn run_text(args: HistoryArgs) -> renamekit::Result<(String, i32)> {
    match args.command {
        HistoryCommand::Export(cat) => {
            let session = Session::open(std::path::Path::new(&cat.catalog))?;
            Ok((session.ledger.export_report(), 0))
        }
        _ => Err(Error::validation_invalid_argument(
            "output_mode",
            "Command does not support text output",
            None,
        )),
    }
}

fn run_list(cat: &CatalogArg) -> CmdResult<HistoryOutput> {
    let session = Session::open(std::path::Path::new(&cat.catalog))?;

    let operations = session
        .ledger
        .entries()
        .iter()
        .rev()
        .enumerate()
        .map(|(i, record)| OperationSummary {
            number: i + 1,
            description: record.description.clone(),
            timestamp: record.timestamp.to_rfc3339(),
            renamed: record.entries.len(),
        })
        .collect();

    Ok((
        HistoryOutput::List {
            catalog: cat.catalog.clone(),
            operations,
        },
        0,
    ))
}

fn run_undo(cat: &CatalogArg, number: Option<usize>) -> CmdResult<HistoryOutput> {
    let mut session = Session::open(std::path::Path::new(&cat.catalog))?;

    let report = match number {
        None => {
            let Session {
                ref mut ledger,
                ref mut catalog,
                ..
            } = session;
            ledger.reverse_latest(catalog)?
        }
        Some(n) => {
            if n == 0 || n > session.ledger.len() {
                return Err(Error::history_entry_not_found(n));
            }
            // `history list` numbers most-recent-first; the ledger is chronological
            let index = session.ledger.len() - n;
            let Session {
                ref mut ledger,
                ref mut catalog,
                ..
            } = session;
            ledger.reverse(index, catalog)?
        }
    };

    let catalog_path = cat.catalog.clone();
    session.persist()?;

    Ok((
        HistoryOutput::Undo {
            catalog: catalog_path,
            report,
        },
        0,
    ))
}

fn run_clear(cat: &CatalogArg) -> CmdResult<HistoryOutput> {
    let mut session = Session::open(std::path::Path::new(&cat.catalog))?;
    let discarded = session.ledger.len();
    session.ledger.clear();
    session.persist()?;

    Ok((
        HistoryOutput::Clear {
            catalog: cat.catalog.clone(),
            discarded,
        },
        0,
    ))
}
