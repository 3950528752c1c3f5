use clap::{Args, Subcommand};
use serde::Serialize;

use renamekit::execute::{self, ExecutionSummary};
use renamekit::host::RenameHost;
use renamekit::plan::{self, RenamePlan};
use renamekit::validate::CharsetPolicy;
use renamekit::{RenameRule, ReplaceMode, TargetFilter};

use crate::commands::{CmdResult, Session};

#[derive(Args)]
pub struct RenameArgs {
    #[command(subcommand)]
    command: RenameCommand,
}

#[derive(Subcommand)]
enum RenameCommand {
    /// Preview a rename batch without changing anything
    Plan(RuleArgs),
    /// Execute a rename batch and record it in history
    Apply(RuleArgs),
}

#[derive(Args)]
struct RuleArgs {
    /// Catalog file
    #[arg(long, default_value = "catalog.json")]
    catalog: String,

    /// Restrict targets to a kind tag (e.g. GameObject, Texture)
    #[arg(long)]
    kind: Option<String>,

    /// Restrict targets to specific current names (default: all entries)
    names: Vec<String>,

    /// Text prepended to every name
    #[arg(long)]
    prefix: Option<String>,

    /// Text appended to every name
    #[arg(long)]
    suffix: Option<String>,

    /// Text or pattern to search for
    #[arg(long)]
    search: Option<String>,

    /// Replacement text (supports $1 captures with --regex)
    #[arg(long)]
    replace: Option<String>,

    /// Interpret --search as a regular expression
    #[arg(long)]
    regex: bool,

    /// Match --search case-insensitively
    #[arg(long)]
    ignore_case: bool,

    /// Append a two-digit position suffix (_01, _02, ...)
    #[arg(long)]
    index: bool,
}

impl RuleArgs {
    fn rule(&self) -> RenameRule {
        RenameRule {
            mode: if self.regex {
                ReplaceMode::Regex
            } else {
                ReplaceMode::Simple
            },
            prefix: self.prefix.clone().unwrap_or_default(),
            suffix: self.suffix.clone().unwrap_or_default(),
            search: self.search.clone().unwrap_or_default(),
            replace: self.replace.clone().unwrap_or_default(),
            add_index: self.index,
            case_sensitive: !self.ignore_case,
        }
    }

    fn filter(&self) -> TargetFilter {
        TargetFilter {
            kind: self.kind.clone(),
            names: self.names.clone(),
        }
    }

    /// One-line rule summary for the history record.
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(p) = &self.prefix {
            parts.push(format!("prefix '{}'", p));
        }
        if let Some(s) = &self.suffix {
            parts.push(format!("suffix '{}'", s));
        }
        if let Some(search) = &self.search {
            let kind = if self.regex { "pattern" } else { "replace" };
            parts.push(format!(
                "{} '{}' -> '{}'",
                kind,
                search,
                self.replace.as_deref().unwrap_or("")
            ));
        }
        if self.index {
            parts.push("indexed".to_string());
        }
        if parts.is_empty() {
            "no-op rule".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RenameOutput {
    #[serde(rename = "rename.plan")]
    Plan {
        catalog: String,
        targets: usize,
        changes: usize,
        warnings: usize,
        entries: Vec<EntrySummary>,
    },
    #[serde(rename = "rename.apply")]
    Apply {
        catalog: String,
        summary: ExecutionSummary,
        entries: Vec<EntrySummary>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub original: String,
    pub proposed: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

fn summarize(plan: &RenamePlan) -> Vec<EntrySummary> {
    plan.entries
        .iter()
        .map(|e| EntrySummary {
            original: e.original.clone(),
            proposed: e.proposed.clone(),
            warnings: e.warnings.clone(),
        })
        .collect()
}

pub fn run(args: RenameArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RenameOutput> {
    match args.command {
        RenameCommand::Plan(rule_args) => run_plan(&rule_args),
        RenameCommand::Apply(rule_args) => run_apply(&rule_args),
    }
}

fn run_plan(args: &RuleArgs) -> CmdResult<RenameOutput> {
    let session = Session::open(std::path::Path::new(&args.catalog))?;
    let targets = session.catalog.enumerate_targets(&args.filter());
    let plan = plan::plan(&targets, &args.rule(), &CharsetPolicy::default());

    Ok((
        RenameOutput::Plan {
            catalog: args.catalog.clone(),
            targets: targets.len(),
            changes: plan.change_count(),
            warnings: plan.warning_count(),
            entries: summarize(&plan),
        },
        0,
    ))
}

fn run_apply(args: &RuleArgs) -> CmdResult<RenameOutput> {
    let mut session = Session::open(std::path::Path::new(&args.catalog))?;
    let targets = session.catalog.enumerate_targets(&args.filter());
    let plan = plan::plan(&targets, &args.rule(), &CharsetPolicy::default());

    let summary = execute::execute(
        &plan,
        &args.describe(),
        &mut session.catalog,
        &mut session.ledger,
    );
    session.persist()?;

    Ok((
        RenameOutput::Apply {
            catalog: args.catalog.clone(),
            summary,
            entries: summarize(&plan),
        },
        0,
    ))
}
