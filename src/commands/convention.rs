use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use renamekit::collide;
use renamekit::convention::{self, RuleSet};
use renamekit::execute::{self, ExecutionSummary};
use renamekit::host::RenameHost;
use renamekit::plan::{PlanEntry, RenamePlan};
use renamekit::validate::CharsetPolicy;
use renamekit::{paths, utils, Error, TargetFilter};

use crate::commands::{CmdResult, Session};

#[derive(Args)]
pub struct ConventionArgs {
    #[command(subcommand)]
    command: ConventionCommand,
}

#[derive(Subcommand)]
enum ConventionCommand {
    /// Report convention violations without changing anything
    Check(CheckArgs),
    /// Rename violating entries to their suggested fixes
    Fix(FixArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Catalog file
    #[arg(long, default_value = "catalog.json")]
    catalog: String,

    /// Rules file (default: ~/.config/renamekit/rules.json, else built-ins)
    #[arg(long)]
    rules: Option<String>,

    /// Restrict to a kind tag
    #[arg(long)]
    kind: Option<String>,
}

#[derive(Args)]
struct FixArgs {
    #[command(flatten)]
    check: CheckArgs,

    /// Fix only this entry (default: every violating entry)
    name: Option<String>,

    /// Execute the fixes instead of previewing them
    #[arg(long)]
    apply: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ConventionOutput {
    #[serde(rename = "convention.check")]
    Check {
        catalog: String,
        checked: usize,
        violations: Vec<ViolationReport>,
    },
    #[serde(rename = "convention.fix")]
    Fix {
        catalog: String,
        applied: bool,
        fixes: Vec<FixReport>,
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<ExecutionSummary>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationReport {
    pub name: String,
    pub kind: String,
    pub violations: Vec<String>,
    pub suggested: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    pub original: String,
    pub proposed: String,
    pub violations: Vec<String>,
}

/// Load the rule set: explicit file, then the user's config, then built-ins.
fn load_rules(explicit: Option<&str>) -> renamekit::Result<RuleSet> {
    let path = match explicit {
        Some(p) => {
            let path = Path::new(p).to_path_buf();
            if !path.exists() {
                return Err(Error::rules_not_found(p));
            }
            path
        }
        None => {
            let default = paths::rules_json()?;
            if !default.exists() {
                return Ok(RuleSet::builtin());
            }
            default
        }
    };

    let raw = utils::io::read_file(&path, "read rules")?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::validation_invalid_json(e, Some("parse rules".to_string())))
}

pub fn run(
    args: ConventionArgs,
    _global: &crate::commands::GlobalArgs,
) -> CmdResult<ConventionOutput> {
    match args.command {
        ConventionCommand::Check(check) => run_check(&check),
        ConventionCommand::Fix(fix) => run_fix(&fix),
    }
}

fn run_check(args: &CheckArgs) -> CmdResult<ConventionOutput> {
    let session = Session::open(Path::new(&args.catalog))?;
    let rule_set = load_rules(args.rules.as_deref())?;
    let policy = CharsetPolicy::default();

    let filter = TargetFilter {
        kind: args.kind.clone(),
        names: Vec::new(),
    };
    let targets = session.catalog.enumerate_targets(&filter);

    let violations: Vec<ViolationReport> = targets
        .iter()
        .filter_map(|target| {
            let found = convention::evaluate(target, &rule_set);
            if found.is_empty() {
                return None;
            }
            Some(ViolationReport {
                name: target.name.clone(),
                kind: target.kind.clone(),
                suggested: convention::suggest_fix(
                    &target.name,
                    &target.kind,
                    target.is_asset,
                    &rule_set,
                    &policy,
                ),
                violations: found,
            })
        })
        .collect();

    let exit_code = if violations.is_empty() { 0 } else { 1 };
    Ok((
        ConventionOutput::Check {
            catalog: args.catalog.clone(),
            checked: targets.len(),
            violations,
        },
        exit_code,
    ))
}

fn run_fix(args: &FixArgs) -> CmdResult<ConventionOutput> {
    let mut session = Session::open(Path::new(&args.check.catalog))?;
    let rule_set = load_rules(args.check.rules.as_deref())?;
    let policy = CharsetPolicy::default();

    let filter = TargetFilter {
        kind: args.check.kind.clone(),
        names: args.name.clone().into_iter().collect(),
    };
    let targets = session.catalog.enumerate_targets(&filter);
    if args.name.is_some() && targets.is_empty() {
        return Err(Error::catalog_entry_not_found(
            args.name.clone().unwrap_or_default(),
        ));
    }

    // Suggested fixes feed the same executor path as a rename batch, so
    // duplicate resolution applies here too
    let mut violating = Vec::new();
    let mut proposed = Vec::new();
    for target in targets {
        let found = convention::evaluate(&target, &rule_set);
        if found.is_empty() {
            continue;
        }
        proposed.push(convention::suggest_fix(
            &target.name,
            &target.kind,
            target.is_asset,
            &rule_set,
            &policy,
        ));
        violating.push((target, found));
    }
    let resolved = collide::resolve_duplicates(&proposed);

    let entries: Vec<PlanEntry> = violating
        .into_iter()
        .zip(resolved)
        .map(|((target, found), name)| PlanEntry {
            original: target.name.clone(),
            proposed: name,
            warnings: found,
            handle: target,
        })
        .collect();

    let fixes: Vec<FixReport> = entries
        .iter()
        .map(|e| FixReport {
            original: e.original.clone(),
            proposed: e.proposed.clone(),
            violations: e.warnings.clone(),
        })
        .collect();

    let summary = if args.apply {
        let plan = RenamePlan { entries };
        let summary = execute::execute(
            &plan,
            "convention fixes",
            &mut session.catalog,
            &mut session.ledger,
        );
        session.persist()?;
        Some(summary)
    } else {
        None
    };

    Ok((
        ConventionOutput::Fix {
            catalog: args.check.catalog.clone(),
            applied: args.apply,
            fixes,
            summary,
        },
        0,
    ))
}
