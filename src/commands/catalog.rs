use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use renamekit::catalog::{Catalog, CatalogEntry};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Create an empty catalog file
    Init {
        /// Catalog file to create
        #[arg(default_value = "catalog.json")]
        path: String,
    },
    /// Add an entry
    Add {
        /// Entry name
        name: String,

        /// Kind tag (e.g. GameObject, Texture, Material)
        #[arg(long, default_value = "GameObject")]
        kind: String,

        /// Mark the entry as a persistent asset with a storage path
        #[arg(long)]
        asset: bool,

        /// Catalog file
        #[arg(long, default_value = "catalog.json")]
        catalog: String,
    },
    /// List entries
    List {
        /// Restrict to a kind tag
        #[arg(long)]
        kind: Option<String>,

        /// Catalog file
        #[arg(long, default_value = "catalog.json")]
        catalog: String,
    },
    /// Remove an entry by name
    Remove {
        /// Entry name
        name: String,

        /// Catalog file
        #[arg(long, default_value = "catalog.json")]
        catalog: String,
    },
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum CatalogOutput {
    #[serde(rename = "catalog.init")]
    Init { path: String },
    #[serde(rename = "catalog.add")]
    Add { catalog: String, entry: CatalogEntry },
    #[serde(rename = "catalog.list")]
    List {
        catalog: String,
        entries: Vec<CatalogEntry>,
    },
    #[serde(rename = "catalog.remove")]
    Remove { catalog: String, entry: CatalogEntry },
}

pub fn run(args: CatalogArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<CatalogOutput> {
    match args.command {
        CatalogCommand::Init { path } => {
            Catalog::init(Path::new(&path))?;
            Ok((CatalogOutput::Init { path }, 0))
        }
        CatalogCommand::Add {
            name,
            kind,
            asset,
            catalog,
        } => {
            let mut cat = Catalog::load(Path::new(&catalog))?;
            let entry = cat.add(&name, &kind, asset)?.clone();
            cat.save()?;
            Ok((CatalogOutput::Add { catalog, entry }, 0))
        }
        CatalogCommand::List { kind, catalog } => {
            let cat = Catalog::load(Path::new(&catalog))?;
            let entries = cat
                .entries()
                .iter()
                .filter(|e| {
                    kind.as_ref()
                        .map(|k| e.kind.eq_ignore_ascii_case(k))
                        .unwrap_or(true)
                })
                .cloned()
                .collect();
            Ok((CatalogOutput::List { catalog, entries }, 0))
        }
        CatalogCommand::Remove { name, catalog } => {
            let mut cat = Catalog::load(Path::new(&catalog))?;
            let entry = cat.remove(&name)?;
            cat.save()?;
            Ok((CatalogOutput::Remove { catalog, entry }, 0))
        }
    }
}
