use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    RawText,
}

mod commands;
mod output;
mod tty;

use commands::{catalog, convention, history, rename};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "renamekit")]
#[command(version = VERSION)]
#[command(about = "Batch rename tool with preview, validation, and reversible history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview or execute a batch rename
    Rename(rename::RenameArgs),
    /// Inspect and reverse recorded operations
    History(history::HistoryArgs),
    /// Check and fix naming-convention violations
    Convention(convention::ConventionArgs),
    /// Manage the object catalog
    Catalog(catalog::CatalogArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::History(args) if history::is_export(args) => ResponseMode::RawText,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    if let ResponseMode::RawText = response_mode(&cli.command) {
        return match commands::run_text(cli.command, &global) {
            Ok((content, exit_code)) => {
                print!("{}", content);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                // Same code mapping as the JSON envelope path
                let exit_code = output::exit_code_for_error(err.code);
                output::print_error(&err);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        };
    }

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        output::print_error(&err);
        return std::process::ExitCode::from(exit_code_to_u8(1));
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
