//! VoxCade CLI - Word clip archives and sentence rendering
//!
//! This binary packs and unpacks clip archives, lists available words, and
//! renders sentences to WAV files.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use voxcade_cli::cli_args::{Cli, Commands};
use voxcade_cli::commands;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Pack {
            source_dir,
            archive_path,
        } => commands::pack::run(source_dir, archive_path),
        Commands::Unpack {
            archive_path,
            output_dir,
        } => commands::unpack::run(archive_path, output_dir),
        Commands::Words { source, json } => commands::words::run(source, *json),
        Commands::Render(args) => commands::render::run(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

/// Logs to stderr. `--verbose` forces debug output, otherwise `RUST_LOG`
/// applies with a `warn` default.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
