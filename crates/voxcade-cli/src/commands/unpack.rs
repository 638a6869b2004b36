//! Unpack command implementation
//!
//! Restores the loose clips of an archive into a directory.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::reporting::{format_bytes, print_entry};

/// Run the unpack command
///
/// # Arguments
/// * `archive_path` - Archive file to read
/// * `output_dir` - Directory the entries are written under
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(archive_path: &str, output_dir: &str) -> Result<ExitCode> {
    println!("{} {}", "Unpacking:".cyan().bold(), archive_path);

    let summary = voxcade_archive::pack::unpack(
        Path::new(archive_path),
        Path::new(output_dir),
        |progress| print_entry("extracted", progress),
    )
    .with_context(|| format!("Failed to unpack {} into {}", archive_path, output_dir))?;
    tracing::info!(
        archive_path,
        output_dir,
        entries = summary.entries,
        bytes = summary.bytes,
        "archive extracted"
    );

    println!(
        "{} Extracted {} clips ({}) into {}",
        "SUCCESS".green().bold(),
        summary.entries,
        format_bytes(summary.bytes),
        output_dir
    );

    Ok(ExitCode::SUCCESS)
}
