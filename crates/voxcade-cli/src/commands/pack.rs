//! Pack command implementation
//!
//! Bundles every `.ogg` clip under a directory into one archive.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::reporting::{format_bytes, print_entry};

/// Run the pack command
///
/// # Arguments
/// * `source_dir` - Directory scanned recursively for `.ogg` files
/// * `archive_path` - Archive file to create
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(source_dir: &str, archive_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Packing:".cyan().bold(), source_dir);

    let summary = voxcade_archive::pack::pack(
        Path::new(source_dir),
        Path::new(archive_path),
        |progress| print_entry("packed", progress),
    )
    .with_context(|| format!("Failed to pack {} into {}", source_dir, archive_path))?;
    tracing::info!(
        source_dir,
        archive_path,
        entries = summary.entries,
        bytes = summary.bytes,
        "archive written"
    );

    println!(
        "{} Packed {} clips ({}) into {}",
        "SUCCESS".green().bold(),
        summary.entries,
        format_bytes(summary.bytes),
        archive_path
    );

    Ok(ExitCode::SUCCESS)
}
