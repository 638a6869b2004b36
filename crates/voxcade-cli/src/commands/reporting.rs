//! Shared console output helpers.

use colored::Colorize;
use voxcade_archive::EntryProgress;

/// Prints one progress line for a packed or unpacked entry.
pub(super) fn print_entry(verb: &str, progress: &EntryProgress<'_>) {
    let counter = format!("[{}/{}]", progress.index + 1, progress.total);
    println!(
        "  {} {} {} {}",
        counter.cyan().bold(),
        verb.dimmed(),
        progress.relative_path,
        format_bytes(progress.bytes).dimmed()
    );
}

/// Formats a byte count for display.
pub(super) fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let value = bytes as f64;
    if value >= MIB {
        format!("{:.1} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{} B", bytes)
    }
}
