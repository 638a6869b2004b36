//! CLI argument definitions for the VoxCade command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Args, Parser, Subcommand};

/// VoxCade - Word clip archives and sentence rendering
#[derive(Parser)]
#[command(name = "voxcade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack every .ogg clip under a directory into one archive
    Pack {
        /// Directory to scan recursively for .ogg files
        source_dir: String,

        /// Archive file to write (conventionally *.data)
        archive_path: String,
    },

    /// Extract every entry of an archive into a directory
    Unpack {
        /// Archive file to read
        archive_path: String,

        /// Directory to recreate the clips in
        output_dir: String,
    },

    /// List the words available in a clip directory or archive
    Words {
        /// Clip directory or .data archive
        source: String,

        /// Output a JSON array instead of one word per line
        #[arg(long)]
        json: bool,
    },

    /// Render a sentence to a WAV file
    Render(RenderArgs),
}

/// Arguments of the `render` command.
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Clip directory or .data archive
    #[arg(short, long)]
    pub source: String,

    /// Output WAV path
    #[arg(short, long)]
    pub output: String,

    /// Words to speak, in order
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    pub words: Vec<String>,

    /// Free text; words without a clip are dropped
    #[arg(short, long)]
    pub text: Option<String>,

    /// JSON file with sentence options (missing keys use defaults)
    #[arg(long)]
    pub options: Option<String>,

    /// Silence between words in milliseconds
    #[arg(long)]
    pub gap: Option<f64>,

    /// Milliseconds subtracted from the gap
    #[arg(long)]
    pub overlap: Option<f64>,

    /// Voice delay relative to the background in milliseconds
    #[arg(long)]
    pub delay: Option<f64>,

    /// Playback speed in percent
    #[arg(long)]
    pub speed: Option<f64>,

    /// Pitch shift in semitones
    #[arg(long, allow_negative_numbers = true)]
    pub pitch: Option<f64>,

    /// Reverb amount (0 disables, 24 and above is maximal)
    #[arg(long)]
    pub reverb: Option<f64>,

    /// Do not mix a background bed
    #[arg(long)]
    pub no_background: bool,
}
