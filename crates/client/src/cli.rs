//! Command-line switches.

use std::path::PathBuf;

use clap::Parser;

/// Anything not set here falls back to the config file, then to the
/// built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "warren", about = "A small turn-based warren crawl", version)]
pub struct Args {
    /// Path to a TOML session config.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Map width in tiles.
    #[arg(long)]
    pub width: Option<u32>,

    /// Map height in tiles.
    #[arg(long)]
    pub height: Option<u32>,

    /// World seed. Identical seeds replay identically.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated command names to run instead of the interactive
    /// prompt, e.g. "MoveRight,MoveUp,Wait".
    #[arg(long, value_name = "COMMANDS")]
    pub moves: Option<String>,
}
