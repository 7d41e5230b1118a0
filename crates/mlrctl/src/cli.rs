//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MLR claims checker
#[derive(Parser, Debug)]
#[command(name = "mlrctl")]
#[command(about = "Check marketing copy against regulatory claim libraries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides $MLR_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List claim libraries
    Libraries {
        /// Output the claims payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check experiences against selected claim libraries
    Check {
        /// JSON file with experiences (array or {"experiences": [...]})
        #[arg(long, short = 'e')]
        experiences: PathBuf,

        /// Claim library to check against (repeatable)
        #[arg(long = "library", short = 'l')]
        libraries: Vec<String>,

        /// Only check the experience with this id
        #[arg(long = "experience")]
        experience_id: Option<String>,

        /// Poll until the experiences file has content
        #[arg(long)]
        wait: bool,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Check a single text against a single claim
    Claim {
        /// Claim text
        #[arg(long)]
        claim: String,

        /// Text to check
        text: String,
    },

    /// Show the effective character limits
    Limits,
}
