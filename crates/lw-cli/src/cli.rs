//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lap-aware time tracker.
///
/// Tracks elapsed time for named units of work. Start a session, record
/// laps inside it, stop it, and query its duration later.
#[derive(Debug, Parser)]
#[command(name = "lw", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start (or resume tracking toward) a session.
    Start {
        /// Session identifier.
        id: String,
    },

    /// Stop a running session.
    Stop {
        /// Session identifier.
        id: String,
    },

    /// Show the derived status of a session.
    Status {
        /// Session identifier.
        id: String,
    },

    /// Manage laps inside a session.
    Lap {
        #[command(subcommand)]
        action: LapAction,
    },

    /// Remove a session from storage.
    Remove {
        /// Session identifier.
        id: String,
    },
}

/// Lap subcommands.
#[derive(Debug, Subcommand)]
pub enum LapAction {
    /// Add a lap starting now.
    Add {
        /// Session identifier.
        id: String,
    },

    /// Stop the lap at the given position.
    Stop {
        /// Session identifier.
        id: String,

        /// Zero-based lap position.
        #[arg(long)]
        position: usize,
    },
}
