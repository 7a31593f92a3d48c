//! Lap-aware time tracker CLI library.
//!
//! This crate provides the CLI interface for lapwatch.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LapAction};
pub use config::Config;
