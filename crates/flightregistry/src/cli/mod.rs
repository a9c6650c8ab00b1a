//! Command-line interface for flightregistry.
//!
//! This module provides the CLI structure for the `flightreg` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, CountCommand, ExportCommand, FindCommand, RemoveCommand,
    StatsCommand, StatusArg,
};

/// flightreg - Query and export flight schedules
///
/// Loads a `{"flights": [...]}` document and runs lookups, counts and
/// per-airline exports over it.
#[derive(Debug, Parser)]
#[command(name = "flightreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Flights document to load (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the first flight with the given number
    Find(FindCommand),

    /// Count flights operated by an airline
    Count(CountCommand),

    /// Export an airline's flights as JSON
    Export(ExportCommand),

    /// Add a flight and print the resulting document
    Add(AddCommand),

    /// Remove a flight and print the resulting document
    Remove(RemoveCommand),

    /// Summarize the loaded flights
    Stats(StatsCommand),

    /// Run a scripted session against the loaded flights
    Demo,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
