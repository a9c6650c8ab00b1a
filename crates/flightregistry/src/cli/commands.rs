//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, TimeDelta};
use clap::{Args, Subcommand, ValueEnum};

use crate::flight::{time_span, timestamp, Flight, FlightStatus};

/// Find command arguments.
#[derive(Debug, Args)]
pub struct FindCommand {
    /// Flight number to look up (exact, case-sensitive)
    pub flight_number: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Count command arguments.
#[derive(Debug, Args)]
pub struct CountCommand {
    /// Airline name (case-insensitive)
    pub airline: String,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Airline name (case-insensitive)
    pub airline: String,

    /// Write the document to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON regardless of configuration
    #[arg(long)]
    pub compact: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Flight number
    #[arg(short, long, default_value = "")]
    pub number: String,

    /// Operating airline
    #[arg(short, long, default_value = "")]
    pub airline: String,

    /// Destination
    #[arg(short, long, default_value = "")]
    pub destination: String,

    /// Departure time (RFC 3339, e.g. 2024-05-01T10:15:00+02:00)
    #[arg(long, value_parser = parse_time)]
    pub departure: Option<DateTime<FixedOffset>>,

    /// Arrival time (RFC 3339)
    #[arg(long, value_parser = parse_time)]
    pub arrival: Option<DateTime<FixedOffset>>,

    /// Boarding gate
    #[arg(short, long)]
    pub gate: Option<String>,

    /// Flight status
    #[arg(short, long, value_enum, default_value = "on-time")]
    pub status: StatusArg,

    /// Duration (hh:mm:ss or ISO-8601, e.g. PT2H)
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<TimeDelta>,

    /// Aircraft type
    #[arg(long, default_value = "")]
    pub aircraft: String,

    /// Terminal
    #[arg(short, long, default_value = "")]
    pub terminal: String,

    /// Write the resulting registry to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl AddCommand {
    /// Build the flight described by these arguments.
    #[must_use]
    pub fn to_flight(&self) -> Flight {
        Flight {
            flight_number: self.number.clone(),
            airline: self.airline.clone(),
            destination: self.destination.clone(),
            departure_time: self.departure,
            arrival_time: self.arrival,
            gate: self.gate.clone(),
            status: self.status.into(),
            duration: self.duration.unwrap_or_else(TimeDelta::zero),
            aircraft_type: self.aircraft.clone(),
            terminal: self.terminal.clone(),
        }
    }
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Flight number to remove (first exact match only)
    pub flight_number: String,

    /// Write the resulting registry to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// Flight status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusArg {
    /// On time
    #[default]
    OnTime,
    /// Delayed
    Delayed,
    /// Cancelled
    Cancelled,
    /// Boarding
    Boarding,
    /// In flight
    InFlight,
}

impl From<StatusArg> for FlightStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::OnTime => Self::OnTime,
            StatusArg::Delayed => Self::Delayed,
            StatusArg::Cancelled => Self::Cancelled,
            StatusArg::Boarding => Self::Boarding,
            StatusArg::InFlight => Self::InFlight,
        }
    }
}

fn parse_time(value: &str) -> Result<DateTime<FixedOffset>, String> {
    timestamp::parse(value).ok_or_else(|| format!("invalid timestamp '{value}'"))
}

fn parse_duration(value: &str) -> Result<TimeDelta, String> {
    time_span::parse(value).ok_or_else(|| format!("invalid duration '{value}'"))
}
