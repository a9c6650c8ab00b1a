//! `flightreg` - CLI for flightregistry
//!
//! This binary loads a flights document and runs registry operations against
//! it. A document that cannot be loaded is reported and the command carries on
//! with an empty registry.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use chrono::{TimeDelta, Utc};
use clap::Parser;
use tracing::{error, info};

use flightregistry::cli::{AddCommand, Cli, Command, ConfigCommand, ExportCommand};
use flightregistry::{
    init_logging, serialize_flights, Config, Error, Flight, FlightRegistry, FlightStatus,
    JsonStyle,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;
    let style = config.json_style();

    let path = cli.file.unwrap_or_else(|| config.flights_path());

    match cli.command {
        Command::Find(cmd) => {
            let registry = load_registry(&path);
            match registry.find(&cmd.flight_number) {
                Some(flight) if cmd.json => println!("{}", serde_json::to_string_pretty(flight)?),
                Some(flight) => println!("{}", flight.summary()),
                None => println!("Flight {} not found.", cmd.flight_number),
            }
        }
        Command::Count(cmd) => {
            let registry = load_registry(&path);
            println!("{}", registry.count_by_airline(&cmd.airline));
        }
        Command::Export(cmd) => handle_export(&load_registry(&path), &cmd, style)?,
        Command::Add(cmd) => handle_add(&mut load_registry(&path), &cmd, style)?,
        Command::Remove(cmd) => {
            let mut registry = load_registry(&path);
            registry.remove(&cmd.flight_number);
            emit(&registry.to_json(style)?, cmd.output.as_deref())?;
        }
        Command::Stats(cmd) => handle_stats(&load_registry(&path), &path, cmd.json)?,
        Command::Demo => run_demo(&mut load_registry(&path), style)?,
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }
    Ok(())
}

fn load_registry(path: &Path) -> FlightRegistry {
    let mut registry = FlightRegistry::new();
    if let Err(e) = registry.load(path) {
        error!("Error loading flights: {e}");
    }
    registry
}

/// Print `contents` to stdout, or write it to `output` when given.
fn emit(contents: &str, output: Option<&Path>) -> flightregistry::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents).map_err(|source| Error::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn handle_export(
    registry: &FlightRegistry,
    cmd: &ExportCommand,
    style: JsonStyle,
) -> flightregistry::Result<()> {
    let style = if cmd.compact {
        JsonStyle::Compact
    } else {
        style
    };
    let json = registry.flights_json_by_airline(&cmd.airline, style)?;
    emit(&json, cmd.output.as_deref())
}

fn handle_add(
    registry: &mut FlightRegistry,
    cmd: &AddCommand,
    style: JsonStyle,
) -> flightregistry::Result<()> {
    registry.add(cmd.to_flight());
    emit(&registry.to_json(style)?, cmd.output.as_deref())
}

fn handle_stats(registry: &FlightRegistry, path: &Path, json: bool) -> anyhow::Result<()> {
    let stats = registry.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let time_or_dash = |time: Option<chrono::DateTime<chrono::FixedOffset>>| {
        time.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
    };

    println!("flightreg stats");
    println!("---------------");
    println!("Source:             {}", path.display());
    println!("Flights:            {}", stats.total_flights);
    println!("Airlines:           {}", stats.airlines);
    println!("Earliest departure: {}", time_or_dash(stats.earliest_departure));
    println!("Latest arrival:     {}", time_or_dash(stats.latest_arrival));
    println!();
    println!("[Status]");
    for (status, count) in &stats.by_status {
        println!("  {:<10} {count}", status.as_str());
    }
    Ok(())
}

fn print_flight(title: &str, flight: Option<&Flight>) {
    println!("{title}");
    match flight {
        Some(flight) => println!("{}", flight.summary()),
        None => println!("Flight not found."),
    }
    println!();
}

/// Look up, remove, add, look up again, then serialize the added flight.
fn run_demo(registry: &mut FlightRegistry, style: JsonStyle) -> anyhow::Result<()> {
    print_flight("Lookup AA963:", registry.find("AA963"));

    registry.remove("AA963");
    registry.add(Flight::default());

    let now = Utc::now().fixed_offset();
    let new_flight = Flight {
        flight_number: "AB1237583".to_string(),
        airline: "Example Airlines".to_string(),
        destination: "Example Destination".to_string(),
        departure_time: Some(now),
        arrival_time: Some(now + TimeDelta::hours(2)),
        gate: None,
        status: FlightStatus::OnTime,
        duration: TimeDelta::hours(2),
        aircraft_type: "Boeing 737".to_string(),
        terminal: "A".to_string(),
    };
    registry.add(new_flight.clone());

    print_flight("Lookup DL206:", registry.find("DL206"));

    println!("{}", serialize_flights([&new_flight], style)?);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Data]");
                println!("  Flights path:  {}", config.flights_path().display());
                println!();
                println!("[Output]");
                println!("  Pretty:        {}", config.output.pretty);
                println!("  Indent:        {}", config.output.indent);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
