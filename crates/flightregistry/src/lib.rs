//! `flightregistry` - An in-memory registry of flight records
//!
//! This library loads flight schedules from `{"flights": [...]}` JSON
//! documents, supports lookups, insertion and removal, and serializes
//! per-airline subsets back to JSON.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod flight;
pub mod logging;
pub mod registry;

pub use config::Config;
pub use document::{parse_document, serialize_flights, FlightDocument, JsonStyle};
pub use error::{Error, Result};
pub use flight::{Flight, FlightStatus};
pub use logging::init_logging;
pub use registry::{FlightRegistry, LoadOutcome, RegistryStats};
