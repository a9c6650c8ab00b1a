//! In-memory flight registry.
//!
//! The registry owns an ordered list of [`Flight`] records. Records are
//! appended by [`FlightRegistry::load`] and [`FlightRegistry::add`], removed by
//! [`FlightRegistry::remove`], and never reordered.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{debug, info};

use crate::document::{parse_document, serialize_flights, FlightDocument, JsonStyle};
use crate::error::{Error, Result};
use crate::flight::{fold_case, Flight, FlightStatus};

/// What a successful load appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document had a `flights` array; `count` records were appended.
    Loaded {
        /// Number of records appended (may be zero).
        count: usize,
    },
    /// The document had no `flights` key. Nothing was appended.
    NoData,
}

/// Registry of flight records.
///
/// Flight numbers are not required to be unique. Lookups and removals act on
/// the earliest matching record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightRegistry {
    flights: Vec<Flight>,
}

impl From<Vec<Flight>> for FlightRegistry {
    fn from(flights: Vec<Flight>) -> Self {
        Self { flights }
    }
}

impl FlightRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the flights from the JSON document at `path`.
    ///
    /// Existing records are kept; the file's records go after them in
    /// document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the file cannot be read and
    /// [`Error::Json`] if it is not a flights document. The registry is left
    /// unchanged in both cases.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        let path = path.as_ref();
        debug!("Loading flights from {}", path.display());

        let json = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&json)
    }

    /// Append the flights from an in-memory JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if `json` is not a flights document. The
    /// registry is left unchanged.
    pub fn load_str(&mut self, json: &str) -> Result<LoadOutcome> {
        let document = parse_document(json)?;
        Ok(self.extend_from_document(document))
    }

    /// Append the flights of an already parsed document.
    pub fn extend_from_document(&mut self, document: FlightDocument) -> LoadOutcome {
        let Some(flights) = document.flights else {
            info!("No flights data found.");
            return LoadOutcome::NoData;
        };
        let count = flights.len();
        self.flights.extend(flights);
        info!("Flights loaded successfully ({count} records).");
        LoadOutcome::Loaded { count }
    }

    /// Append a flight. No validation is performed.
    pub fn add(&mut self, flight: Flight) {
        info!("Flight {} added successfully.", flight.flight_number);
        self.flights.push(flight);
    }

    /// Remove the first flight whose number equals `flight_number` exactly.
    ///
    /// Returns the removed record, or `None` if there was no match.
    pub fn remove(&mut self, flight_number: &str) -> Option<Flight> {
        match self.position(flight_number) {
            Some(idx) => {
                let removed = self.flights.remove(idx);
                info!("Flight {} removed successfully.", flight_number);
                Some(removed)
            }
            None => {
                info!("Flight {} not found.", flight_number);
                None
            }
        }
    }

    /// Find the first flight whose number equals `flight_number` exactly.
    ///
    /// Matching is case-sensitive: `aa963` does not find `AA963`.
    #[must_use]
    pub fn find(&self, flight_number: &str) -> Option<&Flight> {
        self.position(flight_number).map(|idx| &self.flights[idx])
    }

    fn position(&self, flight_number: &str) -> Option<usize> {
        self.flights
            .iter()
            .position(|flight| flight.flight_number == flight_number)
    }

    /// Count the flights operated by `airline`, ignoring case.
    pub fn count_by_airline(&self, airline: &str) -> usize {
        let count = self.filter_by_airline(airline).count();
        info!("Number of flights by {}: {}", airline, count);
        count
    }

    /// Iterate over the flights operated by `airline`, ignoring case, in
    /// registry order.
    pub fn filter_by_airline<'a>(&'a self, airline: &'a str) -> impl Iterator<Item = &'a Flight> {
        self.flights
            .iter()
            .filter(move |flight| flight.is_operated_by(airline))
    }

    /// Serialize the flights operated by `airline` as a flights document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn flights_json_by_airline(&self, airline: &str, style: JsonStyle) -> Result<String> {
        serialize_flights(self.filter_by_airline(airline), style)
    }

    /// Serialize every flight in the registry as a flights document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, style: JsonStyle) -> Result<String> {
        serialize_flights(&self.flights, style)
    }

    /// Iterate over all flights in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, Flight> {
        self.flights.iter()
    }

    /// Number of flights held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Check whether the registry holds no flights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Summarize the registry contents.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut by_status: BTreeMap<FlightStatus, usize> =
            FlightStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        let mut airlines = BTreeSet::new();

        for flight in &self.flights {
            *by_status.entry(flight.status).or_default() += 1;
            if !flight.airline.is_empty() {
                airlines.insert(fold_case(&flight.airline).collect::<String>());
            }
        }

        RegistryStats {
            total_flights: self.flights.len(),
            airlines: airlines.len(),
            by_status,
            earliest_departure: self.flights.iter().filter_map(|f| f.departure_time).min(),
            latest_arrival: self.flights.iter().filter_map(|f| f.arrival_time).max(),
        }
    }
}

impl<'a> IntoIterator for &'a FlightRegistry {
    type Item = &'a Flight;
    type IntoIter = std::slice::Iter<'a, Flight>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Statistics about the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Total number of flights held.
    pub total_flights: usize,
    /// Number of distinct non-empty airline names, ignoring case.
    pub airlines: usize,
    /// Flight count per status. Every status is present.
    pub by_status: BTreeMap<FlightStatus, usize>,
    /// Earliest departure among flights that have one.
    pub earliest_departure: Option<DateTime<FixedOffset>>,
    /// Latest arrival among flights that have one.
    pub latest_arrival: Option<DateTime<FixedOffset>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/flights.json");

    fn create_test_registry() -> FlightRegistry {
        let mut registry = FlightRegistry::new();
        registry.load(FIXTURE).expect("failed to load fixture");
        registry
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "flightregistry_test_{}_{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_new_is_empty() {
        let registry = FlightRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_load_fixture() {
        let mut registry = FlightRegistry::new();
        let outcome = registry.load(FIXTURE).unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { count: 6 });
        assert_eq!(registry.len(), 6);
        let numbers: Vec<&str> = registry.iter().map(|f| f.flight_number.as_str()).collect();
        assert_eq!(
            numbers,
            ["AA963", "W61001", "DL206", "W62287", "LH401", "W63310"]
        );
    }

    #[test]
    fn test_load_is_additive() {
        let mut registry = FlightRegistry::new();
        registry.add(Flight::new("X1", "Existing"));
        registry.add(Flight::new("X2", "Existing"));

        registry.load(FIXTURE).unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.iter().next().unwrap().flight_number, "X1");

        registry.load(FIXTURE).unwrap();
        assert_eq!(registry.len(), 14);
    }

    #[test]
    fn test_load_empty_array() {
        let path = temp_file("empty_array", r#"{"flights": []}"#);
        let mut registry = FlightRegistry::new();

        let outcome = registry.load(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { count: 0 });
        assert!(registry.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_without_flights_key() {
        let path = temp_file("no_key", r#"{"airports": ["JFK", "LHR"]}"#);
        let mut registry = create_test_registry();

        let outcome = registry.load(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::NoData);
        assert_eq!(registry.len(), 6);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_null_or_empty_document() {
        let mut registry = create_test_registry();
        assert_eq!(registry.load_str("null").unwrap(), LoadOutcome::NoData);
        assert_eq!(registry.load_str("").unwrap(), LoadOutcome::NoData);
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_load_malformed_leaves_registry_unchanged() {
        let path = temp_file("malformed", r#"{"flights": [{"FlightNumber": "AA1"},"#);
        let mut registry = create_test_registry();
        let before = registry.clone();

        let err = registry.load(&path).unwrap_err();
        assert!(err.is_parse_error());
        assert_eq!(registry, before);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_bad_record_appends_nothing() {
        let mut registry = FlightRegistry::new();
        let result = registry.load_str(
            r#"{"flights": [{"FlightNumber": "OK1"}, {"FlightNumber": "BAD", "Duration": "later"}]}"#,
        );
        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let mut registry = FlightRegistry::new();
        let err = registry
            .load("/nonexistent/path/flights.json")
            .unwrap_err();

        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.to_string().contains("/nonexistent/path/flights.json"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_always_appends() {
        let mut registry = FlightRegistry::new();
        registry.add(Flight::default());
        assert_eq!(registry.len(), 1);

        registry.add(Flight::default());
        assert_eq!(registry.len(), 2);

        registry.add(Flight::new("AA963", "American Airlines"));
        registry.add(Flight::new("AA963", "American Airlines"));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_remove_existing() {
        let mut registry = create_test_registry();
        let removed = registry.remove("DL206").unwrap();

        assert_eq!(removed.airline, "Delta Air Lines");
        assert_eq!(registry.len(), 5);
        assert!(registry.find("DL206").is_none());
    }

    #[test]
    fn test_remove_missing() {
        let mut registry = create_test_registry();
        assert!(registry.remove("ZZ999").is_none());
        assert!(registry.remove("aa963").is_none());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_remove_takes_earliest_duplicate() {
        let mut registry = FlightRegistry::new();
        registry.add(Flight::new("AA963", "First"));
        registry.add(Flight::new("DL206", "Other"));
        registry.add(Flight::new("AA963", "Second"));

        let removed = registry.remove("AA963").unwrap();
        assert_eq!(removed.airline, "First");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("AA963").unwrap().airline, "Second");
    }

    #[test]
    fn test_find_is_exact_and_case_sensitive() {
        let registry = create_test_registry();

        assert_eq!(
            registry.find("AA963").map(|f| f.destination.as_str()),
            Some("Dallas/Fort Worth")
        );
        assert!(registry.find("aa963").is_none());
        assert!(registry.find("AA96").is_none());
        assert!(registry.find("").is_none());
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut registry = FlightRegistry::new();
        registry.add(Flight::new("AA963", "First"));
        registry.add(Flight::new("AA963", "Second"));
        assert_eq!(registry.find("AA963").unwrap().airline, "First");
    }

    #[test]
    fn test_count_by_airline_ignores_case() {
        let registry = create_test_registry();

        assert_eq!(registry.count_by_airline("wizair"), 3);
        assert_eq!(registry.count_by_airline("WizAir"), 3);
        assert_eq!(registry.count_by_airline("Lufthansa"), 1);
        assert_eq!(registry.count_by_airline("Ryanair"), 0);
    }

    #[test]
    fn test_count_empty_airline_never_matches_filter() {
        let mut registry = FlightRegistry::new();
        registry.add(Flight::default());
        assert_eq!(registry.count_by_airline("WizAir"), 0);
    }

    #[test]
    fn test_filter_by_airline_preserves_order() {
        let registry = create_test_registry();
        let numbers: Vec<&str> = registry
            .filter_by_airline("WIZAIR")
            .map(|f| f.flight_number.as_str())
            .collect();
        assert_eq!(numbers, ["W61001", "W62287", "W63310"]);
    }

    #[test]
    fn test_filter_and_serialize_round_trip() {
        let registry = create_test_registry();
        let json = registry
            .flights_json_by_airline("wizair", JsonStyle::default())
            .unwrap();

        let mut reloaded = FlightRegistry::new();
        assert_eq!(
            reloaded.load_str(&json).unwrap(),
            LoadOutcome::Loaded { count: 3 }
        );

        let original: Vec<&Flight> = registry.filter_by_airline("wizair").collect();
        let restored: Vec<&Flight> = reloaded.iter().collect();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_filter_and_serialize_no_match() {
        let registry = create_test_registry();
        let json = registry
            .flights_json_by_airline("Ryanair", JsonStyle::Compact)
            .unwrap();
        assert_eq!(json, r#"{"flights":[]}"#);
    }

    #[test]
    fn test_to_json_round_trip() {
        let registry = create_test_registry();
        let json = registry.to_json(JsonStyle::Compact).unwrap();

        let mut reloaded = FlightRegistry::new();
        reloaded.load_str(&json).unwrap();
        assert_eq!(reloaded, registry);
    }

    #[test]
    fn test_add_find_count_scenario() {
        let mut registry = FlightRegistry::new();
        let now = Utc::now().fixed_offset();

        let mut flight = Flight::new("AB1237583", "Example Airlines");
        flight.destination = "Example Destination".to_string();
        flight.departure_time = Some(now);
        flight.arrival_time = Some(now + TimeDelta::hours(2));
        flight.status = FlightStatus::OnTime;
        flight.duration = TimeDelta::hours(2);
        flight.aircraft_type = "Boeing 737".to_string();
        flight.terminal = "A".to_string();

        registry.add(flight.clone());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("AB1237583"), Some(&flight));
        assert_eq!(registry.count_by_airline("example airlines"), 1);
    }

    #[test]
    fn test_stats_empty() {
        let stats = FlightRegistry::new().stats();

        assert_eq!(stats.total_flights, 0);
        assert_eq!(stats.airlines, 0);
        assert_eq!(stats.by_status.len(), FlightStatus::ALL.len());
        assert!(stats.by_status.values().all(|&n| n == 0));
        assert!(stats.earliest_departure.is_none());
        assert!(stats.latest_arrival.is_none());
    }

    #[test]
    fn test_stats_with_data() {
        let stats = create_test_registry().stats();

        assert_eq!(stats.total_flights, 6);
        assert_eq!(stats.airlines, 4);
        assert_eq!(stats.by_status[&FlightStatus::Boarding], 2);
        assert_eq!(stats.by_status[&FlightStatus::Cancelled], 1);
        assert_eq!(
            stats.earliest_departure.unwrap().with_timezone(&Utc),
            "2024-05-01T04:20:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(
            stats.latest_arrival.unwrap().with_timezone(&Utc),
            "2024-05-02T05:35:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_stats_groups_airlines_like_count() {
        let registry =
            FlightRegistry::from(vec![Flight::new("S1", "AΣ"), Flight::new("S2", "aσ")]);
        assert_eq!(registry.count_by_airline("aσ"), 2);
        assert_eq!(registry.stats().airlines, 1);
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_string(&create_test_registry().stats()).unwrap();
        assert!(json.contains("\"total_flights\":6"));
        assert!(json.contains("\"InFlight\":1"));
    }

    #[test]
    fn test_from_vec_and_into_iter() {
        let registry = FlightRegistry::from(vec![Flight::new("A", "X"), Flight::new("B", "Y")]);
        let mut count = 0;
        for flight in &registry {
            assert!(!flight.flight_number.is_empty());
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
