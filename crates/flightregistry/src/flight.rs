//! Core flight types for flightregistry.
//!
//! This module defines the flight record and its JSON mapping. Field names on
//! the wire are `PascalCase` (`FlightNumber`, `DepartureTime`, ...) so that
//! documents written by existing producers load unchanged.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};

/// Operational status of a flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FlightStatus {
    /// Departing as scheduled.
    #[default]
    OnTime,
    /// Departure pushed back.
    Delayed,
    /// Will not operate.
    Cancelled,
    /// Passengers are boarding.
    Boarding,
    /// Airborne.
    InFlight,
}

impl FlightStatus {
    /// All statuses, in ordinal order.
    pub const ALL: [Self; 5] = [
        Self::OnTime,
        Self::Delayed,
        Self::Cancelled,
        Self::Boarding,
        Self::InFlight,
    ];

    /// The canonical name used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTime => "OnTime",
            Self::Delayed => "Delayed",
            Self::Cancelled => "Cancelled",
            Self::Boarding => "Boarding",
            Self::InFlight => "InFlight",
        }
    }

    /// Look up a status by name, ignoring letter case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Look up a status by its ordinal (`OnTime` = 0).
    #[must_use]
    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Some producers write the enum as its ordinal rather than its name.
impl<'de> Deserialize<'de> for FlightStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StatusVisitor;

        impl serde::de::Visitor<'_> for StatusVisitor {
            type Value = FlightStatus;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flight status name or ordinal")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                FlightStatus::from_name(v)
                    .ok_or_else(|| E::custom(format!("unknown flight status '{v}'")))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                FlightStatus::from_ordinal(v)
                    .ok_or_else(|| E::custom(format!("flight status ordinal {v} out of range")))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(FlightStatus::from_ordinal)
                    .ok_or_else(|| E::custom(format!("flight status ordinal {v} out of range")))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(FlightStatus::default())
            }
        }

        deserializer.deserialize_any(StatusVisitor)
    }
}

/// A single scheduled flight.
///
/// Every field has a blank value (empty string, `None`, zero duration,
/// [`FlightStatus::OnTime`]); `Flight::default()` is a valid record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Flight {
    /// Identifier such as `AA963`. Not required to be unique.
    #[serde(deserialize_with = "null_as_empty")]
    pub flight_number: String,

    /// Operating airline. Matched without regard to letter case.
    #[serde(deserialize_with = "null_as_empty")]
    pub airline: String,

    /// Destination, free text.
    #[serde(deserialize_with = "null_as_empty")]
    pub destination: String,

    /// Scheduled departure, keeping the offset it was written with.
    #[serde(with = "timestamp")]
    pub departure_time: Option<DateTime<FixedOffset>>,

    /// Scheduled arrival, keeping the offset it was written with.
    #[serde(with = "timestamp")]
    pub arrival_time: Option<DateTime<FixedOffset>>,

    /// Boarding gate, if assigned.
    pub gate: Option<String>,

    /// Current status.
    pub status: FlightStatus,

    /// Block time. Not checked against departure and arrival.
    #[serde(with = "time_span")]
    pub duration: TimeDelta,

    /// Aircraft model, e.g. `Boeing 737`.
    #[serde(deserialize_with = "null_as_empty")]
    pub aircraft_type: String,

    /// Terminal, free text.
    #[serde(deserialize_with = "null_as_empty")]
    pub terminal: String,
}

impl Default for Flight {
    fn default() -> Self {
        Self {
            flight_number: String::new(),
            airline: String::new(),
            destination: String::new(),
            departure_time: None,
            arrival_time: None,
            gate: None,
            status: FlightStatus::default(),
            duration: TimeDelta::zero(),
            aircraft_type: String::new(),
            terminal: String::new(),
        }
    }
}

/// Lowercase `text` one character at a time.
///
/// Airline names are grouped by this folding everywhere, so it must not depend
/// on a character's position in the word.
pub(crate) fn fold_case(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

impl Flight {
    /// Create a flight with the given number and airline; all other fields blank.
    #[must_use]
    pub fn new(flight_number: impl Into<String>, airline: impl Into<String>) -> Self {
        Self {
            flight_number: flight_number.into(),
            airline: airline.into(),
            ..Self::default()
        }
    }

    /// Check whether this flight is operated by `airline`, ignoring case.
    ///
    /// Comparison is ordinal (per-character case folding), not locale-aware.
    #[must_use]
    pub fn is_operated_by(&self, airline: &str) -> bool {
        fold_case(&self.airline).eq(fold_case(airline))
    }

    /// One-line human readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Flight Number: {}, Airline: {}, Destination: {}, Departure Time: {}, Arrival Time: {}, Status: {}",
            self.flight_number,
            self.airline,
            self.destination,
            display_time(self.departure_time.as_ref()),
            display_time(self.arrival_time.as_ref()),
            self.status,
        )
    }
}

fn display_time(time: Option<&DateTime<FixedOffset>>) -> String {
    time.map_or_else(|| "-".to_string(), timestamp::format)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 timestamps. Values without an offset are taken as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub(crate) fn format(time: &DateTime<FixedOffset>) -> String {
        time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub(crate) fn parse(text: &str) -> Option<DateTime<FixedOffset>> {
        let text = text.trim();
        if let Ok(time) = DateTime::parse_from_rfc3339(text) {
            return Some(time);
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc().fixed_offset())
    }

    #[allow(clippy::ref_option)] // signature fixed by `serialize_with`
    pub(crate) fn serialize<S>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(time) = value {
            serializer.serialize_str(&format(time))
        } else {
            serializer.serialize_none()
        }
    }

    pub(crate) fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{text}'"))),
        }
    }
}

/// Durations as `[-][d.]hh:mm:ss[.fffffff]` time spans.
///
/// ISO-8601 durations (`PT2H30M`) are also accepted when reading.
pub(crate) mod time_span {
    use std::fmt::Write;

    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    const SECS_PER_DAY: i64 = 86_400;
    const SECS_PER_HOUR: i64 = 3_600;
    const SECS_PER_MINUTE: i64 = 60;

    pub(crate) fn format(delta: TimeDelta) -> String {
        let negative = delta < TimeDelta::zero();
        let delta = delta.abs();
        let total = delta.num_seconds();
        let nanos = delta.subsec_nanos();

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        let days = total / SECS_PER_DAY;
        if days > 0 {
            let _ = write!(out, "{days}.");
        }
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            (total % SECS_PER_DAY) / SECS_PER_HOUR,
            (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            total % SECS_PER_MINUTE,
        );
        if nanos > 0 {
            let frac = format!("{nanos:09}");
            out.push('.');
            out.push_str(frac.trim_end_matches('0'));
        }
        out
    }

    pub(crate) fn parse(text: &str) -> Option<TimeDelta> {
        let text = text.trim();
        let (negative, body) = text
            .strip_prefix('-')
            .map_or((false, text), |rest| (true, rest));
        let delta = if let Some(iso) = body.strip_prefix('P') {
            parse_iso8601(iso)?
        } else {
            parse_clock(body)?
        };
        Some(if negative { -delta } else { delta })
    }

    fn parse_clock(body: &str) -> Option<TimeDelta> {
        let parts: Vec<&str> = body.split(':').collect();
        let (head, minutes, seconds) = match parts.as_slice() {
            [head, minutes] => (*head, *minutes, "0"),
            [head, minutes, seconds] => (*head, *minutes, *seconds),
            _ => return None,
        };
        let (days, hours) = if let Some((days, hours)) = head.split_once('.') {
            (digits(days)?, digits(hours)?)
        } else {
            (0, digits(head)?)
        };
        let minutes = digits(minutes)?;
        let (secs, nanos) = seconds_with_fraction(seconds)?;
        if minutes >= 60 || secs >= 60 {
            return None;
        }
        let total = days
            .checked_mul(SECS_PER_DAY)?
            .checked_add(hours.checked_mul(SECS_PER_HOUR)?)?
            .checked_add(minutes * SECS_PER_MINUTE)?
            .checked_add(secs)?;
        TimeDelta::new(total, nanos)
    }

    fn parse_iso8601(body: &str) -> Option<TimeDelta> {
        let (date_part, time_part) = body
            .split_once('T')
            .map_or((body, None), |(date, time)| (date, Some(time)));
        if date_part.is_empty() && time_part.map_or(true, str::is_empty) {
            return None;
        }

        let mut total = TimeDelta::zero();
        for (value, unit) in designators(date_part)? {
            let scale = match unit {
                'W' => 7 * SECS_PER_DAY,
                'D' => SECS_PER_DAY,
                // Years and months have no fixed length.
                _ => return None,
            };
            let secs = digits(value)?.checked_mul(scale)?;
            total = total.checked_add(&TimeDelta::new(secs, 0)?)?;
        }

        if let Some(time_part) = time_part {
            let components = designators(time_part)?;
            if components.is_empty() {
                return None;
            }
            for (value, unit) in components {
                let part = match unit {
                    'H' => TimeDelta::new(digits(value)?.checked_mul(SECS_PER_HOUR)?, 0)?,
                    'M' => TimeDelta::new(digits(value)?.checked_mul(SECS_PER_MINUTE)?, 0)?,
                    'S' => {
                        let (secs, nanos) = seconds_with_fraction(value)?;
                        TimeDelta::new(secs, nanos)?
                    }
                    _ => return None,
                };
                total = total.checked_add(&part)?;
            }
        }
        Some(total)
    }

    /// Split `1D12H` style text into `("1", 'D'), ("12", 'H')`.
    fn designators(text: &str) -> Option<Vec<(&str, char)>> {
        let mut out = Vec::new();
        let mut start = 0;
        for (idx, ch) in text.char_indices() {
            if ch.is_ascii_alphabetic() {
                if idx == start {
                    return None;
                }
                out.push((&text[start..idx], ch));
                start = idx + ch.len_utf8();
            }
        }
        if start != text.len() {
            return None;
        }
        Some(out)
    }

    fn digits(text: &str) -> Option<i64> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse().ok()
    }

    fn seconds_with_fraction(text: &str) -> Option<(i64, u32)> {
        let (whole, frac) = text.split_once(['.', ',']).unwrap_or((text, ""));
        let secs = digits(whole)?;
        if frac.is_empty() {
            return Some((secs, 0));
        }
        if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let nanos = format!("{frac:0<9}").parse().ok()?;
        Some((secs, nanos))
    }

    pub(crate) fn serialize<S>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*value))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(TimeDelta::zero());
        };
        parse(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid duration '{text}'")))
    }
}
