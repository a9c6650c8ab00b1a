//! The `{"flights": [...]}` document format.
//!
//! Parsing and serialization here are pure: no file access and no logging.
//! [`FlightRegistry`](crate::FlightRegistry) builds on these to load files.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::flight::Flight;

/// Default number of spaces per indentation level in pretty output.
pub const DEFAULT_INDENT: usize = 2;

/// A parsed flights document.
///
/// `flights` is `None` when the key is absent or `null`, which is distinct
/// from an empty array.
///
/// The key may also be spelled `Flights`. The two spellings name the same
/// field, so a document carrying both is rejected as a duplicate field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FlightDocument {
    /// The flight records, in document order.
    #[serde(default, alias = "Flights")]
    pub flights: Option<Vec<Flight>>,
}

#[derive(Serialize)]
struct FlightsOut<'a> {
    flights: Vec<&'a Flight>,
}

/// How serialized JSON is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    /// Indented, one field per line.
    Pretty {
        /// Spaces per indentation level.
        indent: usize,
    },
    /// Single line, no whitespace.
    Compact,
}

impl Default for JsonStyle {
    fn default() -> Self {
        Self::Pretty {
            indent: DEFAULT_INDENT,
        }
    }
}

/// Parse a flights document.
///
/// Blank text and a bare `null` parse as a document without flights.
///
/// # Errors
///
/// Returns [`Error::Json`] if the text is not JSON, the top level is not an
/// object, or a flight entry has the wrong shape.
pub fn parse_document(json: &str) -> Result<FlightDocument> {
    if json.trim().is_empty() {
        return Ok(FlightDocument::default());
    }
    let document: Option<FlightDocument> = serde_json::from_str(json)?;
    Ok(document.unwrap_or_default())
}

/// Serialize flights, in the order given, as a `{"flights": [...]}` document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_flights<'a>(
    flights: impl IntoIterator<Item = &'a Flight>,
    style: JsonStyle,
) -> Result<String> {
    let document = FlightsOut {
        flights: flights.into_iter().collect(),
    };

    match style {
        JsonStyle::Compact => Ok(serde_json::to_string(&document)?),
        JsonStyle::Pretty { indent } => {
            let indent = " ".repeat(indent);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut buf = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            document.serialize(&mut serializer)?;
            String::from_utf8(buf)
                .map_err(|err| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
        }
    }
}
