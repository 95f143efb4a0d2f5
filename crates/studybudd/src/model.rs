use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Importance of a study activity. Anything the extractor cannot recognize
/// collapses to `Medium` so a malformed model reply never stores an
/// out-of-enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High,
}

impl Priority {
  /// Lenient parse used on extractor output: unrecognized input falls back
  /// to the default rather than failing the whole extraction.
  pub fn parse_or_default(s: &str) -> Self {
    Priority::from_str(s).unwrap_or_default()
  }
}

impl FromStr for Priority {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "low" => Ok(Priority::Low),
      "medium" => Ok(Priority::Medium),
      "high" => Ok(Priority::High),
      _ => Err(()),
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Priority::Low => "Low",
      Priority::Medium => "Medium",
      Priority::High => "High",
    };
    write!(f, "{label}")
  }
}

pub const DEFAULT_NOTES: &str = "No additional notes";

/// One row of the persisted study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
  /// Sequential identifier of the form `ID-<n>`.
  pub id: String,
  pub name: String,
  /// ISO date string once resolved; left as the user's phrase when the
  /// resolver could not pin it down.
  pub date: String,
  pub time_start: String,
  pub time_end: String,
  pub priority: Priority,
  pub notes: String,
}

/// A nearby institution accepted by the confirmation filter. Ephemeral.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
  pub name: String,
  pub latitude: f64,
  pub longitude: f64,
}

/// A driving route between two locations. Ephemeral.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
  /// Decoded overview polyline, ordered from origin to destination.
  pub points: Vec<(f64, f64)>,
  /// Distance text taken verbatim from the directions response.
  pub distance_text: String,
  /// Duration text taken verbatim from the directions response.
  pub duration_text: String,
}
