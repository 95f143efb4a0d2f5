use thiserror::Error;

/// Failures surfaced by the planner pipelines.
///
/// Immediately-fatal conditions (a failed LLM call, an empty places result, a
/// missing route) carry a user-facing message; best-effort loops record their
/// failures per item instead of raising these.
#[derive(Debug, Error)]
pub enum StudybuddError {
  #[error("missing credential '{0}' in credentials file")]
  MissingCredential(&'static str),

  #[error("LLM request failed with status {0}")]
  LlmRequestFailed(u16),

  #[error("LLM returned no candidates")]
  EmptyLlmResponse,

  #[error("the model replied with an unrecognized label: {0:?}")]
  UnrecognizedLabel(String),

  #[error("please enter a valid type of educational institution")]
  NotAnInstitution,

  #[error("the request could not be classified as finding a place or a route")]
  UnsupportedRequest,

  #[error("no nearby places found")]
  NoPlacesFound,

  #[error("no route found, check your locations")]
  NoRouteFound,

  #[error("address {0:?} did not geocode to any location")]
  GeocodeFailed(String),

  #[error("workbook has no sheet named {0:?}")]
  MissingSheet(String),

  #[error("no event with id {0:?} in the study plan")]
  UnknownEventId(String),
}
