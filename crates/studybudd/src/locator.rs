//! Educational-institution locator.
//!
//! Two flows share the same front door: the model classifies the request as
//! a nearest-places search or a route request, then each flow asks further
//! questions (institution type, origin, destination) and drives the maps
//! service with the answers.
//!
//! Classification replies are a constrained-output contract: the prompt
//! names the only acceptable labels, and the parsers reject anything else
//! explicitly instead of guessing. The per-candidate confirmation filter is
//! the one deliberate exception - any reply containing "No" discards the
//! candidate, everything else accepts it.

use crate::error::StudybuddError;
use crate::llm::LlmClient;
use crate::maps::{MapsApi, OriginSource, NEARBY_RADIUS_M};
use crate::model::{PlaceResult, RouteResult};
use anyhow::Result;

/// Most candidates the nearest-places flow will accept.
pub const MAX_ACCEPTED_PLACES: usize = 5;

/// What the user wants from the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorIntent {
  FindNearest,
  FindRoute,
}

impl LocatorIntent {
  /// Parse a classifier reply. `Invalid` means the request is out of scope;
  /// anything outside the contract is an explicit error.
  pub fn parse(reply: &str) -> Result<Self, StudybuddError> {
    match reply.trim() {
      "Find Nearest" => Ok(LocatorIntent::FindNearest),
      "Find Route" => Ok(LocatorIntent::FindRoute),
      "Invalid" => Err(StudybuddError::UnsupportedRequest),
      other => Err(StudybuddError::UnrecognizedLabel(other.to_string())),
    }
  }
}

/// Closed set of institution labels used to constrain nearby-places queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstitutionType {
  PrimarySchool,
  SecondarySchool,
  University,
  School,
  Library,
}

impl InstitutionType {
  pub fn parse(reply: &str) -> Result<Self, StudybuddError> {
    match reply.trim() {
      "Primary School" => Ok(InstitutionType::PrimarySchool),
      "Secondary School" => Ok(InstitutionType::SecondarySchool),
      "University" => Ok(InstitutionType::University),
      "School" => Ok(InstitutionType::School),
      "Library" => Ok(InstitutionType::Library),
      "Invalid" => Err(StudybuddError::NotAnInstitution),
      other => Err(StudybuddError::UnrecognizedLabel(other.to_string())),
    }
  }

  /// Human-readable label, as used in prompts.
  pub fn label(&self) -> &'static str {
    match self {
      InstitutionType::PrimarySchool => "Primary School",
      InstitutionType::SecondarySchool => "Secondary School",
      InstitutionType::University => "University",
      InstitutionType::School => "School",
      InstitutionType::Library => "Library",
    }
  }

  /// Place-type parameter for the nearby-places query.
  pub fn query_param(&self) -> &'static str {
    match self {
      InstitutionType::PrimarySchool => "primary_school",
      InstitutionType::SecondarySchool => "secondary_school",
      InstitutionType::University => "university",
      InstitutionType::School => "school",
      InstitutionType::Library => "library",
    }
  }
}

/// Yes/No contract used for the "is a location mentioned" question.
fn parse_yes_no(reply: &str) -> Result<bool, StudybuddError> {
  match reply.trim() {
    "Yes" => Ok(true),
    "No" => Ok(false),
    other => Err(StudybuddError::UnrecognizedLabel(other.to_string())),
  }
}

async fn classify_intent(llm: &dyn LlmClient, user_input: &str) -> Result<LocatorIntent> {
  let prompt = format!(
    "Classify '{user_input}' as a request to find the nearest educational institution or a \
     route to one. Answer with exactly one of 'Find Nearest', 'Find Route', or 'Invalid'."
  );
  let reply = llm.generate(&prompt).await?;
  Ok(LocatorIntent::parse(&reply)?)
}

async fn classify_institution(llm: &dyn LlmClient, user_input: &str) -> Result<InstitutionType> {
  let prompt = format!(
    "Is any educational institution mentioned in '{user_input}'? Answer with exactly one of \
     'Primary School', 'Secondary School', 'University', 'School', or 'Library', else answer \
     'Invalid'."
  );
  let reply = llm.generate(&prompt).await?;
  Ok(InstitutionType::parse(&reply)?)
}

async fn mentions_location(llm: &dyn LlmClient, user_input: &str) -> Result<bool> {
  let prompt = format!(
    "In '{user_input}', is there mentioned any location that exists on a map? Answer with \
     exactly 'Yes' or 'No'."
  );
  let reply = llm.generate(&prompt).await?;
  Ok(parse_yes_no(&reply)?)
}

async fn extract_starting_location(llm: &dyn LlmClient, user_input: &str) -> Result<String> {
  let prompt = format!("From '{user_input}', answer me the starting location only, no other word");
  Ok(llm.generate(&prompt).await?.trim().to_string())
}

async fn extract_destination(llm: &dyn LlmClient, user_input: &str) -> Result<String> {
  let prompt = format!("From '{user_input}', answer me the ending location only, no other word");
  Ok(llm.generate(&prompt).await?.trim().to_string())
}

/// Where the search starts from: a location the user named, geocoded, or the
/// externally supplied fallback (IP-based) when none was mentioned. The
/// fallback source is only consulted in the second case.
async fn resolve_origin(
  llm: &dyn LlmClient,
  maps: &dyn MapsApi,
  user_input: &str,
  fallback: &dyn OriginSource,
) -> Result<(f64, f64)> {
  if mentions_location(llm, user_input).await? {
    let address = extract_starting_location(llm, user_input).await?;
    maps.geocode(&address).await
  } else {
    fallback.origin().await
  }
}

/// Result of the nearest-places flow, ready for rendering.
#[derive(Debug, Clone)]
pub struct NearestReport {
  pub institution: InstitutionType,
  pub origin: (f64, f64),
  pub places: Vec<PlaceResult>,
  pub description: String,
}

/// Result of the route flow, ready for rendering.
#[derive(Debug, Clone)]
pub struct RouteReport {
  pub origin: String,
  pub destination: String,
  pub route: RouteResult,
}

/// What the locator produced for a given request.
#[derive(Debug)]
pub enum LocatorReport {
  Nearest(NearestReport),
  Route(RouteReport),
}

/// Front door: classify the request and run the matching flow.
pub async fn locate(
  llm: &dyn LlmClient,
  maps: &dyn MapsApi,
  user_input: &str,
  fallback_origin: &dyn OriginSource,
) -> Result<LocatorReport> {
  match classify_intent(llm, user_input).await? {
    LocatorIntent::FindNearest => {
      find_nearest(llm, maps, user_input, fallback_origin).await.map(LocatorReport::Nearest)
    }
    LocatorIntent::FindRoute => {
      find_route(llm, maps, user_input, fallback_origin).await.map(LocatorReport::Route)
    }
  }
}

/// Nearest-places flow: classify the institution type, resolve the origin,
/// query within the fixed radius, then keep only candidates the model
/// confirms (capped at [`MAX_ACCEPTED_PLACES`]).
pub async fn find_nearest(
  llm: &dyn LlmClient,
  maps: &dyn MapsApi,
  user_input: &str,
  fallback_origin: &dyn OriginSource,
) -> Result<NearestReport> {
  let institution = classify_institution(llm, user_input).await?;
  let origin = resolve_origin(llm, maps, user_input, fallback_origin).await?;

  let candidates =
    maps.places_nearby(origin.0, origin.1, NEARBY_RADIUS_M, institution.query_param()).await?;
  if candidates.is_empty() {
    return Err(StudybuddError::NoPlacesFound.into());
  }

  let mut places = Vec::new();
  for candidate in candidates {
    if places.len() == MAX_ACCEPTED_PLACES {
      break;
    }

    let prompt = format!(
      "Is '{}' really a {}? (answer in form 'Yes' or 'No')",
      candidate.name,
      institution.label()
    );
    let confirmation = llm.generate(&prompt).await?;
    if confirmation.contains("No") {
      tracing::debug!("discarding candidate {:?}", candidate.name);
      continue;
    }

    places.push(PlaceResult {
      name: candidate.name,
      latitude: candidate.latitude,
      longitude: candidate.longitude,
    });
  }

  if places.is_empty() {
    return Err(StudybuddError::NoPlacesFound.into());
  }

  let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
  let description = llm
    .generate(&format!("Introduce in detail among {} in list form", names.join(", ")))
    .await?;

  Ok(NearestReport { institution, origin, places, description })
}

/// Route flow: validate the request, extract origin and destination phrases,
/// and fetch driving directions.
pub async fn find_route(
  llm: &dyn LlmClient,
  maps: &dyn MapsApi,
  user_input: &str,
  fallback_origin: &dyn OriginSource,
) -> Result<RouteReport> {
  let prompt = format!(
    "Does '{user_input}' mention an educational institution that exists on a map? Answer with \
     exactly 'Valid' or 'Invalid'."
  );
  match llm.generate(&prompt).await?.trim() {
    "Valid" => {}
    "Invalid" => return Err(StudybuddError::NotAnInstitution.into()),
    other => return Err(StudybuddError::UnrecognizedLabel(other.to_string()).into()),
  }

  let origin = if mentions_location(llm, user_input).await? {
    extract_starting_location(llm, user_input).await?
  } else {
    let (lat, lon) = fallback_origin.origin().await?;
    format!("{lat},{lon}")
  };
  let destination = extract_destination(llm, user_input).await?;

  let route = maps
    .directions(&origin, &destination)
    .await?
    .ok_or(StudybuddError::NoRouteFound)?;

  Ok(RouteReport { origin, destination, route })
}
