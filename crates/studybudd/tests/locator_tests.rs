use anyhow::Result;
use async_trait::async_trait;
use studybudd::error::StudybuddError;
use studybudd::llm::LlmClient;
use studybudd::locator::{self, InstitutionType, LocatorReport, MAX_ACCEPTED_PLACES};
use studybudd::maps::{FixedOrigin, MapsApi, NearbyCandidate, OriginSource};
use studybudd::model::RouteResult;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted LLM: the first pattern contained in the prompt wins.
struct ScriptedLlm {
  replies: Vec<(&'static str, String)>,
}

impl ScriptedLlm {
  fn new(replies: Vec<(&'static str, &str)>) -> Self {
    Self { replies: replies.into_iter().map(|(p, r)| (p, r.to_string())).collect() }
  }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
  async fn generate(&self, prompt: &str) -> Result<String> {
    for (pattern, reply) in &self.replies {
      if prompt.contains(pattern) {
        return Ok(reply.clone());
      }
    }
    anyhow::bail!("no scripted reply for prompt: {prompt}")
  }
}

struct ScriptedMaps {
  candidates: Vec<NearbyCandidate>,
  route: Option<RouteResult>,
}

impl ScriptedMaps {
  fn with_candidates(names: &[&str]) -> Self {
    let candidates = names
      .iter()
      .enumerate()
      .map(|(i, name)| NearbyCandidate {
        name: name.to_string(),
        latitude: 3.0 + i as f64 * 0.01,
        longitude: 101.5 + i as f64 * 0.01,
      })
      .collect();
    Self { candidates, route: None }
  }
}

#[async_trait]
impl MapsApi for ScriptedMaps {
  async fn geocode(&self, _address: &str) -> Result<(f64, f64)> {
    Ok((3.07, 101.58))
  }

  async fn places_nearby(
    &self,
    _latitude: f64,
    _longitude: f64,
    _radius: u32,
    _place_type: &str,
  ) -> Result<Vec<NearbyCandidate>> {
    Ok(self.candidates.clone())
  }

  async fn directions(&self, _origin: &str, _destination: &str) -> Result<Option<RouteResult>> {
    Ok(self.route.clone())
  }
}

const FALLBACK_COORDS: (f64, f64) = (3.20, 101.60);
const FALLBACK: FixedOrigin = FixedOrigin(FALLBACK_COORDS);

/// Fallback source that fails on use, for asserting it is never consulted
/// when the request names its own location.
struct UnreachableOrigin {
  calls: AtomicUsize,
}

impl UnreachableOrigin {
  fn new() -> Self {
    Self { calls: AtomicUsize::new(0) }
  }
}

#[async_trait]
impl OriginSource for UnreachableOrigin {
  async fn origin(&self) -> Result<(f64, f64)> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    anyhow::bail!("origin lookup service is unreachable")
  }
}

#[tokio::test]
async fn rejected_candidates_never_reach_the_report() {
  let llm = ScriptedLlm::new(vec![
    ("mentioned in", "University"),
    ("is there mentioned any location", "No"),
    ("'Fake Uni' really", "No, that is a shopping mall"),
    ("really a", "Yes"),
    ("Introduce in detail", "A fine set of universities."),
  ]);
  let maps = ScriptedMaps::with_candidates(&["Real Uni A", "Fake Uni", "Real Uni B"]);

  let report = locator::find_nearest(&llm, &maps, "nearest university?", &FALLBACK).await.unwrap();

  let names: Vec<_> = report.places.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, vec!["Real Uni A", "Real Uni B"]);
  assert_eq!(report.institution, InstitutionType::University);
  assert_eq!(report.description, "A fine set of universities.");
}

#[tokio::test]
async fn accepted_list_is_capped_at_five() {
  let llm = ScriptedLlm::new(vec![
    ("mentioned in", "Library"),
    ("is there mentioned any location", "No"),
    ("really a", "Yes"),
    ("Introduce in detail", "Libraries, described."),
  ]);
  let maps =
    ScriptedMaps::with_candidates(&["L1", "L2", "L3", "L4", "L5", "L6", "L7"]);

  let report = locator::find_nearest(&llm, &maps, "libraries near me", &FALLBACK).await.unwrap();

  assert_eq!(report.places.len(), MAX_ACCEPTED_PLACES);
  assert_eq!(report.places[4].name, "L5");
}

#[tokio::test]
async fn fallback_origin_is_used_when_no_location_is_mentioned() {
  let llm = ScriptedLlm::new(vec![
    ("mentioned in", "School"),
    ("is there mentioned any location", "No"),
    ("really a", "Yes"),
    ("Introduce in detail", "ok"),
  ]);
  let maps = ScriptedMaps::with_candidates(&["Some School"]);

  let report = locator::find_nearest(&llm, &maps, "schools nearby", &FALLBACK).await.unwrap();
  assert_eq!(report.origin, FALLBACK_COORDS);
}

#[tokio::test]
async fn mentioned_location_is_geocoded_instead() {
  let llm = ScriptedLlm::new(vec![
    ("mentioned in", "School"),
    ("is there mentioned any location", "Yes"),
    ("starting location only", "Rawang"),
    ("really a", "Yes"),
    ("Introduce in detail", "ok"),
  ]);
  let maps = ScriptedMaps::with_candidates(&["Some School"]);

  let report =
    locator::find_nearest(&llm, &maps, "schools around Rawang", &FALLBACK).await.unwrap();
  assert_eq!(report.origin, (3.07, 101.58));
}

#[tokio::test]
async fn fallback_lookup_is_skipped_when_a_location_is_mentioned() {
  let llm = ScriptedLlm::new(vec![
    ("mentioned in", "School"),
    ("is there mentioned any location", "Yes"),
    ("starting location only", "Rawang"),
    ("really a", "Yes"),
    ("Introduce in detail", "ok"),
  ]);
  let maps = ScriptedMaps::with_candidates(&["Some School"]);
  let fallback = UnreachableOrigin::new();

  let report =
    locator::find_nearest(&llm, &maps, "schools around Rawang", &fallback).await.unwrap();

  assert_eq!(report.origin, (3.07, 101.58));
  assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn route_flow_skips_fallback_when_origin_is_mentioned() {
  let llm = ScriptedLlm::new(vec![
    ("Answer with exactly 'Valid' or 'Invalid'", "Valid"),
    ("is there mentioned any location", "Yes"),
    ("starting location only", "Rawang"),
    ("ending location only", "University XYZ"),
  ]);
  let mut maps = ScriptedMaps::with_candidates(&[]);
  maps.route = Some(RouteResult {
    points: vec![(3.32, 101.57)],
    distance_text: "1 km".to_string(),
    duration_text: "2 mins".to_string(),
  });
  let fallback = UnreachableOrigin::new();

  let report = locator::find_route(&llm, &maps, "route from Rawang to University XYZ", &fallback)
    .await
    .unwrap();

  assert_eq!(report.origin, "Rawang");
  assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_institution_request_is_an_explicit_error() {
  let llm = ScriptedLlm::new(vec![("mentioned in", "Invalid")]);
  let maps = ScriptedMaps::with_candidates(&[]);

  let err = locator::find_nearest(&llm, &maps, "nearest burger joint", &FALLBACK)
    .await
    .unwrap_err();
  assert!(matches!(
    err.downcast_ref::<StudybuddError>(),
    Some(StudybuddError::NotAnInstitution)
  ));
}

#[tokio::test]
async fn off_contract_classifier_reply_fails_instead_of_defaulting() {
  let llm = ScriptedLlm::new(vec![("mentioned in", "Well, it could be a university")]);
  let maps = ScriptedMaps::with_candidates(&[]);

  let err = locator::find_nearest(&llm, &maps, "nearest university", &FALLBACK)
    .await
    .unwrap_err();
  assert!(matches!(
    err.downcast_ref::<StudybuddError>(),
    Some(StudybuddError::UnrecognizedLabel(_))
  ));
}

#[tokio::test]
async fn empty_places_result_is_fatal() {
  let llm = ScriptedLlm::new(vec![
    ("mentioned in", "University"),
    ("is there mentioned any location", "No"),
  ]);
  let maps = ScriptedMaps::with_candidates(&[]);

  let err =
    locator::find_nearest(&llm, &maps, "nearest university", &FALLBACK).await.unwrap_err();
  assert!(matches!(
    err.downcast_ref::<StudybuddError>(),
    Some(StudybuddError::NoPlacesFound)
  ));
}

#[tokio::test]
async fn route_flow_returns_directions_and_texts() {
  let llm = ScriptedLlm::new(vec![
    ("Answer with exactly 'Valid' or 'Invalid'", "Valid"),
    ("is there mentioned any location", "Yes"),
    ("starting location only", "Rawang"),
    ("ending location only", "University XYZ"),
  ]);
  let mut maps = ScriptedMaps::with_candidates(&[]);
  maps.route = Some(RouteResult {
    points: vec![(3.32, 101.57), (3.12, 101.59)],
    distance_text: "32.4 km".to_string(),
    duration_text: "41 mins".to_string(),
  });

  let report = locator::find_route(&llm, &maps, "route from Rawang to University XYZ", &FALLBACK)
    .await
    .unwrap();

  assert_eq!(report.origin, "Rawang");
  assert_eq!(report.destination, "University XYZ");
  assert_eq!(report.route.distance_text, "32.4 km");
  assert_eq!(report.route.points.len(), 2);
}

#[tokio::test]
async fn missing_route_is_fatal() {
  let llm = ScriptedLlm::new(vec![
    ("Answer with exactly 'Valid' or 'Invalid'", "Valid"),
    ("is there mentioned any location", "Yes"),
    ("starting location only", "Nowhere"),
    ("ending location only", "Equally Nowhere"),
  ]);
  let maps = ScriptedMaps::with_candidates(&[]);

  let err = locator::find_route(&llm, &maps, "route please", &FALLBACK).await.unwrap_err();
  assert!(matches!(
    err.downcast_ref::<StudybuddError>(),
    Some(StudybuddError::NoRouteFound)
  ));
}

#[tokio::test]
async fn locate_dispatches_on_the_intent_label() {
  let llm = ScriptedLlm::new(vec![
    ("Classify", "Find Nearest"),
    ("mentioned in", "University"),
    ("is there mentioned any location", "No"),
    ("really a", "Yes"),
    ("Introduce in detail", "ok"),
  ]);
  let maps = ScriptedMaps::with_candidates(&["Uni"]);

  let report = locator::locate(&llm, &maps, "nearest university", &FALLBACK).await.unwrap();
  assert!(matches!(report, LocatorReport::Nearest(_)));
}

#[tokio::test]
async fn unclassifiable_request_is_reported_as_unsupported() {
  let llm = ScriptedLlm::new(vec![("Classify", "Invalid")]);
  let maps = ScriptedMaps::with_candidates(&[]);

  let err = locator::locate(&llm, &maps, "what is the meaning of life", &FALLBACK)
    .await
    .unwrap_err();
  assert!(matches!(
    err.downcast_ref::<StudybuddError>(),
    Some(StudybuddError::UnsupportedRequest)
  ));
}
