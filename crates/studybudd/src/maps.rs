//! Google Maps web service client: geocoding, nearby places, and driving
//! directions, plus the encoded-polyline decoder for route geometry.

use crate::error::StudybuddError;
use crate::model::RouteResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

const MAPS_API_BASE: &str = "https://maps.googleapis.com/maps/api";
const IP_LOCATOR_URL: &str = "https://ipinfo.io/json";

/// Search radius for nearby-places queries, in meters.
pub const NEARBY_RADIUS_M: u32 = 5000;

/// A raw nearby-places candidate, before the confirmation filter runs.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyCandidate {
  pub name: String,
  pub latitude: f64,
  pub longitude: f64,
}

/// Seam for the maps service so the locator flows are testable offline.
#[async_trait]
pub trait MapsApi: Send + Sync {
  /// Resolve a free-text address to coordinates.
  async fn geocode(&self, address: &str) -> Result<(f64, f64)>;

  /// Places of `place_type` within `radius` meters of the location.
  async fn places_nearby(
    &self,
    latitude: f64,
    longitude: f64,
    radius: u32,
    place_type: &str,
  ) -> Result<Vec<NearbyCandidate>>;

  /// Driving directions between two free-text locations. `None` when the
  /// service finds no route.
  async fn directions(&self, origin: &str, destination: &str) -> Result<Option<RouteResult>>;
}

#[derive(Debug, Deserialize)]
struct LatLng {
  lat: f64,
  lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
  location: LatLng,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
  geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
  #[serde(default)]
  results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
  name: String,
  geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
  #[serde(default)]
  results: Vec<NearbyResult>,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
  points: String,
}

#[derive(Debug, Deserialize)]
struct TextValue {
  text: String,
}

#[derive(Debug, Deserialize)]
struct RouteLeg {
  distance: TextValue,
  duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct Route {
  overview_polyline: OverviewPolyline,
  #[serde(default)]
  legs: Vec<RouteLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
  #[serde(default)]
  routes: Vec<Route>,
}

/// HTTP client for the Google Maps web services.
pub struct MapsClient {
  http: reqwest::Client,
  api_key: String,
  base_url: String,
}

impl MapsClient {
  pub fn new(http: reqwest::Client, api_key: &str) -> Self {
    Self { http, api_key: api_key.to_string(), base_url: MAPS_API_BASE.to_string() }
  }

  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = base_url.to_string();
    self
  }
}

#[async_trait]
impl MapsApi for MapsClient {
  async fn geocode(&self, address: &str) -> Result<(f64, f64)> {
    let url = format!("{}/geocode/json", self.base_url);
    let response: GeocodeResponse = self
      .http
      .get(&url)
      .query(&[("address", address), ("key", self.api_key.as_str())])
      .send()
      .await
      .context("geocode request failed")?
      .error_for_status()?
      .json()
      .await?;

    let location = response
      .results
      .into_iter()
      .next()
      .map(|r| r.geometry.location)
      .ok_or_else(|| StudybuddError::GeocodeFailed(address.to_string()))?;

    Ok((location.lat, location.lng))
  }

  async fn places_nearby(
    &self,
    latitude: f64,
    longitude: f64,
    radius: u32,
    place_type: &str,
  ) -> Result<Vec<NearbyCandidate>> {
    let url = format!("{}/place/nearbysearch/json", self.base_url);
    let response: NearbyResponse = self
      .http
      .get(&url)
      .query(&[
        ("location", format!("{latitude},{longitude}")),
        ("radius", radius.to_string()),
        ("type", place_type.to_string()),
        ("key", self.api_key.clone()),
      ])
      .send()
      .await
      .context("places-nearby request failed")?
      .error_for_status()?
      .json()
      .await?;

    Ok(
      response
        .results
        .into_iter()
        .map(|r| NearbyCandidate {
          name: r.name,
          latitude: r.geometry.location.lat,
          longitude: r.geometry.location.lng,
        })
        .collect(),
    )
  }

  async fn directions(&self, origin: &str, destination: &str) -> Result<Option<RouteResult>> {
    let url = format!("{}/directions/json", self.base_url);
    let response: DirectionsResponse = self
      .http
      .get(&url)
      .query(&[
        ("origin", origin),
        ("destination", destination),
        ("mode", "driving"),
        ("key", self.api_key.as_str()),
      ])
      .send()
      .await
      .context("directions request failed")?
      .error_for_status()?
      .json()
      .await?;

    let Some(route) = response.routes.into_iter().next() else {
      return Ok(None);
    };
    let Some(leg) = route.legs.into_iter().next() else {
      return Ok(None);
    };

    Ok(Some(RouteResult {
      points: decode_polyline(&route.overview_polyline.points),
      distance_text: leg.distance.text,
      duration_text: leg.duration.text,
    }))
  }
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
  loc: String,
}

/// Source of the fallback origin used when a request names no starting
/// location. Consulted lazily: flows that resolve an origin from the request
/// itself never touch it.
#[async_trait]
pub trait OriginSource: Send + Sync {
  async fn origin(&self) -> Result<(f64, f64)>;
}

/// IP-based fallback origin (ipinfo.io).
pub struct IpOriginSource {
  http: reqwest::Client,
}

impl IpOriginSource {
  pub fn new(http: reqwest::Client) -> Self {
    Self { http }
  }
}

#[async_trait]
impl OriginSource for IpOriginSource {
  async fn origin(&self) -> Result<(f64, f64)> {
    let response: IpInfoResponse = self
      .http
      .get(IP_LOCATOR_URL)
      .send()
      .await
      .context("IP locator request failed")?
      .error_for_status()?
      .json()
      .await?;

    let (lat, lon) = response
      .loc
      .split_once(',')
      .context("IP locator returned a malformed location")?;
    Ok((lat.trim().parse()?, lon.trim().parse()?))
  }
}

/// A fixed origin, e.g. coordinates supplied on the command line.
pub struct FixedOrigin(pub (f64, f64));

#[async_trait]
impl OriginSource for FixedOrigin {
  async fn origin(&self) -> Result<(f64, f64)> {
    Ok(self.0)
  }
}

/// Decode a Google encoded polyline (precision 1e-5) into (lat, lon) pairs.
pub fn decode_polyline(encoded: &str) -> Vec<(f64, f64)> {
  let mut points = Vec::new();
  let mut chars = encoded.bytes();
  let mut lat: i64 = 0;
  let mut lon: i64 = 0;

  loop {
    let Some(dlat) = decode_varint(&mut chars) else {
      break;
    };
    let Some(dlon) = decode_varint(&mut chars) else {
      break;
    };
    lat += dlat;
    lon += dlon;
    points.push((lat as f64 * 1e-5, lon as f64 * 1e-5));
  }

  points
}

fn decode_varint(bytes: &mut impl Iterator<Item = u8>) -> Option<i64> {
  let mut result: i64 = 0;
  let mut shift = 0;

  loop {
    let byte = bytes.next()?.checked_sub(63)? as i64;
    result |= (byte & 0x1f) << shift;
    shift += 5;
    if byte < 0x20 {
      break;
    }
  }

  // Zig-zag back to a signed delta.
  if result & 1 != 0 {
    Some(!(result >> 1))
  } else {
    Some(result >> 1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_the_reference_polyline() {
    // Reference vector from the encoded-polyline format documentation.
    let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    assert_eq!(points.len(), 3);

    let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
    for ((lat, lon), (want_lat, want_lon)) in points.iter().zip(expected) {
      assert!((lat - want_lat).abs() < 1e-9, "lat {lat} != {want_lat}");
      assert!((lon - want_lon).abs() < 1e-9, "lon {lon} != {want_lon}");
    }
  }

  #[test]
  fn empty_polyline_decodes_to_no_points() {
    assert!(decode_polyline("").is_empty());
  }

  #[test]
  fn truncated_polyline_keeps_complete_points() {
    let full = decode_polyline("_p~iF~ps|U_ulLnnqC");
    assert_eq!(full.len(), 2);

    // Drop the final byte mid-varint: only the complete leading point survives.
    let truncated = decode_polyline("_p~iF~ps|U_ulLnnq");
    assert_eq!(truncated.len(), 1);
  }
}
