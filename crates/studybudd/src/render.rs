//! Map output.
//!
//! Locator results are rendered as GeoJSON so any map viewer can display
//! them; terminal presentation stays in the command layer.

use crate::locator::{NearestReport, RouteReport};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAP_FILE: &str = "map.geojson";

/// Markers for the origin and each accepted place.
pub fn places_geojson(report: &NearestReport) -> Value {
  let mut features: Vec<Value> = vec![json!({
    "type": "Feature",
    "geometry": {
      "type": "Point",
      "coordinates": [report.origin.1, report.origin.0],
    },
    "properties": { "name": "Origin", "role": "origin" },
  })];

  for place in &report.places {
    features.push(json!({
      "type": "Feature",
      "geometry": {
        "type": "Point",
        "coordinates": [place.longitude, place.latitude],
      },
      "properties": { "name": place.name, "role": "place" },
    }));
  }

  json!({ "type": "FeatureCollection", "features": features })
}

/// The decoded route as a line, with distance and duration as properties.
pub fn route_geojson(report: &RouteReport) -> Value {
  // GeoJSON positions are [lon, lat].
  let coordinates: Vec<Value> =
    report.route.points.iter().map(|(lat, lon)| json!([lon, lat])).collect();

  json!({
    "type": "FeatureCollection",
    "features": [{
      "type": "Feature",
      "geometry": { "type": "LineString", "coordinates": coordinates },
      "properties": {
        "origin": report.origin,
        "destination": report.destination,
        "distance": report.route.distance_text,
        "duration": report.route.duration_text,
      },
    }],
  })
}

pub fn write_geojson(path: &Path, value: &Value) -> Result<()> {
  let contents = serde_json::to_string_pretty(value)?;
  fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
