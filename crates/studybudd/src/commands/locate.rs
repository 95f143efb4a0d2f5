use crate::config::Credentials;
use crate::llm::GeminiClient;
use crate::locator::{self, LocatorReport};
use crate::maps::{FixedOrigin, IpOriginSource, MapsClient, OriginSource};
use crate::render;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

fn parse_origin(origin: &str) -> Result<(f64, f64)> {
  let (lat, lon) = origin
    .split_once(',')
    .with_context(|| format!("origin {origin:?} is not in \"lat,lon\" form"))?;
  Ok((lat.trim().parse()?, lon.trim().parse()?))
}

/// Run the locator: classify the request, find nearest institutions or a
/// route, write the map as GeoJSON, and summarize in the terminal.
pub async fn handle(
  credentials: &Credentials,
  query: &str,
  origin: Option<&str>,
  map_file: &Path,
) -> Result<()> {
  if query.trim().is_empty() {
    anyhow::bail!("please describe the educational institution to find or route to");
  }

  let http = reqwest::Client::new();
  let llm = GeminiClient::new(http.clone(), credentials.gemini_api_key()?);
  let maps_client = MapsClient::new(http.clone(), credentials.google_map_api_key()?);

  // The IP lookup only ever runs if the flow actually needs a fallback.
  let fallback_origin: Box<dyn OriginSource> = match origin {
    Some(origin) => Box::new(FixedOrigin(parse_origin(origin)?)),
    None => Box::new(IpOriginSource::new(http.clone())),
  };

  match locator::locate(&llm, &maps_client, query, fallback_origin.as_ref()).await? {
    LocatorReport::Nearest(report) => {
      println!("{}", format!("Nearest {}(s):", report.institution.label()).bold());
      for place in &report.places {
        println!("📍 {}", place.name);
      }

      render::write_geojson(map_file, &render::places_geojson(&report))?;
      println!("{} Map written to {}", "✓".green(), map_file.display());

      println!("\n{}", "Places Description".bold());
      println!("{}", report.description);
    }
    LocatorReport::Route(report) => {
      println!(
        "{} Route found! Distance: {}, Duration: {}",
        "✓".green(),
        report.route.distance_text,
        report.route.duration_text
      );
      println!("From {} to {}", report.origin, report.destination);

      render::write_geojson(map_file, &render::route_geojson(&report))?;
      println!("{} Map written to {}", "✓".green(), map_file.display());
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn origin_parses_lat_lon_pair() {
    assert_eq!(parse_origin("3.07, 101.58").unwrap(), (3.07, 101.58));
  }

  #[test]
  fn origin_without_comma_is_rejected() {
    assert!(parse_origin("3.07 101.58").is_err());
  }
}
