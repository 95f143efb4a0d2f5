//! Credential loading.
//!
//! All API credentials live in one JSON document. A missing file or a missing
//! key yields `None` and only surfaces as an error at first use, which keeps
//! the offline commands (viewing or editing the plan) usable without any
//! credentials at all.

use crate::error::StudybuddError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// Contents of `credentials.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
  #[serde(default)]
  pub gemini_api_key: Option<String>,
  #[serde(default)]
  pub calendar_id: Option<String>,
  #[serde(default)]
  pub google_map_api_key: Option<String>,
}

impl Credentials {
  /// Load credentials from `path`. An absent or unreadable file is not an
  /// error here; every field is simply `None`.
  pub fn load(path: &Path) -> Self {
    match fs::read_to_string(path) {
      Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
        tracing::warn!("credentials file {} is not valid JSON: {e}", path.display());
        Credentials::default()
      }),
      Err(_) => Credentials::default(),
    }
  }

  pub fn gemini_api_key(&self) -> Result<&str, StudybuddError> {
    self
      .gemini_api_key
      .as_deref()
      .ok_or(StudybuddError::MissingCredential("gemini_api_key"))
  }

  pub fn calendar_id(&self) -> Result<&str, StudybuddError> {
    self.calendar_id.as_deref().ok_or(StudybuddError::MissingCredential("calendar_id"))
  }

  pub fn google_map_api_key(&self) -> Result<&str, StudybuddError> {
    self
      .google_map_api_key
      .as_deref()
      .ok_or(StudybuddError::MissingCredential("google_map_api_key"))
  }
}
