//! Google Calendar sync.
//!
//! Authentication follows the service-account flow: an RS256-signed JWT is
//! exchanged at the key's token endpoint for a bearer token. Event times come
//! back from the LLM as free text, so each row needs two normalization calls
//! before the insert payload can be built.
//!
//! Sync is best-effort with no rollback or retry: each row either lands on
//! the calendar or is recorded as failed, and the loop carries on.

use crate::llm::LlmClient;
use crate::model::EventRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_KEY_FILE: &str = "google_credentials.json";

const SCOPES: &str = "https://www.googleapis.com/auth/calendar";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const EVENTS_API_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// Every synced event is pinned to this timezone.
pub const TIMEZONE: &str = "Asia/Kuala_Lumpur";

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
  client_email: String,
  private_key: String,
  token_uri: String,
}

#[derive(Debug, Serialize)]
struct Claims {
  iss: String,
  scope: String,
  aud: String,
  exp: i64,
  iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
  access_token: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventDateTime {
  #[serde(rename = "dateTime")]
  pub date_time: String,
  #[serde(rename = "timeZone")]
  pub time_zone: String,
}

/// Payload for the calendar events-insert call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventPayload {
  pub summary: String,
  pub description: String,
  pub start: EventDateTime,
  pub end: EventDateTime,
}

/// Seam for the calendar service so sync logic is testable offline.
#[async_trait]
pub trait CalendarApi: Send + Sync {
  async fn insert_event(&self, event: &EventPayload) -> Result<()>;
}

/// HTTP client for the Google Calendar API, authenticated with a
/// service-account key file.
pub struct CalendarClient {
  http: reqwest::Client,
  calendar_id: String,
  key: ServiceAccountKey,
}

impl CalendarClient {
  pub fn from_key_file(http: reqwest::Client, key_path: &Path, calendar_id: &str) -> Result<Self> {
    let contents = fs::read_to_string(key_path)
      .with_context(|| format!("failed to read service account key {}", key_path.display()))?;
    let key: ServiceAccountKey =
      serde_json::from_str(&contents).context("failed to parse service account JSON")?;

    Ok(Self { http, calendar_id: calendar_id.to_string(), key })
  }

  async fn access_token(&self) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
      iss: self.key.client_email.clone(),
      scope: SCOPES.to_string(),
      aud: self.key.token_uri.clone(),
      exp: now + 3600,
      iat: now,
    };

    let header = Header::new(Algorithm::RS256);
    let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
    let jwt = encode(&header, &claims, &encoding_key).context("failed to encode JWT")?;

    let response = self
      .http
      .post(&self.key.token_uri)
      .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &jwt)])
      .send()
      .await
      .context("failed to request access token")?
      .error_for_status()?;

    let token: TokenResponse =
      response.json().await.context("failed to parse token response")?;
    Ok(token.access_token)
  }
}

#[async_trait]
impl CalendarApi for CalendarClient {
  async fn insert_event(&self, event: &EventPayload) -> Result<()> {
    let token = self.access_token().await?;
    let url = format!("{}/{}/events", EVENTS_API_BASE, self.calendar_id);

    self
      .http
      .post(&url)
      .bearer_auth(token)
      .json(event)
      .send()
      .await
      .context("failed to insert calendar event")?
      .error_for_status()?;

    Ok(())
  }
}

/// Outcome of one row in a sync batch.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
  Synced,
  Failed(String),
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
  pub id: String,
  pub event: String,
  pub status: SyncStatus,
}

/// Embed URL for viewing the configured calendar in a browser.
pub fn embed_url(calendar_id: &str) -> String {
  format!("https://calendar.google.com/calendar/embed?src={calendar_id}&ctz={TIMEZONE}")
}

/// Normalize a free-text time value ("5 pm") into `HH:MM:SS` via the model.
async fn normalize_time(llm: &dyn LlmClient, time: &str) -> Result<String> {
  if time.trim().is_empty() {
    anyhow::bail!("missing time value");
  }
  let prompt = format!(
    "Convert the time '{time}' to ISO 8601 format. Respond with only the time in HH:MM:SS format."
  );
  let reply = llm.generate(&prompt).await?.replace('\n', "");
  if reply.trim().is_empty() {
    anyhow::bail!("model returned an empty time for '{time}'");
  }
  Ok(reply.trim().to_string())
}

fn formatted_date(record: &EventRecord) -> Result<String> {
  let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
    .with_context(|| format!("event date {:?} is not an ISO date", record.date))?;
  Ok(date.format("%Y-%m-%d").to_string())
}

/// Build the insert payload for one row, normalizing its times.
async fn build_payload(llm: &dyn LlmClient, record: &EventRecord) -> Result<EventPayload> {
  let date = formatted_date(record)?;
  let time_start = normalize_time(llm, &record.time_start).await?;
  let time_end = normalize_time(llm, &record.time_end).await?;

  Ok(EventPayload {
    summary: record.name.clone(),
    description: record.notes.clone(),
    start: EventDateTime {
      date_time: format!("{date}T{time_start}"),
      time_zone: TIMEZONE.to_string(),
    },
    end: EventDateTime {
      date_time: format!("{date}T{time_end}"),
      time_zone: TIMEZONE.to_string(),
    },
  })
}

/// Push `records` to the calendar one by one. A failing row is recorded and
/// skipped; later rows still sync. The caller gets the full outcome list
/// rather than having to scrape a log.
pub async fn sync_events(
  llm: &dyn LlmClient,
  calendar: &dyn CalendarApi,
  records: &[EventRecord],
) -> Vec<SyncOutcome> {
  let mut outcomes = Vec::with_capacity(records.len());

  for record in records {
    let status = match build_payload(llm, record).await {
      Ok(payload) => match calendar.insert_event(&payload).await {
        Ok(()) => SyncStatus::Synced,
        Err(e) => SyncStatus::Failed(format!("insert failed: {e}")),
      },
      Err(e) => SyncStatus::Failed(e.to_string()),
    };

    if let SyncStatus::Failed(reason) = &status {
      tracing::warn!("skipping event {} ({}): {reason}", record.id, record.name);
    }

    outcomes.push(SyncOutcome { id: record.id.clone(), event: record.name.clone(), status });
  }

  outcomes
}
