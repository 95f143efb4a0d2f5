use crate::calendar::{self, CalendarClient, SyncStatus};
use crate::config::Credentials;
use crate::llm::GeminiClient;
use crate::sheet::PlanSheet;
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Push events to Google Calendar. With no ids, the whole plan syncs.
/// Failures are per-row; the batch always runs to the end.
pub async fn handle(
  credentials: &Credentials,
  sheet: &PlanSheet,
  ids: &[String],
  key_file: &Path,
) -> Result<()> {
  let records = sheet.read()?;
  let selected: Vec<_> = if ids.is_empty() {
    records
  } else {
    records.into_iter().filter(|r| ids.contains(&r.id)).collect()
  };

  if selected.is_empty() {
    println!("{} No events selected for syncing", "!".yellow());
    return Ok(());
  }

  let http = reqwest::Client::new();
  let llm = GeminiClient::new(http.clone(), credentials.gemini_api_key()?);
  let client = CalendarClient::from_key_file(http, key_file, credentials.calendar_id()?)?;

  let outcomes = calendar::sync_events(&llm, &client, &selected).await;

  let mut synced = 0;
  for outcome in &outcomes {
    match &outcome.status {
      SyncStatus::Synced => {
        synced += 1;
        println!("{} {} {}", "✓".green(), outcome.id.cyan(), outcome.event);
      }
      SyncStatus::Failed(reason) => {
        println!("{} {} {} - {}", "✗".red(), outcome.id.cyan(), outcome.event, reason);
      }
    }
  }

  println!("Synced {synced} of {} events", outcomes.len());
  Ok(())
}
