//! Natural-language to structured-event extraction.
//!
//! One prompt asks the model for labeled lines; the reply is parsed by
//! splitting each line on its first colon. A second prompt anchored to
//! today's date resolves relative phrases like "tomorrow" into an absolute
//! `YYYY-MM-DD` date.

use crate::llm::LlmClient;
use crate::model::{Priority, DEFAULT_NOTES};
use anyhow::Result;
use chrono::Local;
use regex::Regex;

/// Structured fields pulled out of a free-text activity description,
/// before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
  pub event_name: String,
  pub date: String,
  pub time_start: String,
  pub time_end: String,
  pub priority: Priority,
  pub notes: String,
}

impl Default for EventDetails {
  fn default() -> Self {
    Self {
      event_name: String::new(),
      date: String::new(),
      time_start: String::new(),
      time_end: String::new(),
      priority: Priority::default(),
      notes: DEFAULT_NOTES.to_string(),
    }
  }
}

fn extraction_prompt(user_input: &str) -> String {
  format!(
    r#"Summarize this study plan in plain text (no Markdown, no formatting). Provide details in this format:

Event Name: [event]
Date: [date]
Time start: [time_start]
Time end: [time_end]
Priority: [priority]
Notes: [notes]

If only the time start is provided, then set the time end to one hour after the time start.
Input: "{user_input}"
"#
  )
}

/// Parse the model's labeled-line reply into event fields.
///
/// Lines without a colon are skipped; keys are lowercased with spaces turned
/// into underscores; unknown keys are ignored. Absent fields keep their
/// defaults (`Medium` priority, placeholder notes), and a priority value
/// outside the closed enum also falls back to the default rather than being
/// stored verbatim.
pub fn parse_event_details(reply: &str) -> EventDetails {
  let mut details = EventDetails::default();

  for line in reply.lines() {
    let Some((key, value)) = line.split_once(':') else {
      continue;
    };
    let key = key.trim().to_lowercase().replace(' ', "_");
    let value = value.trim();
    if value.is_empty() {
      continue;
    }

    match key.as_str() {
      "event_name" => details.event_name = value.to_string(),
      "date" => details.date = value.to_string(),
      "time_start" => details.time_start = value.to_string(),
      "time_end" => details.time_end = value.to_string(),
      "priority" => details.priority = Priority::parse_or_default(value),
      "notes" => details.notes = value.to_string(),
      _ => {}
    }
  }

  details
}

/// Pull the first `YYYY-MM-DD` pattern out of a free-text reply.
pub fn first_iso_date(reply: &str) -> Option<String> {
  let pattern = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
  pattern.find(reply).map(|m| m.as_str().to_string())
}

/// Resolve a relative date phrase ("tomorrow", "next Friday") into an
/// absolute date by asking the model, anchored to today.
///
/// Failure to resolve is not fatal: the original phrase stays in place and a
/// warning goes to the log, matching the best-effort contract of the
/// extraction pipeline.
pub async fn resolve_date(llm: &dyn LlmClient, details: &mut EventDetails) {
  if details.date.is_empty() {
    return;
  }

  let today = Local::now().format("%Y-%m-%d").to_string();
  let prompt = format!(
    "Today is {today}. What is the exact date for '{}'? Respond with only the date in YYYY-MM-DD format.",
    details.date
  );

  match llm.generate(&prompt).await {
    Ok(reply) => match first_iso_date(&reply) {
      Some(date) => details.date = date,
      None => tracing::warn!("date reply did not contain a valid date: {reply:?}"),
    },
    Err(e) => tracing::warn!("failed to resolve date '{}': {e}", details.date),
  }
}

/// Full extraction pipeline: prompt, parse, resolve the date.
pub async fn extract_study_details(llm: &dyn LlmClient, user_input: &str) -> Result<EventDetails> {
  let reply = llm.generate(&extraction_prompt(user_input)).await?;
  let mut details = parse_event_details(&reply);
  resolve_date(llm, &mut details).await;
  Ok(details)
}
