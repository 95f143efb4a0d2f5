use crate::error::StudybuddError;
use crate::model::Priority;
use crate::sheet::PlanSheet;
use anyhow::Result;
use colored::*;
use std::str::FromStr;

/// Field updates for one event; `None` leaves the stored value alone.
#[derive(Debug, Default)]
pub struct Changes {
  pub name: Option<String>,
  pub date: Option<String>,
  pub time_start: Option<String>,
  pub time_end: Option<String>,
  pub priority: Option<String>,
  pub notes: Option<String>,
}

/// Apply `changes` to the event with `id` and persist the whole sheet.
pub fn handle(sheet: &PlanSheet, id: &str, changes: Changes) -> Result<()> {
  let mut records = sheet.read()?;
  let record = records
    .iter_mut()
    .find(|r| r.id == id)
    .ok_or_else(|| StudybuddError::UnknownEventId(id.to_string()))?;

  if let Some(name) = changes.name {
    record.name = name;
  }
  if let Some(date) = changes.date {
    record.date = date;
  }
  if let Some(time_start) = changes.time_start {
    record.time_start = time_start;
  }
  if let Some(time_end) = changes.time_end {
    record.time_end = time_end;
  }
  if let Some(priority) = changes.priority {
    record.priority = Priority::from_str(&priority)
      .map_err(|_| anyhow::anyhow!("priority must be Low, Medium, or High, got {priority:?}"))?;
  }
  if let Some(notes) = changes.notes {
    record.notes = notes;
  }

  sheet.save(&records)?;
  println!("{} Changes saved for {}", "✓".green(), id.cyan());
  Ok(())
}
