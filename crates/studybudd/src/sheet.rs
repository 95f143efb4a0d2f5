//! Study plan workbook I/O.
//!
//! The plan is one sheet of an `.xlsx` workbook, read and written wholesale.
//! Appending scans backward from the bottom for the last non-empty id cell so
//! trailing blank rows left by manual edits don't break id generation.

use crate::error::StudybuddError;
use crate::extract::EventDetails;
use crate::model::{EventRecord, Priority};
use anyhow::Result;
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKBOOK: &str = "StudyPlanner.xlsx";
pub const SHEET_NAME: &str = "Study_Plan";

const HEADERS: [&str; 7] = ["ID", "Event", "Date", "Time Start", "Time End", "Priority", "Notes"];

/// Handle on the study plan workbook at a fixed path.
pub struct PlanSheet {
  path: PathBuf,
}

impl PlanSheet {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Load every event row. A missing workbook reads as an empty plan.
  pub fn read(&self) -> Result<Vec<EventRecord>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
    let range = workbook
      .worksheet_range(SHEET_NAME)
      .map_err(|_| StudybuddError::MissingSheet(SHEET_NAME.to_string()))?;

    let mut records = Vec::new();
    for row in range.rows().skip(1) {
      let id = cell_string(row, 0);
      if id.is_empty() {
        // Trailing blank row from a manual edit; nothing to load.
        continue;
      }
      records.push(EventRecord {
        id,
        name: cell_string(row, 1),
        date: cell_string(row, 2),
        time_start: cell_string(row, 3),
        time_end: cell_string(row, 4),
        priority: Priority::parse_or_default(&cell_string(row, 5)),
        notes: cell_string(row, 6),
      });
    }

    Ok(records)
  }

  /// Append a new event, assigning the next sequential id. Returns the
  /// stored record.
  pub fn append(&self, details: &EventDetails) -> Result<EventRecord> {
    let mut records = self.read()?;
    let id = next_id(records.last().map(|r| r.id.as_str()));

    let record = EventRecord {
      id,
      name: details.event_name.clone(),
      date: details.date.clone(),
      time_start: details.time_start.clone(),
      time_end: details.time_end.clone(),
      priority: details.priority,
      notes: details.notes.clone(),
    };

    records.push(record.clone());
    self.save(&records)?;
    Ok(record)
  }

  /// Overwrite the whole sheet with `records`.
  pub fn save(&self, records: &[EventRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
      worksheet.write(0, col as u16, *header)?;
    }

    for (i, record) in records.iter().enumerate() {
      let row = (i + 1) as u32;
      worksheet.write(row, 0, record.id.as_str())?;
      worksheet.write(row, 1, record.name.as_str())?;
      worksheet.write(row, 2, record.date.as_str())?;
      worksheet.write(row, 3, record.time_start.as_str())?;
      worksheet.write(row, 4, record.time_end.as_str())?;
      worksheet.write(row, 5, record.priority.to_string())?;
      worksheet.write(row, 6, record.notes.as_str())?;
    }

    workbook.save(&self.path)?;
    Ok(())
  }
}

fn cell_string(row: &[Data], col: usize) -> String {
  row
    .get(col)
    .and_then(|cell| {
      if cell.is_empty() {
        None
      } else {
        cell.as_string()
      }
    })
    .unwrap_or_default()
    .trim()
    .to_string()
}

/// Next sequential id given the last stored one. A missing or non-conforming
/// last id restarts the sequence at `ID-1`.
pub fn next_id(last: Option<&str>) -> String {
  let n = last
    .and_then(|id| id.strip_prefix("ID-"))
    .and_then(|suffix| suffix.parse::<u64>().ok())
    .map(|n| n + 1)
    .unwrap_or(1);
  format!("ID-{n}")
}
