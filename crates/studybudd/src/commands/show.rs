use crate::model::EventRecord;
use crate::sheet::PlanSheet;
use anyhow::Result;
use colored::*;

/// Print the study plan as an aligned table.
pub fn handle(sheet: &PlanSheet) -> Result<()> {
  let records = sheet.read()?;

  if records.is_empty() {
    println!("{} No study plan data available", "!".yellow());
    return Ok(());
  }

  println!("{}", "Your Study Plan".bold());
  println!(
    "{:<6} {:<28} {:<12} {:<12} {:<12} {:<8} {}",
    "ID", "Event", "Date", "Time Start", "Time End", "Priority", "Notes"
  );
  for record in &records {
    println!("{}", format_row(record));
  }

  Ok(())
}

// Pad the id before coloring it: the ANSI escape bytes would otherwise count
// toward the column width and throw off the alignment.
fn format_row(record: &EventRecord) -> String {
  format!(
    "{} {:<28} {:<12} {:<12} {:<12} {:<8} {}",
    format!("{:<6}", record.id).cyan(),
    record.name,
    record.date,
    record.time_start,
    record.time_end,
    record.priority.to_string(),
    record.notes
  )
}
