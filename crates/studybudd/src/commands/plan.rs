use crate::config::Credentials;
use crate::extract;
use crate::llm::GeminiClient;
use crate::sheet::PlanSheet;
use anyhow::Result;
use colored::*;

/// Extract structured details from a free-text activity description and
/// append them to the study plan.
pub async fn handle(credentials: &Credentials, sheet: &PlanSheet, description: &str) -> Result<()> {
  if description.trim().is_empty() {
    anyhow::bail!("please provide a description of your study activity");
  }

  let llm = GeminiClient::new(reqwest::Client::new(), credentials.gemini_api_key()?);
  let details = extract::extract_study_details(&llm, description).await?;
  let record = sheet.append(&details)?;

  println!("{} Study activity scheduled as {}", "✓".green(), record.id.cyan());
  println!("  Event:      {}", record.name);
  println!("  Date:       {}", record.date);
  println!("  Time:       {} - {}", record.time_start, record.time_end);
  println!("  Priority:   {}", record.priority);
  println!("  Notes:      {}", record.notes);

  Ok(())
}
