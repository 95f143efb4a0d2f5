use crate::calendar::embed_url;
use crate::config::Credentials;
use anyhow::Result;
use colored::*;

/// Print the embed URL for viewing the configured calendar in a browser.
pub fn handle(credentials: &Credentials) -> Result<()> {
  let url = embed_url(credentials.calendar_id()?);
  println!("{}", "Google Calendar View".bold());
  println!("{url}");
  Ok(())
}
