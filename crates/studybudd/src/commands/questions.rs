use crate::cards;
use crate::config::Credentials;
use crate::llm::GeminiClient;
use anyhow::Result;
use colored::*;

/// Generate practice questions for a topic, optionally with solutions.
pub async fn handle(credentials: &Credentials, topic: &str, solutions: bool) -> Result<()> {
  if topic.trim().is_empty() {
    anyhow::bail!("please provide a topic or prompt");
  }

  let llm = GeminiClient::new(reqwest::Client::new(), credentials.gemini_api_key()?);
  let questions = cards::generate_questions(&llm, topic).await?;

  println!("{}", "Practice Questions".bold());
  println!("{questions}");

  if solutions {
    let answers = cards::generate_solutions(&llm, &questions).await?;
    println!("\n{}", "Suggested Solutions".bold());
    println!("{answers}");
  }

  Ok(())
}
