use crate::cards;
use crate::config::Credentials;
use crate::llm::GeminiClient;
use anyhow::Result;
use colored::*;

/// Generate flashcards for a topic and print the valid ones.
pub async fn handle(credentials: &Credentials, topic: &str) -> Result<()> {
  if topic.trim().is_empty() {
    anyhow::bail!("please provide a topic or content for the flashcards");
  }

  let llm = GeminiClient::new(reqwest::Client::new(), credentials.gemini_api_key()?);
  let set = cards::generate_flashcards(&llm, topic).await?;

  if set.cards.is_empty() {
    anyhow::bail!("failed to parse any flashcards; try a topic better suited to flashcards");
  }

  println!("{}", "Flashcards".bold());
  for (i, card) in set.cards.iter().enumerate() {
    println!("{} {}", format!("{}.", i + 1).cyan(), card.question);
    println!("   {} {}", "Answer:".bold(), card.answer);
  }

  if set.invalid_blocks > 0 {
    tracing::warn!("{} malformed flashcard block(s) were excluded", set.invalid_blocks);
  }

  Ok(())
}
