//! Flashcard and practice-question generation.
//!
//! The model is asked for a fixed layout and the parser enforces it: a
//! flashcard block missing either label is classified invalid and excluded
//! from the rendered set.

use crate::llm::LlmClient;
use anyhow::Result;
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Flashcard {
  pub question: String,
  pub answer: String,
}

/// Parsed flashcards plus the blocks that failed to parse.
#[derive(Debug, Default)]
pub struct FlashcardSet {
  pub cards: Vec<Flashcard>,
  pub invalid_blocks: usize,
}

fn flashcard_prompt(topic: &str) -> String {
  format!(
    r#"Generate 10 flashcards based on the following topic or content:
"{topic}"
Provide the flashcards in the format:
Question: [question]
Answer: [answer]
"#
  )
}

/// Split the reply on blank lines and keep only blocks carrying both a
/// `Question:` and an `Answer:` label.
pub fn parse_flashcards(reply: &str) -> FlashcardSet {
  let question_re = Regex::new(r"Question:\s*(.*)").unwrap();
  let answer_re = Regex::new(r"Answer:\s*(.*)").unwrap();

  let mut set = FlashcardSet::default();
  for block in reply.split("\n\n") {
    if block.trim().is_empty() {
      continue;
    }
    if !(block.contains("Question:") && block.contains("Answer:")) {
      set.invalid_blocks += 1;
      continue;
    }

    let question = question_re.captures(block).map(|c| c[1].trim().to_string());
    let answer = answer_re.captures(block).map(|c| c[1].trim().to_string());
    match (question, answer) {
      (Some(question), Some(answer)) => set.cards.push(Flashcard { question, answer }),
      _ => set.invalid_blocks += 1,
    }
  }

  set
}

pub async fn generate_flashcards(llm: &dyn LlmClient, topic: &str) -> Result<FlashcardSet> {
  let reply = llm.generate(&flashcard_prompt(topic)).await?;
  Ok(parse_flashcards(&reply))
}

/// Five numbered practice questions on a topic, returned as the model's
/// plain-text list.
pub async fn generate_questions(llm: &dyn LlmClient, topic: &str) -> Result<String> {
  let prompt = format!(
    r#"Generate 5 practice questions based on the following topic or prompt:
"{topic}"
Provide the questions in plain text format, numbered from 1 to 5.
"#
  );
  llm.generate(&prompt).await
}

/// Detailed solutions for a previously generated question set.
pub async fn generate_solutions(llm: &dyn LlmClient, questions: &str) -> Result<String> {
  let prompt =
    format!("Provide detailed solutions for the following practice questions:\n{questions}");
  llm.generate(&prompt).await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_well_formed_blocks() {
    let reply = "Question: What is 2 + 2?\nAnswer: 4\n\n\
                 Question: Capital of France?\nAnswer: Paris";
    let set = parse_flashcards(reply);

    assert_eq!(set.cards.len(), 2);
    assert_eq!(set.invalid_blocks, 0);
    assert_eq!(set.cards[0].question, "What is 2 + 2?");
    assert_eq!(set.cards[1].answer, "Paris");
  }

  #[test]
  fn block_missing_answer_is_excluded() {
    let reply = "Question: Orphaned question with no answer\n\n\
                 Question: Complete card?\nAnswer: Yes";
    let set = parse_flashcards(reply);

    assert_eq!(set.cards.len(), 1);
    assert_eq!(set.invalid_blocks, 1);
    assert_eq!(set.cards[0].answer, "Yes");
  }

  #[test]
  fn block_missing_question_is_excluded() {
    let set = parse_flashcards("Answer: an answer looking for a question");
    assert!(set.cards.is_empty());
    assert_eq!(set.invalid_blocks, 1);
  }

  #[test]
  fn preamble_text_counts_as_invalid_not_as_card() {
    let reply = "Here are your flashcards!\n\nQuestion: Q1\nAnswer: A1";
    let set = parse_flashcards(reply);

    assert_eq!(set.cards.len(), 1);
    assert_eq!(set.invalid_blocks, 1);
  }
}
