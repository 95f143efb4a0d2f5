//! Thin request/response wrapper around the Gemini `generateContent` endpoint.
//!
//! Every non-trivial decision in the planner (field extraction, date
//! resolution, place classification) goes through [`LlmClient::generate`]
//! with a templated prompt and gets back raw text; the callers own the
//! parsing of that text.

use crate::error::StudybuddError;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

// Generation parameters used for every call, matching the planner's needs:
// short, low-temperature answers.
const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 1.0;
const MAX_OUTPUT_TOKENS: u32 = 256;

/// Seam for the LLM so pipeline logic is testable with scripted replies.
#[async_trait]
pub trait LlmClient: Send + Sync {
  /// Send one prompt, return the model's raw text reply.
  async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
  contents: Content,
  generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
  role: &'static str,
  parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
  text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
  temperature: f32,
  #[serde(rename = "topP")]
  top_p: f32,
  #[serde(rename = "maxOutputTokens")]
  max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<Part>,
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
  http: reqwest::Client,
  api_key: String,
  model: String,
  base_url: String,
}

impl GeminiClient {
  pub fn new(http: reqwest::Client, api_key: &str) -> Self {
    Self {
      http,
      api_key: api_key.to_string(),
      model: DEFAULT_MODEL.to_string(),
      base_url: GEMINI_API_BASE_URL.to_string(),
    }
  }

  pub fn with_model(mut self, model: &str) -> Self {
    self.model = model.to_string();
    self
  }

  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = base_url.to_string();
    self
  }
}

#[async_trait]
impl LlmClient for GeminiClient {
  async fn generate(&self, prompt: &str) -> Result<String> {
    let url = format!("{}/{}:generateContent?key={}", self.base_url, self.model, self.api_key);

    let body = GenerateContentRequest {
      contents: Content { role: "USER", parts: vec![Part { text: prompt.to_string() }] },
      generation_config: GenerationConfig {
        temperature: TEMPERATURE,
        top_p: TOP_P,
        max_output_tokens: MAX_OUTPUT_TOKENS,
      },
    };

    tracing::debug!("LLM request ({} chars)", prompt.len());
    let response = self.http.post(&url).json(&body).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(StudybuddError::LlmRequestFailed(status.as_u16()).into());
    }

    let parsed: GenerateContentResponse = response.json().await?;
    let text = parsed
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content.parts.into_iter().next())
      .map(|p| p.text)
      .ok_or(StudybuddError::EmptyLlmResponse)?;

    Ok(text)
  }
}
