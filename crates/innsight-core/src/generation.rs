//! Natural-language generation collaborators
//!
//! Generation is an external network dependency with unbounded latency, so
//! the HTTP client carries a request timeout. Failures propagate to the
//! caller; nothing here retries or caches partial answers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Bound on a single generation round trip
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 512;

/// Produce an answer from an already-composed grounded prompt
#[async_trait]
pub trait Generator: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  temperature: f32,
  max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
  content: String,
}

/// Chat-completions client for any OpenAI-compatible generation endpoint
pub struct HttpGenerator {
  endpoint: String,
  model: String,
  api_token: Option<String>,
  client: reqwest::Client,
}

impl HttpGenerator {
  pub fn new(endpoint: &str, model: &str, api_token: Option<String>) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(GENERATION_TIMEOUT)
      .build()
      .map_err(|e| Error::Generation(e.to_string()))?;

    Ok(Self { endpoint: endpoint.to_string(), model: model.to_string(), api_token, client })
  }
}

#[async_trait]
impl Generator for HttpGenerator {
  async fn generate(&self, prompt: &str) -> Result<String> {
    let request = ChatRequest {
      model: &self.model,
      messages: vec![ChatMessage { role: "user", content: prompt }],
      temperature: TEMPERATURE,
      max_tokens: MAX_TOKENS,
    };

    let mut builder = self.client.post(&self.endpoint).json(&request);
    if let Some(token) = &self.api_token {
      builder = builder.bearer_auth(token);
    }

    let response = builder.send().await.map_err(|e| Error::Generation(e.to_string()))?;
    if !response.status().is_success() {
      return Err(Error::Generation(format!(
        "generation service returned {}",
        response.status()
      )));
    }

    let payload: ChatResponse =
      response.json().await.map_err(|e| Error::Generation(e.to_string()))?;
    payload
      .choices
      .into_iter()
      .next()
      .map(|choice| choice.message.content)
      .ok_or_else(|| Error::Generation("generation service returned no choices".to_string()))
  }
}

/// Canned generator for tests and offline runs
pub struct MockGenerator {
  pub response: String,
  pub fail: bool,
}

impl MockGenerator {
  pub fn answering(response: &str) -> Self {
    Self { response: response.to_string(), fail: false }
  }

  pub fn failing() -> Self {
    Self { response: String::new(), fail: true }
  }
}

#[async_trait]
impl Generator for MockGenerator {
  async fn generate(&self, _prompt: &str) -> Result<String> {
    if self.fail {
      return Err(Error::Generation("mock generation failure".to_string()));
    }
    Ok(self.response.clone())
  }
}
