//! Answer composer: retrieve, ground, generate
//!
//! An explicit linear pipeline with typed intermediate results: top-k
//! retrieval from the semantic index, prompt composition from the retrieved
//! context, then one generation call. No retries; failures propagate.

use serde::Serialize;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::Generator;
use crate::index::{ScoredPassage, SemanticIndex};

/// Passages retrieved to ground each answer
pub const RETRIEVAL_K: usize = 3;

/// Build the grounded prompt handed to the generation service
pub fn compose_prompt(context: &str, question: &str) -> String {
  format!(
    "You are a helpful analytics assistant. Use the context below to answer \
     the user's question as clearly and concisely as possible.\n\n\
     Context:\n{context}\n\nQuestion:\n{question}\n\nAnswer:"
  )
}

/// A generated answer plus the passages that grounded it, retrieval order
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
  pub question: String,
  pub answer: String,
  pub sources: Vec<ScoredPassage>,
}

/// Question answering over an indexed analytics snapshot
pub struct AnswerEngine {
  index: Option<Arc<SemanticIndex>>,
  generator: Arc<dyn Generator>,
}

impl AnswerEngine {
  /// An engine with no index yet; `answer` fails until one is attached
  pub fn new(generator: Arc<dyn Generator>) -> Self {
    Self { index: None, generator }
  }

  pub fn with_index(index: Arc<SemanticIndex>, generator: Arc<dyn Generator>) -> Self {
    Self { index: Some(index), generator }
  }

  /// Attach the index once build-or-load has finished
  pub fn attach_index(&mut self, index: Arc<SemanticIndex>) {
    self.index = Some(index);
  }

  pub fn is_ready(&self) -> bool {
    self.index.is_some()
  }

  /// Retrieve top-k passages, compose a grounded prompt, generate an answer
  pub async fn answer(&self, question: &str) -> Result<AnswerResult> {
    let index = self.index.as_ref().ok_or(Error::NotInitialized)?;

    let sources = index.query(question, RETRIEVAL_K).await?;
    let context: Vec<&str> = sources.iter().map(|s| s.passage.content.as_str()).collect();
    let prompt = compose_prompt(&context.join("\n\n"), question);
    let answer = self.generator.generate(&prompt).await?;

    Ok(AnswerResult {
      question: question.to_string(),
      answer: answer.trim().to_string(),
      sources,
    })
  }
}
