//! # Prompt Assembly
//!
//! This module turns extracted document text, persona strings, few-shot
//! examples and the user's question into the single block of text sent to
//! the completion service. Assembly is deterministic string concatenation;
//! the templates live in [`core`].

pub mod core;

use serde::{Deserialize, Serialize};

/// The named prompt shapes the assembler supports.
///
/// Persona wrapping is not a strategy of its own: any strategy's output is
/// wrapped when a persona is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStrategy {
    /// Ground the answer in the extracted document text.
    #[default]
    Rag,
    /// Concatenate document text and question with a fixed separator.
    DirectQa,
    /// Prefix the question with ordered examples.
    FewShot,
}

/// The ordered fragments a prompt is assembled from, plus the assembled
/// result.
///
/// A strategy defines which fields participate; within a strategy, every
/// populated field appears in `final_text` as a contiguous substring, in a
/// fixed order.
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    pub persona: Option<String>,
    pub context_text: Option<String>,
    pub examples: Vec<String>,
    pub user_query: String,
    final_text: String,
}

impl PromptRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            ..Self::default()
        }
    }

    pub fn persona(mut self, persona: Option<String>) -> Self {
        self.persona = persona;
        self
    }

    pub fn context_text(mut self, context_text: Option<String>) -> Self {
        self.context_text = context_text;
        self
    }

    pub fn examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }

    /// Assembles `final_text` for the given strategy.
    ///
    /// The inner body is built first; the persona, when present, wraps it
    /// last.
    pub fn assemble(mut self, strategy: PromptStrategy) -> Self {
        let context = self.context_text.as_deref().unwrap_or_default();
        let inner = match strategy {
            PromptStrategy::Rag => core::rag_prompt(&self.user_query, context),
            PromptStrategy::DirectQa => core::direct_qa_prompt(&self.user_query, context),
            PromptStrategy::FewShot => core::few_shot_prompt(&self.user_query, &self.examples),
        };
        self.final_text = match self.persona.as_deref() {
            Some(persona) => core::wrap_with_persona(persona, &inner),
            None => inner,
        };
        self
    }

    /// The assembled prompt text. Empty until [`assemble`](Self::assemble)
    /// has run.
    pub fn final_text(&self) -> &str {
        &self.final_text
    }
}
