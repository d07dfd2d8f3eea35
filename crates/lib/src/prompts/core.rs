//! # Core Prompt Templates
//!
//! The building blocks for every prompt shape the assembler supports. Each
//! builder is a pure function: the same inputs always produce the same
//! `final_text`, with no truncation and no token-budget awareness. If the
//! assembled prompt exceeds the completion service's limit, the service is
//! the one that reports it.

/// The default persona used for document Q&A when the caller does not
/// provide one.
pub const DEFAULT_PERSONA: &str = "You are a helpful assistant.";

/// The persona used when generating documentation for pasted code.
pub const CODE_DOC_PERSONA: &str =
    "You are a technical writer who provides concise and clear explanations.";

/// The separator inserted between a persona description and the wrapped
/// prompt body.
pub const PERSONA_SEPARATOR: &str = "\n\n";

/// The separator inserted between consecutive few-shot examples.
pub const EXAMPLE_SEPARATOR: &str = "\n\n";

/// Builds a direct question-over-documents prompt.
///
/// The `" \n\n---\n\n "` separator, flanking spaces included, is kept
/// byte-for-byte for compatibility with answers produced by earlier
/// versions of this pipeline.
pub fn direct_qa_prompt(query: &str, document_text: &str) -> String {
    format!("Here's the content from the documents: {document_text} \n\n---\n\n {query}")
}

/// Builds a retrieval-grounded prompt over extracted document text.
pub fn rag_prompt(query: &str, document_text: &str) -> String {
    format!(
        "Based on the document text below, answer the following question:\n\nDocument Text:\n{document_text}\n\nQuestion: {query}"
    )
}

/// Builds a few-shot prompt from ordered examples and the user's code.
pub fn few_shot_prompt(user_query: &str, examples: &[String]) -> String {
    let example_text = examples.join(EXAMPLE_SEPARATOR);
    format!(
        "Here are some examples of code documentation:\n\n{example_text}\n\nNow, for the following code:\n{user_query}"
    )
}

/// Wraps any assembled prompt body with a persona description.
///
/// Persona wrapping composes with every other shape; it is applied last,
/// around the inner text.
pub fn wrap_with_persona(persona: &str, inner: &str) -> String {
    format!("{persona}{PERSONA_SEPARATOR}{inner}")
}
