//! Request assembly for question and answer generation.
//!
//! A [`GenerationRequest`] is the full, model-ready payload: system prompt,
//! user prompt and model name. Builders here combine the stored prompt
//! configuration with the excerpt being worked on, so orchestrators never
//! do string assembly themselves.

use common::storage::types::{chunk::Chunk, question::Question, system_settings::SystemSettings};

/// One fully assembled model call, independent of any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
}

/// Builds the request that asks the model for questions about one chunk.
pub fn question_request(settings: &SystemSettings, title: &str, chunk: &Chunk) -> GenerationRequest {
    GenerationRequest {
        system_prompt: settings.question_system_prompt.clone(),
        user_prompt: format!(
            "Document: {title}\n\nExcerpt:\n{content}",
            content = chunk.content
        ),
        model: settings.question_model.clone(),
    }
}

/// Builds the request that asks the model to answer `question` using only
/// the chunk it was generated from.
pub fn answer_request(
    settings: &SystemSettings,
    question: &Question,
    chunk: &Chunk,
) -> GenerationRequest {
    GenerationRequest {
        system_prompt: settings.answer_system_prompt.clone(),
        user_prompt: format!(
            "Excerpt:\n{content}\n\nQuestion: {question}",
            content = chunk.content,
            question = question.content
        ),
        model: settings.answer_model.clone(),
    }
}
