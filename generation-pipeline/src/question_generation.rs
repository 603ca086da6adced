//! Question generation over the chunks of a stored text.
//!
//! The orchestrator walks the chunk sequence, calls the model once per
//! chunk and persists each returned question. A failing chunk never aborts
//! the run: its error is recorded per chunk index and the walk continues.
//! Only when every targeted chunk fails does the run itself fail.

use std::{collections::HashMap, sync::Arc};

use common::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{
            chunk::Chunk, question::Question, source_text::SourceText,
            system_settings::SystemSettings, StoredObject,
        },
    },
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{parser::extract_string_array, prompts::question_request, services::GenerationService};

/// Result of one generation run: the persisted questions plus the error
/// message of every chunk that failed, keyed by chunk index.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    pub questions: Vec<Question>,
    pub chunk_errors: HashMap<usize, String>,
}

pub struct QuestionGenerator {
    db: Arc<SurrealDbClient>,
    services: Arc<dyn GenerationService>,
}

impl QuestionGenerator {
    pub fn new(db: Arc<SurrealDbClient>, services: Arc<dyn GenerationService>) -> Self {
        Self { db, services }
    }

    /// Generates questions for one chunk of `text_id`, or for all of its
    /// chunks when `chunk_index` is `None`.
    ///
    /// Cancellation is honoured between chunks: questions already
    /// persisted stay persisted and the outcome reflects the work done so
    /// far. Storage failures are fatal, model failures are not.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn generate(
        &self,
        text_id: &str,
        chunk_index: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome, AppError> {
        let text = self
            .db
            .get_item::<SourceText>(text_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("source text {text_id} not found")))?;

        let chunks = Chunk::list_by_text_ordered(text_id, &self.db).await?;
        if chunks.is_empty() {
            return Err(AppError::Validation(format!(
                "source text {text_id} has no chunks to generate from"
            )));
        }

        let targets: Vec<(usize, &Chunk)> = match chunk_index {
            Some(index) => {
                let chunk = chunks.get(index).ok_or_else(|| {
                    AppError::OutOfRange(format!(
                        "chunk index {index} is out of range, text {text_id} has {} chunks",
                        chunks.len()
                    ))
                })?;
                vec![(index, chunk)]
            }
            None => chunks.iter().enumerate().collect(),
        };

        let settings = SystemSettings::get_current(&self.db).await?;

        let mut outcome = GenerationOutcome::default();
        for (index, chunk) in targets {
            if cancel.is_cancelled() {
                info!(text_id, resume_at = index, "generation cancelled between chunks");
                break;
            }
            match self.generate_for_chunk(&text, index, chunk, &settings).await {
                Ok(mut questions) => outcome.questions.append(&mut questions),
                Err(ChunkFailure::Model(error)) => {
                    warn!(text_id, chunk_index = index, %error, "chunk failed");
                    outcome.chunk_errors.insert(index, error.to_string());
                }
                Err(ChunkFailure::Fatal(error)) => return Err(error),
            }
        }

        if outcome.questions.is_empty() && !outcome.chunk_errors.is_empty() {
            let mut failures: Vec<_> = outcome.chunk_errors.iter().collect();
            failures.sort_by_key(|(index, _)| **index);
            let folded = failures
                .iter()
                .map(|(index, message)| format!("chunk {index}: {message}"))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::NoQuestionsGenerated(folded));
        }

        info!(
            text_id,
            questions = outcome.questions.len(),
            failed_chunks = outcome.chunk_errors.len(),
            "question generation finished"
        );
        Ok(outcome)
    }

    async fn generate_for_chunk(
        &self,
        text: &SourceText,
        index: usize,
        chunk: &Chunk,
        settings: &SystemSettings,
    ) -> Result<Vec<Question>, ChunkFailure> {
        let request = question_request(settings, &text.title, chunk);
        let raw = self
            .services
            .generate_raw(request)
            .await
            .map_err(ChunkFailure::Model)?;

        let contents = extract_string_array(&raw)
            .map_err(|e| ChunkFailure::Model(AppError::LLMParsing(e.to_string())))?;
        if contents.is_empty() {
            return Err(ChunkFailure::Model(AppError::Generation(
                "model produced no usable questions".to_string(),
            )));
        }

        let metadata = json!({
            "generation_type": "chunk_questions",
            "start_index": chunk.start_index,
            "end_index": chunk.end_index,
            "length": chunk.length,
        });

        let mut questions = Vec::with_capacity(contents.len());
        for content in contents {
            let question = Question::new(
                text.project_id.clone(),
                text.get_id().to_string(),
                index,
                content,
                metadata.clone(),
            );
            let stored = self
                .db
                .store_item(question)
                .await
                .map_err(|e| ChunkFailure::Fatal(e.into()))?
                .ok_or_else(|| {
                    ChunkFailure::Fatal(AppError::InconsistentState(
                        "stored question was not returned".to_string(),
                    ))
                })?;
            questions.push(stored);
        }
        Ok(questions)
    }
}

/// Per-chunk failure classification: model-side problems are isolated,
/// storage problems abort the run.
enum ChunkFailure {
    Model(AppError),
    Fatal(AppError),
}
