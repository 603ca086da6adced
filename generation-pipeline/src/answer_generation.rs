//! Answer generation for a single stored question.
//!
//! Re-resolves the question's chunk from the current chunk sequence before
//! calling the model, so a question whose chunk index no longer exists is
//! reported instead of silently answered from the wrong excerpt. The
//! question row is only mutated after a successful model call.

use std::sync::Arc;

use chrono::Utc;
use common::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{chunk::Chunk, question::Question, system_settings::SystemSettings},
    },
};
use serde_json::{json, Value};
use tracing::info;

use crate::{prompts::answer_request, services::GenerationService};

pub struct AnswerGenerator {
    db: Arc<SurrealDbClient>,
    services: Arc<dyn GenerationService>,
}

impl AnswerGenerator {
    pub fn new(db: Arc<SurrealDbClient>, services: Arc<dyn GenerationService>) -> Self {
        Self { db, services }
    }

    /// Generates and persists an answer for `question_id`, returning the
    /// updated question. On any failure the stored question is left
    /// untouched, sentinel answer included.
    #[tracing::instrument(skip(self))]
    pub async fn generate(&self, question_id: &str) -> Result<Question, AppError> {
        let question = self
            .db
            .get_item::<Question>(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("question {question_id} not found")))?;

        let chunks = Chunk::list_by_text_ordered(&question.text_id, &self.db).await?;
        let chunk = chunks.get(question.chunk_index).ok_or_else(|| {
            AppError::InconsistentState(format!(
                "question {question_id} references chunk {} but text {} has {} chunks",
                question.chunk_index,
                question.text_id,
                chunks.len()
            ))
        })?;

        let settings = SystemSettings::get_current(&self.db).await?;
        let request = answer_request(&settings, &question, chunk);
        let answer = self.services.generate_raw(request).await?;

        let metadata = merge_metadata(
            question.metadata.clone(),
            json!({
                "generated": true,
                "generated_at": Utc::now().to_rfc3339(),
            }),
        );

        let updated = Question::apply_answer(question_id, &answer, metadata, &self.db).await?;
        info!(question_id, "answer persisted");
        Ok(updated)
    }
}

/// Merges `additions` into `base`, keeping existing keys unless the
/// addition overwrites them. Non-object metadata is replaced wholesale.
fn merge_metadata(base: Value, additions: Value) -> Value {
    match (base, additions) {
        (Value::Object(mut base_map), Value::Object(additions_map)) => {
            for (key, value) in additions_map {
                base_map.insert(key, value);
            }
            Value::Object(base_map)
        }
        (_, additions) => additions,
    }
}
