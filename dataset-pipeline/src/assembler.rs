//! Dataset assembly: snapshotting questions into a named dataset.
//!
//! Items copy the question text, answer and metadata at assembly time, so
//! later edits or deletions of the source questions never change an
//! existing dataset.

use common::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{
            dataset::Dataset,
            dataset_item::DatasetItem,
            project::Project,
            question::{Question, QuestionFilter},
            StoredObject,
        },
    },
};
use tracing::info;

/// What to put in a new dataset. Explicit `question_ids` win over the
/// text and chunk filters; with nothing set, every question of the
/// project is included.
#[derive(Debug, Clone, Default)]
pub struct AssemblyScope {
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub text_id: Option<String>,
    pub chunk_index: Option<usize>,
    pub question_ids: Option<Vec<String>>,
}

/// Creates a dataset and one item per selected question. An empty
/// selection still creates the dataset.
#[tracing::instrument(skip(db, scope), fields(project_id = %scope.project_id, name = %scope.name))]
pub async fn assemble_dataset(
    db: &SurrealDbClient,
    scope: AssemblyScope,
) -> Result<(Dataset, Vec<DatasetItem>), AppError> {
    if scope.name.trim().is_empty() {
        return Err(AppError::Validation("dataset name must not be empty".into()));
    }
    if scope.chunk_index.is_some() && scope.text_id.is_none() {
        return Err(AppError::Validation(
            "a chunk filter requires a text filter".into(),
        ));
    }
    db.get_item::<Project>(&scope.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project {} not found", scope.project_id)))?;

    let questions = match &scope.question_ids {
        Some(ids) => {
            let mut selected = Vec::with_capacity(ids.len());
            for id in ids {
                let question = db
                    .get_item::<Question>(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("question {id} not found")))?;
                if question.project_id != scope.project_id {
                    return Err(AppError::Validation(format!(
                        "question {id} does not belong to project {}",
                        scope.project_id
                    )));
                }
                selected.push(question);
            }
            selected
        }
        None => {
            let filter = QuestionFilter {
                text_id: scope.text_id.clone(),
                chunk_index: scope.chunk_index,
            };
            Question::list_filtered(&scope.project_id, &filter, db).await?
        }
    };

    let dataset = db
        .store_item(Dataset::new(
            scope.project_id,
            scope.name,
            scope.description,
            scope.chunk_index,
        ))
        .await?
        .ok_or_else(|| {
            AppError::InconsistentState("stored dataset was not returned".to_string())
        })?;

    let mut items = Vec::with_capacity(questions.len());
    for question in questions {
        let item = db
            .store_item(DatasetItem::new(
                dataset.get_id().to_string(),
                question.content,
                question.answer,
                question.metadata,
                Some(question.chunk_index),
            ))
            .await?
            .ok_or_else(|| {
                AppError::InconsistentState("stored dataset item was not returned".to_string())
            })?;
        items.push(item);
    }

    info!(
        dataset_id = dataset.get_id(),
        items = items.len(),
        "dataset assembled"
    );
    Ok((dataset, items))
}
