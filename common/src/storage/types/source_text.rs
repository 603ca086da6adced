use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::{chunk::Chunk, question::Question};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TextStatus {
    Uploaded,
    Chunked,
}

stored_object!(SourceText, "source_text", {
    project_id: String,
    title: String,
    content: Option<String>,
    file_size: u64,
    status: TextStatus
});

impl SourceText {
    pub fn new(
        project_id: String,
        title: String,
        content: Option<String>,
        file_size: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            project_id,
            title,
            content,
            file_size,
            status: TextStatus::Uploaded,
        }
    }

    pub async fn list_by_project(
        project_id: &str,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let texts: Vec<Self> = db
            .client
            .query("SELECT * FROM source_text WHERE project_id = $project_id ORDER BY created_at ASC")
            .bind(("project_id", project_id.to_owned()))
            .await?
            .take(0)?;

        Ok(texts)
    }

    pub async fn mark_chunked(id: &str, db: &SurrealDbClient) -> Result<Self, AppError> {
        let updated: Option<Self> = db
            .client
            .query(
                "UPDATE type::thing('source_text', $id) MERGE { status: 'Chunked', updated_at: time::now() } RETURN AFTER",
            )
            .bind(("id", id.to_owned()))
            .await?
            .take(0)?;

        updated.ok_or_else(|| AppError::NotFound(format!("source text {id} not found")))
    }

    /// Deletes a text together with its chunks and the questions drawn from it.
    pub async fn delete_cascade(id: &str, db: &SurrealDbClient) -> Result<(), AppError> {
        Question::delete_by_text_id(id, db).await?;
        Chunk::delete_by_text_id(id, db).await?;
        let _removed: Option<Self> = db.delete_item(id).await?;
        Ok(())
    }
}
