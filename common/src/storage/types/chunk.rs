use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

stored_object!(Chunk, "chunk", {
    text_id: String,
    content: String,
    start_index: usize,
    end_index: usize,
    length: usize
});

impl Chunk {
    pub fn new(text_id: String, content: String, start_index: usize, end_index: usize) -> Self {
        let now = Utc::now();
        let length = end_index.saturating_sub(start_index);
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            text_id,
            content,
            start_index,
            end_index,
            length,
        }
    }

    /// The ordered chunk sequence for a text. Questions refer to chunks by
    /// position in this sequence, so the ordering must be stable.
    pub async fn list_by_text_ordered(
        text_id: &str,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let chunks: Vec<Self> = db
            .client
            .query("SELECT * FROM chunk WHERE text_id = $text_id ORDER BY start_index ASC")
            .bind(("text_id", text_id.to_owned()))
            .await?
            .take(0)?;

        Ok(chunks)
    }

    pub async fn delete_by_text_id(text_id: &str, db: &SurrealDbClient) -> Result<(), AppError> {
        db.client
            .query("DELETE chunk WHERE text_id = $text_id")
            .bind(("text_id", text_id.to_owned()))
            .await?;

        Ok(())
    }
}
