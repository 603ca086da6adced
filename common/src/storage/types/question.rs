use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

/// Explicit "not generated yet" marker. Downstream consumers check for this
/// value instead of a null, so "no answer" and "empty answer" stay distinct.
pub const NO_ANSWER_SENTINEL: &str = "[NO ANSWER GENERATED]";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionStatus {
    Pending,
    Answered,
}

/// Filter for question listings. `project_id` is mandatory, the rest narrow.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub text_id: Option<String>,
    pub chunk_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: usize,
}

stored_object!(Question, "question", {
    project_id: String,
    text_id: String,
    chunk_index: usize,
    content: String,
    answer: String,
    metadata: serde_json::Value,
    status: QuestionStatus
});

impl Question {
    pub fn new(
        project_id: String,
        text_id: String,
        chunk_index: usize,
        content: String,
        metadata: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            project_id,
            text_id,
            chunk_index,
            content,
            answer: NO_ANSWER_SENTINEL.to_string(),
            metadata,
            status: QuestionStatus::Pending,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answer != NO_ANSWER_SENTINEL
    }

    /// Filtered page of questions plus the total match count.
    ///
    /// `page` is 1-based; a page size of 0 is rejected.
    pub async fn list_paginated(
        project_id: &str,
        filter: &QuestionFilter,
        page: usize,
        page_size: usize,
        db: &SurrealDbClient,
    ) -> Result<(Vec<Self>, usize), AppError> {
        if page == 0 || page_size == 0 {
            return Err(AppError::Validation(
                "page and page_size must be at least 1".into(),
            ));
        }

        let mut conditions = vec!["project_id = $project_id"];
        if filter.text_id.is_some() {
            conditions.push("text_id = $text_id");
        }
        if filter.chunk_index.is_some() {
            conditions.push("chunk_index = $chunk_index");
        }
        let where_clause = conditions.join(" AND ");

        let start = page.saturating_sub(1).saturating_mul(page_size);
        let select = format!(
            "SELECT * FROM question WHERE {where_clause} ORDER BY created_at ASC LIMIT $limit START $start"
        );
        let count = format!("SELECT count() AS total FROM question WHERE {where_clause} GROUP ALL");

        let mut response = db
            .client
            .query(select)
            .query(count)
            .bind(("project_id", project_id.to_owned()))
            .bind(("text_id", filter.text_id.clone().unwrap_or_default()))
            .bind(("chunk_index", filter.chunk_index.unwrap_or_default()))
            .bind(("limit", page_size))
            .bind(("start", start))
            .await?;

        let items: Vec<Self> = response.take(0)?;
        let count_row: Option<CountRow> = response.take(1)?;
        let total = count_row.map_or(0, |row| row.total);

        Ok((items, total))
    }

    /// All questions matching the filter, in creation order, unpaginated.
    pub async fn list_filtered(
        project_id: &str,
        filter: &QuestionFilter,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let mut conditions = vec!["project_id = $project_id"];
        if filter.text_id.is_some() {
            conditions.push("text_id = $text_id");
        }
        if filter.chunk_index.is_some() {
            conditions.push("chunk_index = $chunk_index");
        }
        let query = format!(
            "SELECT * FROM question WHERE {} ORDER BY created_at ASC",
            conditions.join(" AND ")
        );

        let questions: Vec<Self> = db
            .client
            .query(query)
            .bind(("project_id", project_id.to_owned()))
            .bind(("text_id", filter.text_id.clone().unwrap_or_default()))
            .bind(("chunk_index", filter.chunk_index.unwrap_or_default()))
            .await?
            .take(0)?;

        Ok(questions)
    }

    /// Attaches an answer in a single record write. The caller supplies the
    /// already-merged metadata object so a failed generation never leaves a
    /// half-updated row.
    pub async fn apply_answer(
        id: &str,
        answer: &str,
        metadata: serde_json::Value,
        db: &SurrealDbClient,
    ) -> Result<Self, AppError> {
        let updated: Option<Self> = db
            .client
            .query(
                "UPDATE type::thing('question', $id) MERGE { answer: $answer, metadata: $metadata, status: 'Answered', updated_at: time::now() } RETURN AFTER",
            )
            .bind(("id", id.to_owned()))
            .bind(("answer", answer.to_owned()))
            .bind(("metadata", metadata))
            .await?
            .take(0)?;

        updated.ok_or(AppError::NotFound(format!("question {id}")))
    }

    pub async fn delete_many(ids: &[String], db: &SurrealDbClient) -> Result<usize, AppError> {
        let mut removed = 0usize;
        for id in ids {
            let deleted: Option<Self> = db.delete_item(id).await?;
            if deleted.is_some() {
                removed = removed.saturating_add(1);
            }
        }
        Ok(removed)
    }

    pub async fn delete_by_text_id(text_id: &str, db: &SurrealDbClient) -> Result<(), AppError> {
        db.client
            .query("DELETE question WHERE text_id = $text_id")
            .bind(("text_id", text_id.to_owned()))
            .await?;

        Ok(())
    }

    pub async fn delete_by_project_id(
        project_id: &str,
        db: &SurrealDbClient,
    ) -> Result<(), AppError> {
        db.client
            .query("DELETE question WHERE project_id = $project_id")
            .bind(("project_id", project_id.to_owned()))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(project: &str, text: &str, chunk_index: usize, content: &str) -> Question {
        Question::new(
            project.to_string(),
            text.to_string(),
            chunk_index,
            content.to_string(),
            serde_json::json!({ "length": 42 }),
        )
    }

    #[tokio::test]
    async fn test_new_question_has_sentinel_answer() {
        let q = question("p1", "t1", 0, "Why?");
        assert_eq!(q.answer, NO_ANSWER_SENTINEL);
        assert_eq!(q.status, QuestionStatus::Pending);
        assert!(!q.is_answered());
    }

    #[tokio::test]
    async fn test_list_paginated_with_filters() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        for i in 0..5 {
            db.store_item(question("p1", "t1", i, &format!("q{i}")))
                .await
                .expect("store failed");
        }
        db.store_item(question("p1", "t2", 0, "other text"))
            .await
            .expect("store failed");
        db.store_item(question("p2", "t3", 0, "other project"))
            .await
            .expect("store failed");

        let filter = QuestionFilter {
            text_id: Some("t1".to_string()),
            chunk_index: None,
        };
        let (page_one, total) = Question::list_paginated("p1", &filter, 1, 3, &db)
            .await
            .expect("list failed");
        assert_eq!(page_one.len(), 3);
        assert_eq!(total, 5);

        let (page_two, total) = Question::list_paginated("p1", &filter, 2, 3, &db)
            .await
            .expect("list failed");
        assert_eq!(page_two.len(), 2);
        assert_eq!(total, 5);

        let narrow = QuestionFilter {
            text_id: Some("t1".to_string()),
            chunk_index: Some(2),
        };
        let (only, total) = Question::list_paginated("p1", &narrow, 1, 10, &db)
            .await
            .expect("list failed");
        assert_eq!(only.len(), 1);
        assert_eq!(total, 1);
        assert_eq!(only[0].content, "q2");
    }

    #[tokio::test]
    async fn test_list_paginated_rejects_zero_page() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        let result =
            Question::list_paginated("p1", &QuestionFilter::default(), 0, 10, &db).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_apply_answer_updates_row() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        let q = question("p1", "t1", 0, "What color is the sky?");
        db.store_item(q.clone()).await.expect("store failed");

        let merged = serde_json::json!({ "length": 42, "generated": true });
        let updated = Question::apply_answer(&q.id, "Blue.", merged, &db)
            .await
            .expect("apply failed");

        assert_eq!(updated.answer, "Blue.");
        assert_eq!(updated.status, QuestionStatus::Answered);
        assert_eq!(updated.metadata["generated"], serde_json::json!(true));
        assert!(updated.is_answered());
    }

    #[tokio::test]
    async fn test_delete_many_reports_removed_count() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        let a = question("p1", "t1", 0, "a");
        let b = question("p1", "t1", 1, "b");
        db.store_item(a.clone()).await.expect("store failed");
        db.store_item(b.clone()).await.expect("store failed");

        let removed = Question::delete_many(
            &[a.id.clone(), "missing".to_string(), b.id.clone()],
            &db,
        )
        .await
        .expect("delete failed");

        assert_eq!(removed, 2);
        let remaining: Vec<Question> = db.get_all_stored_items().await.expect("query failed");
        assert!(remaining.is_empty());
    }
}
