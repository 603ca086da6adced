use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

stored_object!(DatasetItem, "dataset_item", {
    dataset_id: String,
    question: String,
    answer: String,
    metadata: serde_json::Value,
    chunk_index: Option<usize>
});

impl DatasetItem {
    pub fn new(
        dataset_id: String,
        question: String,
        answer: String,
        metadata: serde_json::Value,
        chunk_index: Option<usize>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            dataset_id,
            question,
            answer,
            metadata,
            chunk_index,
        }
    }

    pub async fn list_by_dataset(
        dataset_id: &str,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let items: Vec<Self> = db
            .client
            .query(
                "SELECT * FROM dataset_item WHERE dataset_id = $dataset_id ORDER BY created_at ASC",
            )
            .bind(("dataset_id", dataset_id.to_owned()))
            .await?
            .take(0)?;

        Ok(items)
    }

    pub async fn delete_by_dataset_id(
        dataset_id: &str,
        db: &SurrealDbClient,
    ) -> Result<(), AppError> {
        db.client
            .query("DELETE dataset_item WHERE dataset_id = $dataset_id")
            .bind(("dataset_id", dataset_id.to_owned()))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dataset_item_is_a_snapshot() {
        let item = DatasetItem::new(
            "d1".to_string(),
            "What is chunk overlap for?".to_string(),
            "It preserves context across chunk boundaries.".to_string(),
            serde_json::json!({ "length": 120 }),
            Some(2),
        );

        assert_eq!(item.dataset_id, "d1");
        assert_eq!(item.chunk_index, Some(2));
        assert!(!item.id.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_dataset() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        for i in 0..2 {
            let item = DatasetItem::new(
                "d1".to_string(),
                format!("q{i}"),
                format!("a{i}"),
                serde_json::json!({}),
                None,
            );
            db.store_item(item).await.expect("store failed");
        }

        let items = DatasetItem::list_by_dataset("d1", &db)
            .await
            .expect("list failed");
        assert_eq!(items.len(), 2);

        let none = DatasetItem::list_by_dataset("d2", &db)
            .await
            .expect("list failed");
        assert!(none.is_empty());
    }
}
