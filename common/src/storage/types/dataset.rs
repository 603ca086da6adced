use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::dataset_item::DatasetItem;

stored_object!(Dataset, "dataset", {
    project_id: String,
    name: String,
    description: Option<String>,
    chunk_index: Option<usize>
});

impl Dataset {
    pub fn new(
        project_id: String,
        name: String,
        description: Option<String>,
        chunk_index: Option<usize>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            project_id,
            name,
            description,
            chunk_index,
        }
    }

    pub async fn list_by_project(
        project_id: &str,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let datasets: Vec<Self> = db
            .client
            .query("SELECT * FROM dataset WHERE project_id = $project_id ORDER BY created_at ASC")
            .bind(("project_id", project_id.to_owned()))
            .await?
            .take(0)?;

        Ok(datasets)
    }

    /// Deletes a dataset, items first.
    pub async fn delete_cascade(id: &str, db: &SurrealDbClient) -> Result<(), AppError> {
        DatasetItem::delete_by_dataset_id(id, db).await?;
        let _removed: Option<Self> = db.delete_item(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dataset_creation() {
        let dataset = Dataset::new(
            "p1".to_string(),
            "train split".to_string(),
            Some("first pass".to_string()),
            Some(3),
        );

        assert_eq!(dataset.project_id, "p1");
        assert_eq!(dataset.chunk_index, Some(3));
        assert!(!dataset.id.is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascade_removes_items() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        let dataset = Dataset::new("p1".to_string(), "set".to_string(), None, None);
        db.store_item(dataset.clone()).await.expect("store failed");

        for i in 0..3 {
            let item = DatasetItem::new(
                dataset.id.clone(),
                format!("q{i}"),
                format!("a{i}"),
                serde_json::json!({}),
                Some(i),
            );
            db.store_item(item).await.expect("store failed");
        }

        let survivor_set = Dataset::new("p1".to_string(), "other".to_string(), None, None);
        db.store_item(survivor_set.clone())
            .await
            .expect("store failed");
        let survivor = DatasetItem::new(
            survivor_set.id.clone(),
            "keep".to_string(),
            "me".to_string(),
            serde_json::json!({}),
            None,
        );
        db.store_item(survivor.clone()).await.expect("store failed");

        Dataset::delete_cascade(&dataset.id, &db)
            .await
            .expect("cascade failed");

        let items: Vec<DatasetItem> = db.get_all_stored_items().await.expect("query failed");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, survivor.id);

        let datasets: Vec<Dataset> = db.get_all_stored_items().await.expect("query failed");
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].id, survivor_set.id);
    }
}
