//! Dataset serialization for download.
//!
//! Two formats: `json` keeps the full item shape including metadata, `csv`
//! flattens to question/answer pairs. Format names are matched
//! case-insensitively; anything else is rejected with the name echoed back.

use std::io;

use common::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{dataset::Dataset, dataset_item::DatasetItem, StoredObject},
    },
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct ExportedDataset {
    name: String,
    description: Option<String>,
    items: Vec<ExportedItem>,
}

#[derive(Debug, Serialize)]
struct ExportedItem {
    question: String,
    answer: String,
    metadata: serde_json::Value,
    chunk_index: Option<usize>,
}

/// Serializes the dataset to the requested format and returns the bytes.
#[tracing::instrument(skip(db))]
pub async fn export_dataset(
    db: &SurrealDbClient,
    dataset_id: &str,
    format: &str,
) -> Result<Vec<u8>, AppError> {
    let dataset = db
        .get_item::<Dataset>(dataset_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("dataset {dataset_id} not found")))?;
    let items = DatasetItem::list_by_dataset(dataset.get_id(), db).await?;

    let bytes = match format.to_ascii_lowercase().as_str() {
        "json" => export_json(&dataset, items)?,
        "csv" => export_csv(items)?,
        _ => return Err(AppError::UnsupportedFormat(format.to_string())),
    };

    info!(dataset_id, format, size = bytes.len(), "dataset exported");
    Ok(bytes)
}

fn export_json(dataset: &Dataset, items: Vec<DatasetItem>) -> Result<Vec<u8>, AppError> {
    let exported = ExportedDataset {
        name: dataset.name.clone(),
        description: dataset.description.clone(),
        items: items
            .into_iter()
            .map(|item| ExportedItem {
                question: item.question,
                answer: item.answer,
                metadata: item.metadata,
                chunk_index: item.chunk_index,
            })
            .collect(),
    };
    Ok(serde_json::to_vec_pretty(&exported)?)
}

fn export_csv(items: Vec<DatasetItem>) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["question", "answer"])
        .map_err(|e| AppError::Io(io::Error::other(e)))?;
    for item in items {
        writer
            .write_record([&item.question, &item.answer])
            .map_err(|e| AppError::Io(io::Error::other(e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use common::storage::types::project::Project;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    async fn setup_dataset(items: &[(&str, &str)]) -> (SurrealDbClient, String) {
        let db = SurrealDbClient::memory("test", &Uuid::new_v4().to_string())
            .await
            .expect("failed to start db");
        db.ensure_initialized().await.expect("failed to initialize");

        let project = db
            .store_item(Project::new("Export".into(), None))
            .await
            .expect("failed to store project")
            .expect("no project returned");
        let dataset = db
            .store_item(Dataset::new(
                project.get_id().to_string(),
                "export-me".into(),
                Some("for download".into()),
                None,
            ))
            .await
            .expect("failed to store dataset")
            .expect("no dataset returned");

        for (question, answer) in items {
            db.store_item(DatasetItem::new(
                dataset.get_id().to_string(),
                (*question).to_string(),
                (*answer).to_string(),
                json!({"generated": true}),
                Some(0),
            ))
            .await
            .expect("failed to store item");
        }
        let dataset_id = dataset.get_id().to_string();
        (db, dataset_id)
    }

    #[tokio::test]
    async fn test_json_export_shape() {
        let (db, dataset_id) = setup_dataset(&[("Q1?", "A1"), ("Q2?", "A2")]).await;
        let bytes = export_dataset(&db, &dataset_id, "json")
            .await
            .expect("export failed");

        let value: serde_json::Value =
            serde_json::from_slice(&bytes).expect("export is not valid json");
        assert_eq!(value["name"], json!("export-me"));
        assert_eq!(value["description"], json!("for download"));
        let exported = value["items"].as_array().expect("items missing");
        assert_eq!(exported.len(), 2);
        assert_eq!(exported[0]["metadata"]["generated"], json!(true));
        assert_eq!(exported[0]["chunk_index"], json!(0));
    }

    #[tokio::test]
    async fn test_csv_export_shape() {
        let (db, dataset_id) = setup_dataset(&[("What, exactly?", "An answer\nwith a newline")]).await;
        let bytes = export_dataset(&db, &dataset_id, "CSV")
            .await
            .expect("export failed");

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().expect("headers missing").clone();
        assert_eq!(&headers, &csv::StringRecord::from(vec!["question", "answer"]));
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("csv rows unreadable");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "What, exactly?");
        assert_eq!(&rows[0][1], "An answer\nwith a newline");
    }

    #[tokio::test]
    async fn test_empty_dataset_exports() {
        let (db, dataset_id) = setup_dataset(&[]).await;
        let bytes = export_dataset(&db, &dataset_id, "json")
            .await
            .expect("export failed");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("invalid json");
        assert_eq!(value["items"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_format_is_rejected_by_name() {
        let (db, dataset_id) = setup_dataset(&[]).await;
        let result = export_dataset(&db, &dataset_id, "parquet").await;
        match result {
            Err(AppError::UnsupportedFormat(name)) => assert_eq!(name, "parquet"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_dataset_is_not_found() {
        let (db, _) = setup_dataset(&[]).await;
        let result = export_dataset(&db, "missing", "json").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
