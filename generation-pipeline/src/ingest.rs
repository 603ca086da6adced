//! Text intake: store a source text, chunk it and persist the chunk rows.

use common::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{chunk::Chunk, project::Project, source_text::SourceText, StoredObject},
    },
};
use tracing::info;

use crate::chunker::{split_text, ChunkingConfig};

/// Stores `content` as a new source text under `project_id` and persists
/// its chunk sequence in offset order. The text is marked chunked only
/// after every chunk row exists.
#[tracing::instrument(skip(db, content, cfg))]
pub async fn ingest_text(
    db: &SurrealDbClient,
    project_id: &str,
    title: &str,
    content: &str,
    cfg: &ChunkingConfig,
) -> Result<(SourceText, Vec<Chunk>), AppError> {
    db.get_item::<Project>(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project {project_id} not found")))?;

    let spans = split_text(content, cfg)?;

    let text = db
        .store_item(SourceText::new(
            project_id.to_string(),
            title.to_string(),
            Some(content.to_string()),
            content.len() as u64,
        ))
        .await?
        .ok_or_else(|| {
            AppError::InconsistentState("stored source text was not returned".to_string())
        })?;

    let mut chunks = Vec::with_capacity(spans.len());
    for span in spans {
        let chunk = db
            .store_item(Chunk::new(
                text.get_id().to_string(),
                span.content,
                span.start_index,
                span.end_index,
            ))
            .await?
            .ok_or_else(|| {
                AppError::InconsistentState("stored chunk was not returned".to_string())
            })?;
        chunks.push(chunk);
    }

    let text = SourceText::mark_chunked(text.get_id(), db).await?;
    info!(
        text_id = text.get_id(),
        chunks = chunks.len(),
        "text ingested"
    );
    Ok((text, chunks))
}

#[cfg(test)]
mod tests {
    use common::storage::types::source_text::TextStatus;
    use uuid::Uuid;

    use super::*;

    async fn memory_db() -> SurrealDbClient {
        let db = SurrealDbClient::memory("test", &Uuid::new_v4().to_string())
            .await
            .expect("failed to start db");
        db.ensure_initialized().await.expect("failed to initialize");
        db
    }

    #[tokio::test]
    async fn test_ingest_persists_ordered_chunks() {
        let db = memory_db().await;
        let project = db
            .store_item(Project::new("Ingest".into(), None))
            .await
            .expect("failed to store project")
            .expect("no project returned");

        let content = "First sentence. Second sentence! Third sentence? And a closing line.";
        let cfg = ChunkingConfig {
            max_chunk_size: 24,
            overlap: 4,
            ..ChunkingConfig::default()
        };
        let (text, chunks) = ingest_text(&db, project.get_id(), "Notes", content, &cfg)
            .await
            .expect("ingest failed");

        assert_eq!(text.status, TextStatus::Chunked);
        assert!(!chunks.is_empty());

        let stored = Chunk::list_by_text_ordered(text.get_id(), &db)
            .await
            .expect("listing failed");
        assert_eq!(stored.len(), chunks.len());
        for window in stored.windows(2) {
            assert!(window[0].start_index <= window[1].start_index);
        }
    }

    #[tokio::test]
    async fn test_ingest_rejects_unknown_project() {
        let db = memory_db().await;
        let result = ingest_text(&db, "missing", "Notes", "text", &ChunkingConfig::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
