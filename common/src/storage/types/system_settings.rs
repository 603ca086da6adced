use crate::storage::types::project::deserialize_flexible_id;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SystemSettings {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    pub question_model: String,
    pub answer_model: String,
    pub question_system_prompt: String,
    pub answer_system_prompt: String,
}

impl SystemSettings {
    pub async fn ensure_initialized(db: &SurrealDbClient) -> Result<Self, AppError> {
        let settings = db.select(("system_settings", "current")).await?;

        if settings.is_none() {
            let created: Option<SystemSettings> = db
                .create(("system_settings", "current"))
                .content(SystemSettings {
                    id: "current".to_string(),
                    ..Self::new()
                })
                .await?;

            return created.ok_or(AppError::Validation("Failed to initialize settings".into()));
        };

        settings.ok_or(AppError::Validation("Failed to initialize settings".into()))
    }

    pub async fn get_current(db: &SurrealDbClient) -> Result<Self, AppError> {
        let settings: Option<Self> = db
            .client
            .query("SELECT * FROM type::thing('system_settings', 'current')")
            .await?
            .take(0)?;

        settings.ok_or(AppError::NotFound("System settings not found".into()))
    }

    pub async fn update(db: &SurrealDbClient, changes: Self) -> Result<Self, AppError> {
        let updated: Option<Self> = db
            .client
            .query("UPDATE type::thing('system_settings', 'current') MERGE $changes RETURN AFTER")
            .bind(("changes", changes))
            .await?
            .take(0)?;

        updated.ok_or(AppError::Validation(
            "Something went wrong updating the settings".into(),
        ))
    }

    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question_model: "gpt-4o-mini".to_string(),
            answer_model: "gpt-4o-mini".to_string(),
            question_system_prompt:
                crate::storage::types::system_prompts::DEFAULT_QUESTION_SYSTEM_PROMPT.to_string(),
            answer_system_prompt:
                crate::storage::types::system_prompts::DEFAULT_ANSWER_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_initialized_seeds_defaults() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        let settings = SystemSettings::ensure_initialized(&db)
            .await
            .expect("Failed to initialize settings");

        assert_eq!(settings.id, "current");
        assert!(!settings.question_system_prompt.is_empty());
        assert!(!settings.answer_system_prompt.is_empty());

        // Second call returns the existing row instead of re-creating it.
        let again = SystemSettings::ensure_initialized(&db)
            .await
            .expect("Failed to re-read settings");
        assert_eq!(again.question_model, settings.question_model);
    }

    #[tokio::test]
    async fn test_update_merges_changes() {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        let mut settings = SystemSettings::ensure_initialized(&db)
            .await
            .expect("Failed to initialize settings");

        settings.question_model = "gpt-4o".to_string();
        let updated = SystemSettings::update(&db, settings)
            .await
            .expect("Failed to update settings");

        assert_eq!(updated.question_model, "gpt-4o");

        let current = SystemSettings::get_current(&db)
            .await
            .expect("Failed to get current settings");
        assert_eq!(current.question_model, "gpt-4o");
    }
}
