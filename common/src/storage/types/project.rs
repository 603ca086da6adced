use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::{dataset::Dataset, question::Question, source_text::SourceText};

stored_object!(Project, "project", {
    name: String,
    description: Option<String>
});

impl Project {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            name,
            description,
        }
    }

    pub async fn rename(
        id: &str,
        name: &str,
        description: Option<&str>,
        db: &SurrealDbClient,
    ) -> Result<Self, AppError> {
        let updated: Option<Self> = db
            .client
            .query(
                "UPDATE type::thing('project', $id) MERGE { name: $name, description: $description, updated_at: time::now() } RETURN AFTER",
            )
            .bind(("id", id.to_owned()))
            .bind(("name", name.to_owned()))
            .bind(("description", description.map(str::to_owned)))
            .await?
            .take(0)?;

        updated.ok_or(AppError::NotFound(format!("project {id}")))
    }

    /// Deletes a project and everything it owns.
    ///
    /// Ordered child-first so no orphans survive a partial failure:
    /// questions, then datasets with their items, then texts with their
    /// chunks, then the project row itself.
    pub async fn delete_cascade(id: &str, db: &SurrealDbClient) -> Result<(), AppError> {
        let project: Option<Self> = db.get_item(id).await?;
        if project.is_none() {
            return Err(AppError::NotFound(format!("project {id}")));
        }

        Question::delete_by_project_id(id, db).await?;

        let datasets = Dataset::list_by_project(id, db).await?;
        for dataset in datasets {
            Dataset::delete_cascade(&dataset.id, db).await?;
        }

        let texts = SourceText::list_by_project(id, db).await?;
        for text in texts {
            SourceText::delete_cascade(&text.id, db).await?;
        }

        let _removed: Option<Self> = db.delete_item(id).await?;
        Ok(())
    }
}
