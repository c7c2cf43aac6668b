/**
 * Database Operations for Projects
 *
 * PostgreSQL persistence for projects and their documents. The document is
 * stored as JSON text in `projects.content` and overwritten as a whole on
 * every accepted command.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::backend::projects::{Project, ProjectId, ProjectStore, StoreError};
use crate::shared::Document;

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    title: String,
    author_id: Option<i64>,
    archived: bool,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let content = Document::from_json_str(&row.content).map_err(|source| {
            StoreError::CorruptContent {
                project_id: row.id,
                source,
            }
        })?;

        Ok(Project {
            id: row.id,
            title: row.title,
            author_id: row.author_id,
            archived: row.archived,
            content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Project store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a project with an empty document
    ///
    /// # Arguments
    /// * `title` - Project title
    /// * `author_id` - Owning user, if known
    ///
    /// # Returns
    /// The created project
    pub async fn create_project(
        &self,
        title: &str,
        author_id: Option<i64>,
    ) -> Result<Project, StoreError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (title, author_id, archived, content, created_at)
            VALUES ($1, $2, FALSE, '[]', NOW())
            RETURNING id, title, author_id, archived, content, created_at, updated_at
            "#
        )
        .bind(title)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("[Store] Created project {} ({})", row.id, row.title);
        Project::try_from(row)
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, title, author_id, archived, content, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn update_project_content(&self, id: ProjectId, content: &Document) -> Result<(), StoreError> {
        let encoded = content.to_json_string()?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            "#
        )
        .bind(id)
        .bind(encoded)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
