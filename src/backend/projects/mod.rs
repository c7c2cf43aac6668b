//! Project Persistence
//!
//! The collaboration core treats project storage as an external
//! collaborator. It needs exactly two things from it: look a project up,
//! and overwrite a project's document.
//!
//! # Module Structure
//!
//! ```text
//! projects/
//! ├── mod.rs     - Project model, ProjectStore trait, StoreError
//! ├── db.rs      - PostgreSQL store (sqlx)
//! └── memory.rs  - In-memory store (tests, runs without DATABASE_URL)
//! ```
//!
//! # Consistency
//!
//! Stores must provide read-your-writes for the caller: after
//! `update_project_content` returns `Ok`, a `find_project` from the same
//! task observes the new content.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::shared::{Document, SharedError};

/// PostgreSQL-backed store
pub mod db;

/// In-memory store
pub mod memory;

pub use db::PgProjectStore;
pub use memory::MemoryProjectStore;

/// Numeric project identifier
pub type ProjectId = i64;

/// A design project and its document
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub author_id: Option<i64>,
    pub archived: bool,
    pub content: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project {0} does not exist")]
    NotFound(ProjectId),

    #[error("stored content of project {project_id} is unreadable: {source}")]
    CorruptContent {
        project_id: ProjectId,
        #[source]
        source: SharedError,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] SharedError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator consumed by the collaboration core
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Look a project up by id; `Ok(None)` when it does not exist
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Overwrite the whole document of a project
    async fn update_project_content(&self, id: ProjectId, content: &Document) -> Result<(), StoreError>;
}
