//! In-memory project store
//!
//! Used by the test suite and as the fallback when the server runs without
//! `DATABASE_URL`. Contents are lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::backend::projects::{Project, ProjectId, ProjectStore, StoreError};
use crate::shared::Document;

#[derive(Debug)]
pub struct MemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Create a project with an empty document
    pub async fn create_project(&self, title: &str, author_id: Option<i64>) -> Project {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let project = Project {
            id,
            title: title.to_string(),
            author_id,
            archived: false,
            content: Document::new(),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.projects.write().await.insert(id, project.clone());
        project
    }

    /// Current document of a project
    pub async fn content(&self, id: ProjectId) -> Option<Document> {
        self.projects.read().await.get(&id).map(|p| p.content.clone())
    }

    /// Make every subsequent content update fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn update_project_content(&self, id: ProjectId, content: &Document) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }

        let mut projects = self.projects.write().await;
        let project = projects.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        project.content = content.clone();
        project.updated_at = Some(Utc::now());
        Ok(())
    }
}
