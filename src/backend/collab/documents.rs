/**
 * Document Hub
 *
 * Holds the authoritative in-memory document of every project that has at
 * least one live connection.
 *
 * # Serialization
 *
 * Each project's document sits behind its own `tokio::sync::Mutex`. A
 * session applies a command, persists the result and broadcasts the frame
 * while holding that lock, so all connections of a project observe edits
 * in one order and the stored document always matches the last broadcast.
 * Different projects never contend.
 *
 * # Lifetime
 *
 * A session takes a `DocumentLease` for its project. The document is read
 * from the store the first time a lease holder locks it and is dropped
 * from memory once the last lease for the project goes away.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, MappedMutexGuard, MutexGuard as AsyncMutexGuard};

use crate::backend::projects::{ProjectId, ProjectStore, StoreError};
use crate::shared::Document;

type Slot = Arc<AsyncMutex<Option<Document>>>;

struct HubEntry {
    leases: usize,
    slot: Slot,
}

/// Per-project authoritative documents
#[derive(Clone)]
pub struct DocumentHub {
    store: Arc<dyn ProjectStore>,
    entries: Arc<Mutex<HashMap<ProjectId, HubEntry>>>,
}

impl std::fmt::Debug for DocumentHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHub")
            .field("loaded_projects", &self.loaded_count())
            .finish()
    }
}

impl DocumentHub {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            store,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ProjectId, HubEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a lease on a project's document
    pub fn acquire(&self, project_id: ProjectId) -> DocumentLease {
        let slot = {
            let mut entries = self.entries();
            let entry = entries.entry(project_id).or_insert_with(|| HubEntry {
                leases: 0,
                slot: Arc::new(AsyncMutex::new(None)),
            });
            entry.leases += 1;
            entry.slot.clone()
        };

        DocumentLease {
            hub: self.clone(),
            project_id,
            slot,
        }
    }

    fn release(&self, project_id: ProjectId) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(&project_id) {
            entry.leases = entry.leases.saturating_sub(1);
            if entry.leases == 0 {
                entries.remove(&project_id);
                tracing::debug!("[Collab] Unloaded document for project {}", project_id);
            }
        }
    }

    /// Number of projects currently held in memory
    pub fn loaded_count(&self) -> usize {
        self.entries().len()
    }
}

/// A session's hold on one project's document
pub struct DocumentLease {
    hub: DocumentHub,
    project_id: ProjectId,
    slot: Slot,
}

impl DocumentLease {
    /// Lock the project's document, loading it from the store if needed
    ///
    /// The lock is held until the returned guard is dropped.
    pub async fn lock(&self) -> Result<DocumentGuard<'_>, StoreError> {
        let mut slot = self.slot.lock().await;

        if slot.is_none() {
            let project = self
                .hub
                .store
                .find_project(self.project_id)
                .await?
                .ok_or(StoreError::NotFound(self.project_id))?;
            tracing::debug!(
                "[Collab] Loaded project {} with {} elements",
                self.project_id,
                project.content.len()
            );
            *slot = Some(project.content);
        }

        let document = AsyncMutexGuard::map(slot, |slot| slot.get_or_insert_with(Document::new));
        Ok(DocumentGuard {
            project_id: self.project_id,
            store: self.hub.store.as_ref(),
            document,
        })
    }
}

impl Drop for DocumentLease {
    fn drop(&mut self) {
        self.hub.release(self.project_id);
    }
}

/// Exclusive access to a project's authoritative document
pub struct DocumentGuard<'a> {
    project_id: ProjectId,
    store: &'a dyn ProjectStore,
    document: MappedMutexGuard<'a, Document>,
}

impl DocumentGuard<'_> {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Persist `next` and make it the authoritative document
    ///
    /// On failure the in-memory document is left untouched.
    pub async fn commit(&mut self, next: Document) -> Result<(), StoreError> {
        self.store.update_project_content(self.project_id, &next).await?;
        *self.document = next;
        Ok(())
    }
}
