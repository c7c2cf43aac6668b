/**
 * Connection Registry
 *
 * Authoritative map of project id → live collaboration connections.
 *
 * The registry never performs I/O. Each connection is represented by a
 * `PeerHandle` carrying the sending half of that connection's outbound
 * queue; `peers` hands out a point-in-time copy of those handles so
 * delivery happens without the registry lock held. A handle can also ask
 * its connection to close when the peer falls too far behind.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

use crate::backend::auth::Capability;
use crate::backend::projects::ProjectId;

/// Handle to one live connection
#[derive(Debug, Clone)]
pub struct PeerHandle {
    pub id: Uuid,
    pub capability: Capability,
    outbound: mpsc::Sender<String>,
    lagged: Arc<Notify>,
}

impl PeerHandle {
    pub fn new(id: Uuid, capability: Capability, outbound: mpsc::Sender<String>) -> Self {
        Self {
            id,
            capability,
            outbound,
            lagged: Arc::new(Notify::new()),
        }
    }

    /// Queue a frame without waiting
    pub fn try_send(&self, frame: String) -> Result<(), mpsc::error::TrySendError<String>> {
        self.outbound.try_send(frame)
    }

    /// Signal fired when this connection missed a frame
    ///
    /// The session's writer waits on it and closes the socket, so the client
    /// reconnects and starts again from a fresh snapshot.
    pub fn lagged(&self) -> Arc<Notify> {
        self.lagged.clone()
    }

    /// Ask the connection to close
    pub fn disconnect(&self) {
        self.lagged.notify_one();
    }
}

type ProjectPeers = HashMap<ProjectId, HashMap<Uuid, PeerHandle>>;

/// Per-project set of live connections
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    projects: Arc<Mutex<ProjectPeers>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ProjectPeers> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a connection to a project's set
    ///
    /// The returned guard unregisters the connection when dropped.
    pub fn register(&self, project_id: ProjectId, peer: PeerHandle) -> Registration {
        let peer_id = peer.id;
        let count = {
            let mut projects = self.lock();
            let peers = projects.entry(project_id).or_default();
            peers.insert(peer_id, peer);
            peers.len()
        };
        tracing::info!(
            "[Collab] Connection {} joined project {} ({} connected)",
            peer_id,
            project_id,
            count
        );

        Registration {
            registry: self.clone(),
            project_id,
            peer_id,
        }
    }

    /// Remove a connection; empty project entries are pruned
    ///
    /// Returns whether the connection was registered.
    pub fn unregister(&self, project_id: ProjectId, peer_id: Uuid) -> bool {
        let mut projects = self.lock();
        let Some(peers) = projects.get_mut(&project_id) else {
            return false;
        };
        let removed = peers.remove(&peer_id).is_some();
        let remaining = peers.len();
        if remaining == 0 {
            projects.remove(&project_id);
        }
        drop(projects);

        if removed {
            tracing::info!(
                "[Collab] Connection {} left project {} ({} connected)",
                peer_id,
                project_id,
                remaining
            );
        }
        removed
    }

    /// Snapshot of the connections registered for a project
    pub fn peers(&self, project_id: ProjectId) -> Vec<PeerHandle> {
        self.lock()
            .get(&project_id)
            .map(|peers| peers.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn connection_count(&self, project_id: ProjectId) -> usize {
        self.lock().get(&project_id).map_or(0, HashMap::len)
    }

    /// Number of projects with at least one live connection
    pub fn project_count(&self) -> usize {
        self.lock().len()
    }
}

/// Registration of one connection; unregisters on drop
#[derive(Debug)]
pub struct Registration {
    registry: ConnectionRegistry,
    project_id: ProjectId,
    peer_id: Uuid,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(self.project_id, self.peer_id);
    }
}
