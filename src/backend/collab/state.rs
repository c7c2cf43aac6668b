/**
 * Collaboration State
 *
 * Everything a collaboration session shares with the other sessions of
 * the process: the connection registry, the per-project document hub and
 * the size of each connection's outbound queue.
 */

use std::sync::Arc;

use crate::backend::collab::documents::DocumentHub;
use crate::backend::collab::registry::ConnectionRegistry;
use crate::backend::projects::ProjectStore;

/// Default bound for a connection's outbound queue
pub const DEFAULT_PEER_QUEUE_CAPACITY: usize = 256;

/// Shared collaboration state
///
/// Cheap to clone; clones share the registry and the hub.
#[derive(Debug, Clone)]
pub struct CollabState {
    pub registry: ConnectionRegistry,
    pub documents: DocumentHub,
    pub peer_queue_capacity: usize,
}

impl CollabState {
    pub fn new(store: Arc<dyn ProjectStore>, peer_queue_capacity: usize) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            documents: DocumentHub::new(store),
            peer_queue_capacity: peer_queue_capacity.max(1),
        }
    }
}
