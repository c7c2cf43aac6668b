/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - Collaboration state (connection registry, document hub)
 * - The project store
 * - The keys used to verify share tokens
 *
 * Every field is cheap to clone; clones share the same underlying state.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::ShareTokenKeys;
use crate::backend::collab::CollabState;
use crate::backend::projects::ProjectStore;
use crate::backend::server::config::ServerConfig;

/// Application state shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Registry and per-project documents for live sessions
    pub collab: CollabState,

    /// Persistence collaborator
    pub store: Arc<dyn ProjectStore>,

    /// Share token verification keys
    pub share_keys: ShareTokenKeys,
}

impl AppState {
    pub fn new(config: &ServerConfig, store: Arc<dyn ProjectStore>) -> Self {
        Self {
            collab: CollabState::new(store.clone(), config.peer_queue_capacity),
            store,
            share_keys: ShareTokenKeys::new(&config.share_token_secret),
        }
    }
}

impl FromRef<AppState> for CollabState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.collab.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ProjectStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for ShareTokenKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.share_keys.clone()
    }
}
