//! Backend Module
//!
//! All server-side code for XFCanvas: an Axum server that hosts one
//! websocket collaboration channel per project.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly
//! - **`collab`** - Connection registry, document hub, websocket sessions
//! - **`auth`** - Share tokens and access resolution
//! - **`projects`** - Project persistence (PostgreSQL or in-memory)
//! - **`realtime`** - Fan-out of frames to peer connections
//! - **`error`** - Backend error types and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── collab/         - Collaborative editing
//! ├── auth/           - Access resolution
//! ├── projects/       - Persistence
//! ├── realtime/       - Peer fan-out
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! GET /api/v1/projects/{target}/content
//!   → auth::resolve_access      (401 on bad token)
//!   → ProjectStore::find_project (404 on unknown project)
//!   → websocket upgrade → collab::session::run_session
//! ```

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// Collaborative editing
pub mod collab;

/// Access resolution
pub mod auth;

/// Project persistence
pub mod projects;

/// Peer fan-out
pub mod realtime;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
