//! Collaborative Editing Module
//!
//! Server side of the realtime canvas: every client editing a project holds
//! a websocket, and every edit is applied to one authoritative document per
//! project before being relayed to the other clients.
//!
//! # Architecture
//!
//! - **`registry`** - Project id → live connections
//! - **`documents`** - Per-project document hub; serializes edits
//! - **`session`** - One connection's read/apply/relay loop
//! - **`state`** - State shared by all sessions
//! - **`handlers`** - Websocket upgrade endpoint
//!
//! # Protocol
//!
//! ```text
//! server → client   [ {...}, {...} ]                 full document, once
//! client → server   update {"id": 4, "width": 120}   command frame
//! server → peers    update {"id": 4, "width": 120}   relayed verbatim
//! server → client   {"error": "...", "message": "..."} rejection
//! ```

/// Connection registry
pub mod registry;

/// Per-project document hub
pub mod documents;

/// Websocket session loop
pub mod session;

/// Shared collaboration state
pub mod state;

/// Websocket upgrade handler
pub mod handlers;

pub use documents::{DocumentGuard, DocumentHub, DocumentLease};
pub use handlers::handle_collab_socket;
pub use registry::{ConnectionRegistry, PeerHandle, Registration};
pub use state::CollabState;
