//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs            - Module exports and documentation
//! ├── router.rs         - Main router creation
//! └── collab_routes.rs  - Collaboration websocket route
//! ```
//!
//! # Routes
//!
//! - `GET /api/v1/projects/{target}/content` - Collaboration channel
//! - anything else - 404 JSON error

/// Main router creation
pub mod router;

/// Collaboration routes
pub mod collab_routes;

pub use router::create_router;
