//! XFCanvas - Main Library
//!
//! XFCanvas is the backend of a collaborative interface-design tool. Clients
//! open a websocket per project and mutate a shared tree of visual elements;
//! the server applies every edit to a single authoritative document, persists
//! it, and relays the edit to everyone else looking at the same project.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no I/O
//!   - Element model, project documents, tree operations
//!   - Command codec and rejection frames
//!   - Error types
//!
//! - **`backend`** - Axum server
//!   - Connection registry and per-project document hub
//!   - Websocket collaboration sessions
//!   - Share-token access resolution
//!   - Project persistence (PostgreSQL or in-memory)
//!
//! # Usage
//!
//! ```rust,no_run
//! use xfcanvas::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - The connection registry is a `std::sync::Mutex` that is never held
//!   across an `.await`
//! - Each project's document sits behind its own `tokio::sync::Mutex`; every
//!   command for that project is applied, persisted and broadcast under it

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
