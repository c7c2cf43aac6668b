//! Authentication Module
//!
//! Decides who may open a project's collaboration channel and with which
//! capability. User accounts and login sessions live in the CRUD layer;
//! this module only deals with the handshake target.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs     - Module exports and documentation
//! ├── tokens.rs  - Share token signing and verification (JWT, HS256)
//! └── access.rs  - Handshake target → (project, capability)
//! ```
//!
//! # Access Forms
//!
//! 1. **Direct**: `/api/v1/projects/17/content` opens project 17 with edit access
//! 2. **Shared**: `/api/v1/projects/<token>/content` opens the project named in
//!    the token with the token's capability, until it expires

/// Share token signing and verification
pub mod tokens;

/// Handshake target resolution
pub mod access;

pub use access::{resolve_access, AccessGrant, Capability};
pub use tokens::{issue_share_token, ShareClaims, ShareTokenKeys, TokenError};
