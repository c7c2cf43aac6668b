//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - A real server on an ephemeral port backed by the in-memory store
//! - Websocket client helpers
//! - Share token helpers
//! - Frame assertions

pub mod auth_helpers;
pub mod server;

// Re-export commonly used utilities
pub use assertions::*;
pub use auth_helpers::*;
pub use server::*;
