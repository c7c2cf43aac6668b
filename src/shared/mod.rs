//! Shared Module
//!
//! Platform-agnostic types for the collaboration channel: the element model,
//! project documents with their tree operations, and the command codec.
//! Nothing in here performs I/O, so every type can be exercised directly in
//! unit and property tests.

/// Element model (ids, attribute values, patches)
pub mod element;

/// Project documents and element-tree operations
pub mod document;

/// Client command decoding and rejection frames
pub mod command;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use element::{AttrValue, Element, ElementId, ElementPatch};
pub use document::Document;
pub use command::{Command, Rejection, RejectionKind};
pub use error::{CommandError, SharedError};
