//! Real-time Fan-out Module
//!
//! Delivers one frame to every live connection of a project except the
//! connection it came from.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! └── broadcast.rs - Frame fan-out over peer queues
//! ```
//!
//! # Delivery
//!
//! Each connection owns a bounded outbound queue drained by its own writer.
//! Fan-out never waits on a slow connection: when a queue is full or closed
//! the frame is dropped for that connection and logged, and every other
//! connection still receives it.

/// Frame fan-out utilities
pub mod broadcast;

pub use broadcast::broadcast_frame;
