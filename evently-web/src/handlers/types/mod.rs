//! Type definitions for handlers
//!
//! Request and response bodies of the HTTP API.

pub mod common;
pub mod events;
pub mod rsvps;

// Re-export all types for convenience
pub use common::*;
pub use events::*;
pub use rsvps::*;
