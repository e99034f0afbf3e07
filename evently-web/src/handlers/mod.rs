//! HTTP request handlers for the Evently web server

pub mod events;
pub mod health;
pub mod rsvps;
pub mod types;

// Re-export all handler functions
pub use events::*;
pub use health::*;
pub use rsvps::*;

// Re-export all types for convenience
pub use types::*;
