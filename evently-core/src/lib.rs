//! Evently Core - domain types, RSVP admission policy and storage interfaces
//!
//! Everything here is independent of HTTP. The web crate resolves the
//! requester and the event, then hands both to [`RsvpService`].

pub mod admission;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod storage;
pub mod types;

pub use admission::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use service::*;
pub use storage::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
