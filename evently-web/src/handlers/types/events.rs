//! Event-related types

use chrono::{DateTime, Utc};
use evently_core::{EventId, EventSnapshot, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Event creation request
///
/// Everything is optional at the wire level so missing fields produce the
/// API's own validation messages rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Rust meetup")]
    pub title: Option<String>,
    pub description: Option<String>,
    /// ISO 8601, with or without offset
    #[schema(example = "2024-01-15T18:00:00")]
    pub date: Option<String>,
    #[schema(example = "Community hall")]
    pub location: Option<String>,
    /// Omit for unlimited attendance
    #[schema(example = 50)]
    pub capacity: Option<i64>,
    #[schema(example = true)]
    pub is_public: Option<bool>,
    #[schema(example = false)]
    pub requires_admin: Option<bool>,
}

/// Event with its RSVP aggregates
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    #[schema(example = 1)]
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    pub is_public: bool,
    pub requires_admin: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    /// All RSVP records, attending or not
    pub rsvp_count: usize,
    /// User ids of authenticated attendees
    pub attendees: Vec<UserId>,
}

impl EventResponse {
    pub fn from_snapshot(snapshot: &EventSnapshot) -> Self {
        let event = &snapshot.event;
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
            capacity: event.capacity,
            is_public: event.is_public,
            requires_admin: event.requires_admin,
            created_by: event.created_by,
            created_at: event.created_at,
            rsvp_count: snapshot.rsvps.len(),
            attendees: snapshot.attendees(),
        }
    }
}
