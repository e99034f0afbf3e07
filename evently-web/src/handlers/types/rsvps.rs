//! RSVP-related types

use super::EventResponse;
use chrono::{DateTime, Utc};
use evently_core::{EventId, RsvpId, RsvpIntent, RsvpRecord, RsvpStats, RsvpSummary, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RSVP submission body; an empty body means attending
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RsvpRequest {
    #[schema(example = true)]
    pub attending: Option<bool>,
}

impl From<RsvpRequest> for RsvpIntent {
    fn from(request: RsvpRequest) -> Self {
        request
            .attending
            .map(|attending| RsvpIntent { attending })
            .unwrap_or_default()
    }
}

/// A stored RSVP record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RsvpResponse {
    #[schema(example = 1)]
    pub id: RsvpId,
    #[schema(example = 1)]
    pub event_id: EventId,
    /// Absent for anonymous RSVPs
    pub user_id: Option<UserId>,
    pub attending: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&RsvpRecord> for RsvpResponse {
    fn from(record: &RsvpRecord) -> Self {
        Self {
            id: record.id,
            event_id: record.event_id,
            user_id: record.user_id,
            attending: record.attending,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RsvpStatsResponse {
    pub attending: usize,
    pub not_attending: usize,
    pub total: usize,
}

impl From<RsvpStats> for RsvpStatsResponse {
    fn from(stats: RsvpStats) -> Self {
        Self {
            attending: stats.attending,
            not_attending: stats.not_attending,
            total: stats.total,
        }
    }
}

/// All RSVPs of one event
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventRsvpsResponse {
    pub event: EventResponse,
    pub rsvps: Vec<RsvpResponse>,
    pub stats: RsvpStatsResponse,
}

impl From<RsvpSummary> for EventRsvpsResponse {
    fn from(summary: RsvpSummary) -> Self {
        Self {
            event: EventResponse::from_snapshot(&summary.snapshot),
            rsvps: summary.snapshot.rsvps.iter().map(RsvpResponse::from).collect(),
            stats: summary.stats.into(),
        }
    }
}
