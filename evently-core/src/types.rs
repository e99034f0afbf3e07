//! Core data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EventId = i64;
pub type UserId = i64;
pub type RsvpId = i64;

/// A schedulable item together with its RSVP policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    /// `None` means unlimited
    pub capacity: Option<u32>,
    pub is_public: bool,
    pub requires_admin: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating an event
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    pub is_public: bool,
    pub requires_admin: bool,
    pub created_by: Option<UserId>,
}

impl NewEvent {
    /// Public, admin-free, unlimited event with the given title and date
    pub fn new(title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            date,
            location: None,
            capacity: None,
            is_public: true,
            requires_admin: false,
            created_by: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.requires_admin = true;
        self
    }

    pub fn created_by(mut self, user_id: UserId) -> Self {
        self.created_by = Some(user_id);
        self
    }
}

/// One identity's attendance declaration for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub id: RsvpId,
    pub event_id: EventId,
    /// Absent for anonymous RSVPs
    pub user_id: Option<UserId>,
    pub attending: bool,
    pub created_at: DateTime<Utc>,
}

/// A record that has been admitted but not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewRsvp {
    pub event_id: EventId,
    pub user_id: Option<UserId>,
    pub attending: bool,
}

/// An event and the RSVP records it held when it was read
#[derive(Debug, Clone)]
pub struct EventSnapshot {
    pub event: Event,
    pub rsvps: Vec<RsvpRecord>,
}

impl EventSnapshot {
    pub fn new(event: Event, rsvps: Vec<RsvpRecord>) -> Self {
        Self { event, rsvps }
    }

    /// Number of records currently declaring attendance
    pub fn attending_count(&self) -> usize {
        self.rsvps.iter().filter(|r| r.attending).count()
    }

    /// Existing record for an authenticated identity
    pub fn record_for(&self, user_id: UserId) -> Option<&RsvpRecord> {
        self.rsvps.iter().find(|r| r.user_id == Some(user_id))
    }

    /// User ids of authenticated records that are attending
    pub fn attendees(&self) -> Vec<UserId> {
        self.rsvps
            .iter()
            .filter(|r| r.attending)
            .filter_map(|r| r.user_id)
            .collect()
    }
}

/// Who is submitting a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requester {
    Anonymous,
    Authenticated { user_id: UserId, is_admin: bool },
}

impl Requester {
    pub fn user(user_id: UserId) -> Self {
        Self::Authenticated {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self::Authenticated {
            user_id,
            is_admin: true,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Requester::Anonymous => None,
            Requester::Authenticated { user_id, .. } => Some(*user_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Requester::Authenticated { is_admin: true, .. })
    }
}

/// What the requester wants to declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpIntent {
    #[serde(default = "default_attending")]
    pub attending: bool,
}

fn default_attending() -> bool {
    true
}

impl Default for RsvpIntent {
    fn default() -> Self {
        Self { attending: true }
    }
}

impl RsvpIntent {
    pub fn attending() -> Self {
        Self { attending: true }
    }

    pub fn declining() -> Self {
        Self { attending: false }
    }
}

/// Result of an accepted RSVP submission
#[derive(Debug, Clone, PartialEq)]
pub enum RsvpOutcome {
    Created(RsvpRecord),
    Updated(RsvpRecord),
}

impl RsvpOutcome {
    pub fn record(&self) -> &RsvpRecord {
        match self {
            RsvpOutcome::Created(record) | RsvpOutcome::Updated(record) => record,
        }
    }

    pub fn into_record(self) -> RsvpRecord {
        match self {
            RsvpOutcome::Created(record) | RsvpOutcome::Updated(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, RsvpOutcome::Created(_))
    }
}

/// Attendance counts for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpStats {
    pub attending: usize,
    pub not_attending: usize,
    pub total: usize,
}

/// All records of an event with their aggregate counts
#[derive(Debug, Clone)]
pub struct RsvpSummary {
    pub snapshot: EventSnapshot,
    pub stats: RsvpStats,
}

impl From<EventSnapshot> for RsvpSummary {
    fn from(snapshot: EventSnapshot) -> Self {
        let attending = snapshot.attending_count();
        let total = snapshot.rsvps.len();
        Self {
            stats: RsvpStats {
                attending,
                not_attending: total - attending,
                total,
            },
            snapshot,
        }
    }
}

/// Registered account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Account fields supplied at registration; the password is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: RsvpId, user_id: Option<UserId>, attending: bool) -> RsvpRecord {
        RsvpRecord {
            id,
            event_id: 1,
            user_id,
            attending,
            created_at: Utc::now(),
        }
    }

    fn event() -> Event {
        Event {
            id: 1,
            title: "Meetup".to_string(),
            description: None,
            date: Utc::now(),
            location: None,
            capacity: None,
            is_public: true,
            requires_admin: false,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let snapshot = EventSnapshot::new(
            event(),
            vec![
                record(1, Some(10), true),
                record(2, None, true),
                record(3, Some(11), false),
            ],
        );

        let summary = RsvpSummary::from(snapshot);
        assert_eq!(summary.stats.attending, 2);
        assert_eq!(summary.stats.not_attending, 1);
        assert_eq!(summary.stats.total, 3);
        assert_eq!(summary.snapshot.attendees(), vec![10]);
    }

    #[test]
    fn test_intent_defaults_to_attending() {
        let intent: RsvpIntent = serde_json::from_str("{}").unwrap();
        assert!(intent.attending);

        let intent: RsvpIntent = serde_json::from_str(r#"{"attending": false}"#).unwrap();
        assert!(!intent.attending);
    }

    #[test]
    fn test_requester_accessors() {
        assert_eq!(Requester::Anonymous.user_id(), None);
        assert!(!Requester::Anonymous.is_admin());
        assert_eq!(Requester::user(5).user_id(), Some(5));
        assert!(!Requester::user(5).is_admin());
        assert!(Requester::admin(6).is_admin());
    }
}
