//! Storage interfaces and the in-memory backend
//!
//! The SQLite backend lives in `evently-web`; both implement the same traits
//! so the RSVP service never sees which one it is talking to.

use crate::error::EventlyResult;
use crate::types::*;
use crate::{conflict_error, not_found_error};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Event persistence
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, event: NewEvent) -> EventlyResult<Event>;

    async fn get_event(&self, id: EventId) -> EventlyResult<Option<Event>>;

    /// All events, oldest first
    async fn list_events(&self) -> EventlyResult<Vec<Event>>;
}

/// RSVP persistence
#[async_trait]
pub trait RsvpStore: Send + Sync {
    /// All records of an event in insertion order
    async fn list_rsvps(&self, event_id: EventId) -> EventlyResult<Vec<RsvpRecord>>;

    async fn find_rsvp(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> EventlyResult<Option<RsvpRecord>>;

    /// Insert a record. For authenticated identities an existing record for
    /// the same `(event_id, user_id)` is overwritten instead of duplicated.
    async fn insert_rsvp(&self, rsvp: NewRsvp) -> EventlyResult<RsvpRecord>;

    async fn set_attending(&self, id: RsvpId, attending: bool) -> EventlyResult<RsvpRecord>;
}

/// Account persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the username is taken
    async fn create_user(&self, user: NewUser) -> EventlyResult<User>;

    async fn find_user_by_id(&self, id: UserId) -> EventlyResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> EventlyResult<Option<User>>;
}

/// Everything the service needs from a backend
pub trait EventlyStore: EventStore + RsvpStore + UserStore {}

impl<T: EventStore + RsvpStore + UserStore> EventlyStore for T {}

#[derive(Debug, Default)]
struct MemoryTables {
    events: BTreeMap<EventId, Event>,
    rsvps: BTreeMap<RsvpId, RsvpRecord>,
    users: BTreeMap<UserId, User>,
    next_event_id: EventId,
    next_rsvp_id: RsvpId,
    next_user_id: UserId,
}

/// In-memory storage (for development and testing)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<MemoryTables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, event: NewEvent) -> EventlyResult<Event> {
        let mut tables = self.tables.write().await;
        tables.next_event_id += 1;
        let event = Event {
            id: tables.next_event_id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            capacity: event.capacity,
            is_public: event.is_public,
            requires_admin: event.requires_admin,
            created_by: event.created_by,
            created_at: Utc::now(),
        };
        tables.events.insert(event.id, event.clone());
        debug!(event_id = event.id, "Saved event to memory storage");
        Ok(event)
    }

    async fn get_event(&self, id: EventId) -> EventlyResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self) -> EventlyResult<Vec<Event>> {
        Ok(self.tables.read().await.events.values().cloned().collect())
    }
}

#[async_trait]
impl RsvpStore for MemoryStore {
    async fn list_rsvps(&self, event_id: EventId) -> EventlyResult<Vec<RsvpRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rsvps
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn find_rsvp(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> EventlyResult<Option<RsvpRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rsvps
            .values()
            .find(|r| r.event_id == event_id && r.user_id == Some(user_id))
            .cloned())
    }

    async fn insert_rsvp(&self, rsvp: NewRsvp) -> EventlyResult<RsvpRecord> {
        let mut tables = self.tables.write().await;

        if let Some(user_id) = rsvp.user_id {
            let existing = tables
                .rsvps
                .values_mut()
                .find(|r| r.event_id == rsvp.event_id && r.user_id == Some(user_id));
            if let Some(existing) = existing {
                existing.attending = rsvp.attending;
                return Ok(existing.clone());
            }
        }

        tables.next_rsvp_id += 1;
        let record = RsvpRecord {
            id: tables.next_rsvp_id,
            event_id: rsvp.event_id,
            user_id: rsvp.user_id,
            attending: rsvp.attending,
            created_at: Utc::now(),
        };
        tables.rsvps.insert(record.id, record.clone());
        Ok(record)
    }

    async fn set_attending(&self, id: RsvpId, attending: bool) -> EventlyResult<RsvpRecord> {
        let mut tables = self.tables.write().await;
        let record = tables
            .rsvps
            .get_mut(&id)
            .ok_or_else(|| not_found_error!(format!("rsvp {id}"), "memory_storage"))?;
        record.attending = attending;
        Ok(record.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> EventlyResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(conflict_error!("Username already exists", "memory_storage"));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: user.username,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: UserId) -> EventlyResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> EventlyResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}
