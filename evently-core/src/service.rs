//! RSVP submission service
//!
//! Reads an event snapshot from the injected store, runs the admission
//! policy, and commits exactly one write. Submissions are serialized so two
//! concurrent requests for the same identity cannot both observe "no record"
//! and both insert; the SQLite backend additionally enforces this with a
//! unique index.

use crate::admission::{decide, Admission};
use crate::error::{EventlyError, EventlyResult};
use crate::not_found_error;
use crate::storage::EventlyStore;
use crate::types::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct RsvpService {
    store: Arc<dyn EventlyStore>,
    submissions: Arc<Mutex<()>>,
}

impl RsvpService {
    pub fn new(store: Arc<dyn EventlyStore>) -> Self {
        Self {
            store,
            submissions: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Arc<dyn EventlyStore> {
        &self.store
    }

    /// Load an event together with its current RSVP records
    pub async fn snapshot(&self, event_id: EventId) -> EventlyResult<EventSnapshot> {
        let event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or_else(|| not_found_error!(format!("event {event_id}"), "rsvp_service"))?;
        let rsvps = self.store.list_rsvps(event_id).await?;
        Ok(EventSnapshot::new(event, rsvps))
    }

    /// Submit an RSVP on behalf of a resolved requester
    #[instrument(skip(self), fields(user_id = ?requester.user_id()))]
    pub async fn submit(
        &self,
        event_id: EventId,
        requester: Requester,
        intent: RsvpIntent,
    ) -> EventlyResult<RsvpOutcome> {
        let _guard = self.submissions.lock().await;

        let snapshot = self.snapshot(event_id).await?;

        let admission = decide(&snapshot, &requester, intent).map_err(|reason| {
            info!(event_id, reason = %reason, "RSVP rejected");
            EventlyError::from(reason)
        })?;

        let outcome = match admission {
            Admission::Update(record) => {
                let record = self
                    .store
                    .set_attending(record.id, record.attending)
                    .await?;
                RsvpOutcome::Updated(record)
            }
            Admission::Create(rsvp) => RsvpOutcome::Created(self.store.insert_rsvp(rsvp).await?),
        };

        info!(
            event_id,
            rsvp_id = outcome.record().id,
            created = outcome.is_created(),
            "RSVP recorded"
        );
        Ok(outcome)
    }

    /// All records of an event with attendance counts
    pub async fn summary(&self, event_id: EventId) -> EventlyResult<RsvpSummary> {
        Ok(self.snapshot(event_id).await?.into())
    }
}
