//! RSVP admission policy
//!
//! Decides whether a requester may RSVP to an event and whether the
//! submission creates a new record or overwrites an existing one. Checks run
//! in a fixed order and the first failure wins:
//!
//! 1. private event, anonymous caller
//! 2. admin-only event, anonymous or non-admin caller
//! 3. capacity reached (counted before the intent is looked at)
//! 4. identity lookup for authenticated callers

use crate::types::{EventSnapshot, NewRsvp, Requester, RsvpIntent, RsvpRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Reasons an RSVP is refused, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AdmissionError {
    #[error("Authentication required for this event")]
    AuthenticationRequired,

    #[error("Admin access required for this event")]
    AdminRequired,

    #[error("Event is at full capacity")]
    CapacityExceeded { capacity: u32, attending: usize },
}

/// The single write an accepted RSVP results in
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Create(NewRsvp),
    /// Existing record with `attending` already overwritten
    Update(RsvpRecord),
}

/// Evaluate an RSVP submission against an event snapshot
pub fn decide(
    snapshot: &EventSnapshot,
    requester: &Requester,
    intent: RsvpIntent,
) -> Result<Admission, AdmissionError> {
    let event = &snapshot.event;

    if !event.is_public && *requester == Requester::Anonymous {
        return Err(AdmissionError::AuthenticationRequired);
    }

    if event.requires_admin {
        match requester {
            Requester::Anonymous => return Err(AdmissionError::AuthenticationRequired),
            Requester::Authenticated { is_admin: false, .. } => {
                return Err(AdmissionError::AdminRequired)
            }
            Requester::Authenticated { is_admin: true, .. } => {}
        }
    }

    if let Some(capacity) = event.capacity {
        let attending = snapshot.attending_count();
        if attending >= capacity as usize {
            return Err(AdmissionError::CapacityExceeded {
                capacity,
                attending,
            });
        }
    }

    let existing = requester.user_id().and_then(|id| snapshot.record_for(id));

    let admission = match existing {
        Some(record) => Admission::Update(RsvpRecord {
            attending: intent.attending,
            ..record.clone()
        }),
        None => Admission::Create(NewRsvp {
            event_id: event.id,
            user_id: requester.user_id(),
            attending: intent.attending,
        }),
    };

    debug!(
        event_id = event.id,
        user_id = ?requester.user_id(),
        attending = intent.attending,
        update = matches!(admission, Admission::Update(_)),
        "RSVP admitted"
    );

    Ok(admission)
}
