//! Event listing and creation handlers

use super::types::{CreateEventRequest, ErrorResponse, EventResponse};
use crate::{auth::AuthUser, AppState, WebResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use evently_core::{
    validation_error, EventId, EventSnapshot, EventStore, EventlyResult, NewEvent, RsvpStore,
};
use tracing::info;

const INVALID_DATE: &str = "Invalid date format. Use ISO 8601 format (e.g., 2024-01-15T18:00:00)";

/// Parse an ISO 8601 date; values without an offset are taken as UTC
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(date) = DateTime::parse_from_str(value, format) {
            return Some(date.with_timezone(&Utc));
        }
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// Validate a creation request into a new event owned by `created_by`
fn validate_event(request: CreateEventRequest, created_by: i64) -> EventlyResult<NewEvent> {
    let title = request
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| validation_error!("Title is required", "title", "events"))?;

    let date = request
        .date
        .filter(|date| !date.trim().is_empty())
        .ok_or_else(|| validation_error!("Date is required", "date", "events"))?;
    let date =
        parse_event_date(&date).ok_or_else(|| validation_error!(INVALID_DATE, "date", "events"))?;

    let capacity = request
        .capacity
        .map(|capacity| {
            u32::try_from(capacity)
                .ok()
                .filter(|capacity| *capacity >= 1)
                .ok_or_else(|| {
                    validation_error!("Capacity must be a positive integer", "capacity", "events")
                })
        })
        .transpose()?;

    Ok(NewEvent {
        title,
        description: request.description,
        date,
        location: request.location,
        capacity,
        is_public: request.is_public.unwrap_or(true),
        requires_admin: request.requires_admin.unwrap_or(false),
        created_by: Some(created_by),
    })
}

/// List all events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    summary = "List events",
    responses(
        (status = 200, description = "All events", body = Vec<EventResponse>)
    )
)]
pub async fn list_events(State(state): State<AppState>) -> WebResult<Json<Vec<EventResponse>>> {
    let events = state.store.list_events().await?;

    let mut responses = Vec::with_capacity(events.len());
    for event in events {
        let rsvps = state.store.list_rsvps(event.id).await?;
        responses.push(EventResponse::from_snapshot(&EventSnapshot::new(event, rsvps)));
    }

    Ok(Json(responses))
}

/// Get a single event
#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    tag = "Events",
    summary = "Get an event",
    params(("event_id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "The event", body = EventResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> WebResult<Json<EventResponse>> {
    let snapshot = state.rsvp_service.snapshot(event_id).await?;
    Ok(Json(EventResponse::from_snapshot(&snapshot)))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    summary = "Create an event",
    description = "Create an event owned by the caller. Dates are ISO 8601; capacity is optional.",
    request_body = CreateEventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    JsonExtractor(request): JsonExtractor<CreateEventRequest>,
) -> WebResult<(StatusCode, Json<EventResponse>)> {
    let new_event = validate_event(request, user.id)?;
    let event = state.store.create_event(new_event).await?;

    info!(event_id = event.id, user_id = user.id, "Created event: {}", event.title);
    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_snapshot(&EventSnapshot::new(
            event,
            Vec::new(),
        ))),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use evently_core::EventlyError;

    fn request(title: Option<&str>, date: Option<&str>) -> CreateEventRequest {
        CreateEventRequest {
            title: title.map(str::to_string),
            date: date.map(str::to_string),
            ..Default::default()
        }
    }

    fn validation_message(result: EventlyResult<NewEvent>) -> String {
        match result {
            Err(EventlyError::Validation { message, .. }) => message,
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_event_date_formats() {
        let naive = parse_event_date("2024-01-15T18:00:00").unwrap();
        assert_eq!((naive.year(), naive.month(), naive.day()), (2024, 1, 15));
        assert_eq!(naive.hour(), 18);

        assert_eq!(parse_event_date("2024-01-15T18:00:00Z"), Some(naive));
        assert_eq!(
            parse_event_date("2024-01-15T20:00:00+02:00"),
            Some(naive)
        );
        assert_eq!(parse_event_date("2024-01-15T18:00"), Some(naive));
        assert_eq!(
            parse_event_date("2024-01-15").map(|d| d.hour()),
            Some(0)
        );

        assert!(parse_event_date("next friday").is_none());
        assert!(parse_event_date("2024-13-45").is_none());
    }

    #[test]
    fn test_validate_event_requires_title_and_date() {
        assert_eq!(
            validation_message(validate_event(request(None, Some("2024-01-15")), 1)),
            "Title is required"
        );
        assert_eq!(
            validation_message(validate_event(request(Some("  "), Some("2024-01-15")), 1)),
            "Title is required"
        );
        assert_eq!(
            validation_message(validate_event(request(Some("Meetup"), None), 1)),
            "Date is required"
        );
        assert_eq!(
            validation_message(validate_event(request(Some("Meetup"), Some("soon")), 1)),
            INVALID_DATE
        );
    }

    #[test]
    fn test_validate_event_capacity_and_defaults() {
        let mut zero = request(Some("Meetup"), Some("2024-01-15T18:00:00"));
        zero.capacity = Some(0);
        assert_eq!(
            validation_message(validate_event(zero, 1)),
            "Capacity must be a positive integer"
        );

        let mut limited = request(Some("Meetup"), Some("2024-01-15T18:00:00"));
        limited.capacity = Some(25);
        let event = validate_event(limited, 7).unwrap();
        assert_eq!(event.capacity, Some(25));
        assert!(event.is_public);
        assert!(!event.requires_admin);
        assert_eq!(event.created_by, Some(7));
    }
}
