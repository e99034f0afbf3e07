//! RSVP handlers

use super::types::{ErrorResponse, EventRsvpsResponse, RsvpRequest, RsvpResponse};
use crate::{auth::ResolvedRequester, AppState, WebError, WebResult};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use evently_core::{EventId, RsvpIntent};

/// Decode an optional JSON body; empty and `null` bodies mean the default intent
fn parse_intent(body: &[u8]) -> WebResult<RsvpIntent> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RsvpIntent::default());
    }

    serde_json::from_slice::<Option<RsvpRequest>>(body)
        .map(|request| request.map(RsvpIntent::from).unwrap_or_default())
        .map_err(|e| WebError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// RSVP to an event
///
/// Anonymous callers may RSVP to public, non-admin events. Authenticated
/// callers hold at most one record per event; repeating the call updates it.
#[utoipa::path(
    post,
    path = "/api/rsvps/event/{event_id}",
    tag = "RSVPs",
    summary = "RSVP to an event",
    params(("event_id" = i64, Path, description = "Event id")),
    request_body(content = RsvpRequest, description = "Optional; defaults to attending"),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 201, description = "RSVP created", body = RsvpResponse),
        (status = 200, description = "Existing RSVP updated", body = RsvpResponse),
        (status = 400, description = "Event is at full capacity", body = ErrorResponse),
        (status = 401, description = "Authentication required for this event", body = ErrorResponse),
        (status = 403, description = "Admin access required for this event", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
    ResolvedRequester(requester): ResolvedRequester,
    body: Bytes,
) -> WebResult<(StatusCode, Json<RsvpResponse>)> {
    let intent = parse_intent(&body)?;

    let outcome = state
        .rsvp_service
        .submit(event_id, requester, intent)
        .await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(RsvpResponse::from(outcome.record()))))
}

/// List the RSVPs of an event
#[utoipa::path(
    get,
    path = "/api/rsvps/event/{event_id}",
    tag = "RSVPs",
    summary = "Get RSVPs for an event",
    params(("event_id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event, records and counts", body = EventRsvpsResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn get_event_rsvps(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> WebResult<Json<EventRsvpsResponse>> {
    let summary = state.rsvp_service.summary(event_id).await?;
    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intent() {
        assert_eq!(parse_intent(b"").unwrap(), RsvpIntent::attending());
        assert_eq!(parse_intent(b"  \n").unwrap(), RsvpIntent::attending());
        assert_eq!(parse_intent(b"null").unwrap(), RsvpIntent::attending());
        assert_eq!(parse_intent(b"{}").unwrap(), RsvpIntent::attending());
        assert_eq!(
            parse_intent(br#"{"attending": false}"#).unwrap(),
            RsvpIntent::declining()
        );
        assert!(matches!(
            parse_intent(b"{not json"),
            Err(WebError::BadRequest(_))
        ));
    }
}
