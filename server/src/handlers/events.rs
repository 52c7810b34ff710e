use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue};
use axum::response::Response;
use serde_json::json;
use tracing::info;

use super::require_event;
use crate::filters::{map_filter_request, FilterEventsRequest};
use crate::pagination::{PageRequest, PaginationMetadata, PAGINATION_HEADER};
use crate::state::AppState;
use crate::utils::current_user::CurrentUser;
use crate::utils::error::{AppError, FieldErrors};
use crate::utils::extract::{EventId, PageParams};
use crate::utils::response::{success, success_with_header};

/// `POST /api/events`: one page of the events matching the filter body.
pub async fn get_events(
    State(state): State<AppState>,
    PageParams(query): PageParams,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = parse_filter_body(&body)?;
    let criteria = map_filter_request(&request)?;
    let page = PageRequest::from_query(query);

    let events = state
        .filter_service
        .filter_events(state.store.as_ref(), &criteria, page)
        .await?;

    let metadata = PaginationMetadata::new(page, events.total_count, state.page_links.as_ref());
    let header = serde_json::to_string(&metadata)
        .ok()
        .and_then(|json| HeaderValue::from_str(&json).ok())
        .ok_or_else(|| {
            AppError::InternalServerError("Could not encode pagination header".to_string())
        })?;

    Ok(success_with_header(
        events.items,
        "Events retrieved successfully",
        (HeaderName::from_static(PAGINATION_HEADER), header),
    ))
}

/// An absent or unreadable body is a bad request; a readable one with bad
/// values is left to the mapper.
fn parse_filter_body(body: &[u8]) -> Result<FilterEventsRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::ValidationError("Filter body is required".to_string()));
    }

    match serde_json::from_slice::<Option<FilterEventsRequest>>(body) {
        Ok(Some(request)) => Ok(request),
        Ok(None) => Err(AppError::ValidationError("Filter body is required".to_string())),
        Err(e) => Err(AppError::ValidationError(format!("Malformed filter body: {e}"))),
    }
}

/// `GET /api/events/:event_id`
pub async fn get_event_by_id(
    State(state): State<AppState>,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    if event_id.is_nil() {
        let mut errors = FieldErrors::new();
        errors.add("eventId", "eventId should not be empty");
        return Err(errors.into());
    }

    let event = require_event(&state, event_id).await?;
    Ok(success(event, "Event retrieved successfully"))
}

/// `DELETE /api/events/:event_id`, allowed to the event's owner only.
pub async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    let event = require_event(&state, event_id).await?;
    if event.owner_id != user.id {
        return Err(AppError::Forbidden(
            "Only the owner can delete this event".to_string(),
        ));
    }

    if !state.store.delete_event(event_id).await? {
        return Err(AppError::NotFound(format!(
            "Event with id '{}' was not found",
            event_id
        )));
    }
    info!(event_id = %event_id, user_id = %user.id, "Event deleted");

    Ok(success(json!({ "eventId": event_id }), "Event deleted successfully"))
}
