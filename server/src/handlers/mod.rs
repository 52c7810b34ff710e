use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Event;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod events;
pub mod marks;
pub mod subscriptions;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "eventnet-api",
    };

    success(payload, "Health check successful")
}

/// Loads an event for a handler that acts on it. The nil id is never a
/// valid event.
pub(crate) async fn require_event(state: &AppState, event_id: Uuid) -> Result<Event, AppError> {
    let not_found = || AppError::NotFound(format!("Event with id '{}' was not found", event_id));

    if event_id.is_nil() {
        return Err(not_found());
    }
    state.store.get_event(event_id).await?.ok_or_else(not_found)
}
