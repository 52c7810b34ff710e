use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::require_event;
use crate::models::SubscriptionsCount;
use crate::state::AppState;
use crate::utils::current_user::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::extract::EventId;
use crate::utils::response::success;

pub async fn subscribe(
    State(state): State<AppState>,
    user: CurrentUser,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    require_running_event(&state, event_id).await?;

    state.store.subscribe(event_id, user.id, Utc::now()).await?;
    debug!(event_id = %event_id, user_id = %user.id, "Subscribed");

    subscriptions_count(&state, event_id).await
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    user: CurrentUser,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    require_running_event(&state, event_id).await?;

    state.store.unsubscribe(event_id, user.id).await?;
    debug!(event_id = %event_id, user_id = %user.id, "Unsubscribed");

    subscriptions_count(&state, event_id).await
}

pub async fn get_subscriptions_count(
    State(state): State<AppState>,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    require_event(&state, event_id).await?;
    subscriptions_count(&state, event_id).await
}

async fn require_running_event(state: &AppState, event_id: Uuid) -> Result<(), AppError> {
    let event = require_event(state, event_id).await?;
    if event.has_ended(Utc::now()) {
        return Err(AppError::Conflict("Event has already ended".to_string()));
    }
    Ok(())
}

async fn subscriptions_count(state: &AppState, event_id: Uuid) -> Result<Response, AppError> {
    let count = state.store.count_subscriptions(event_id).await?;
    Ok(success(
        SubscriptionsCount {
            event_id,
            subscriptions_count: count,
        },
        "Subscriptions counted",
    ))
}
