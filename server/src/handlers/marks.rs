use axum::extract::State;
use axum::response::Response;
use tracing::debug;
use uuid::Uuid;

use super::require_event;
use crate::models::MarkKind;
use crate::state::AppState;
use crate::utils::current_user::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::extract::EventId;
use crate::utils::response::success;

pub async fn add_like(
    State(state): State<AppState>,
    user: CurrentUser,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    add_mark(&state, user, event_id, MarkKind::Like).await
}

pub async fn remove_like(
    State(state): State<AppState>,
    user: CurrentUser,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    remove_mark(&state, user, event_id, MarkKind::Like).await
}

pub async fn add_dislike(
    State(state): State<AppState>,
    user: CurrentUser,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    add_mark(&state, user, event_id, MarkKind::Dislike).await
}

pub async fn remove_dislike(
    State(state): State<AppState>,
    user: CurrentUser,
    EventId(event_id): EventId,
) -> Result<Response, AppError> {
    remove_mark(&state, user, event_id, MarkKind::Dislike).await
}

async fn add_mark(
    state: &AppState,
    user: CurrentUser,
    event_id: Uuid,
    kind: MarkKind,
) -> Result<Response, AppError> {
    require_event(state, event_id).await?;
    state.store.mark_event(event_id, user.id, kind).await?;
    debug!(event_id = %event_id, user_id = %user.id, ?kind, "Mark added");

    let counts = state.store.count_marks(event_id).await?;
    Ok(success(counts, "Marks updated"))
}

async fn remove_mark(
    state: &AppState,
    user: CurrentUser,
    event_id: Uuid,
    kind: MarkKind,
) -> Result<Response, AppError> {
    require_event(state, event_id).await?;
    state.store.remove_mark(event_id, user.id, kind).await?;
    debug!(event_id = %event_id, user_id = %user.id, ?kind, "Mark removed");

    let counts = state.store.count_marks(event_id).await?;
    Ok(success(counts, "Marks updated"))
}
