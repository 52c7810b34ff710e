use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{events, health_check, marks, subscriptions};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/events", post(events::get_events))
        .route(
            "/api/events/:event_id",
            get(events::get_event_by_id).delete(events::delete_event),
        )
        .route("/api/marks/likes/add/:event_id", post(marks::add_like))
        .route("/api/marks/likes/remove/:event_id", post(marks::remove_like))
        .route("/api/marks/dislikes/add/:event_id", post(marks::add_dislike))
        .route(
            "/api/marks/dislikes/remove/:event_id",
            post(marks::remove_dislike),
        )
        .route(
            "/api/subscriptions/subscribe/:event_id",
            post(subscriptions::subscribe),
        )
        .route(
            "/api/subscriptions/unsubscribe/:event_id",
            post(subscriptions::unsubscribe),
        )
        .route(
            "/api/subscriptions/count/:event_id",
            get(subscriptions::get_subscriptions_count),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
}
