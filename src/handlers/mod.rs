//! HTTP handlers
//!
//! Thin axum layer over the services. Handlers parse the request, call one
//! service operation and serialize its outcome; every failure is rendered by
//! `ParticipationError`'s `IntoResponse`.

pub mod admin;
pub mod extract;
pub mod participation;
pub mod people;

use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};

use crate::middleware::log_requests;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
}

impl AppState {
    pub fn new(services: ServiceFactory) -> Self {
        Self { services }
    }
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/events", get(participation::list_events))
        .route("/events/:event_id/capacity", get(participation::event_capacity))
        .route("/events/:event_id/volunteers", post(participation::volunteer_sign_up))
        .route(
            "/events/:event_id/volunteers/:person_id",
            delete(participation::cancel_volunteer_signup),
        )
        .route("/events/:event_id/rsvps", post(participation::event_rsvp))
        .route("/events/:event_id/rsvps/:person_id", delete(participation::cancel_rsvp))
        .route("/rsvps/:rsvp_id/payment", post(participation::record_payment))
        .route("/people/:person_id/volunteer-signups", get(people::volunteer_signups))
        .route("/people/:person_id/rsvps", get(people::rsvps))
        .nest("/admin", admin::admin_router())
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    state.services.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
