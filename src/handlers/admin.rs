//! Admin endpoints: event CRUD, rosters and dashboard totals
//!
//! Authentication is handled upstream of this service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::handlers::extract::{ApiJson, ApiPath};
use crate::handlers::AppState;
use crate::models::{
    CreateEventRequest, Event, EventSummary, ParticipationStats, RosterRsvp, UpdateEventRequest, VolunteerSignup,
};
use crate::utils::errors::Result;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/:event_id", get(get_event).patch(update_event).delete(delete_event))
        .route("/events/:event_id/volunteers", get(event_volunteers))
        .route("/events/:event_id/rsvps", get(event_rsvps))
        .route("/stats", get(stats))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventSummary>>> {
    Ok(Json(state.services.reports.event_summaries().await?))
}

async fn create_event(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.services.events.create_event(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_event(State(state): State<AppState>, ApiPath(event_id): ApiPath<i64>) -> Result<Json<Event>> {
    Ok(Json(state.services.events.get_event(event_id).await?))
}

async fn update_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateEventRequest>,
) -> Result<Json<Event>> {
    Ok(Json(state.services.events.update_event(event_id, input).await?))
}

/// Soft delete
async fn delete_event(State(state): State<AppState>, ApiPath(event_id): ApiPath<i64>) -> Result<Json<Event>> {
    Ok(Json(state.services.events.cancel_event(event_id).await?))
}

async fn event_volunteers(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<Vec<VolunteerSignup>>> {
    Ok(Json(state.services.reports.event_volunteers(event_id).await?))
}

async fn event_rsvps(State(state): State<AppState>, ApiPath(event_id): ApiPath<i64>) -> Result<Json<Vec<RosterRsvp>>> {
    Ok(Json(state.services.reports.event_rsvps(event_id).await?))
}

async fn stats(State(state): State<AppState>) -> Result<Json<ParticipationStats>> {
    Ok(Json(state.services.reports.stats().await?))
}
