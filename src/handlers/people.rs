//! Per-person participation views

use axum::extract::State;
use axum::Json;

use crate::handlers::extract::ApiPath;
use crate::handlers::AppState;
use crate::models::{EventRsvp, VolunteerSignup};
use crate::utils::errors::Result;

pub async fn volunteer_signups(
    State(state): State<AppState>,
    ApiPath(person_id): ApiPath<i64>,
) -> Result<Json<Vec<VolunteerSignup>>> {
    Ok(Json(state.services.reports.person_signups(person_id).await?))
}

pub async fn rsvps(State(state): State<AppState>, ApiPath(person_id): ApiPath<i64>) -> Result<Json<Vec<EventRsvp>>> {
    Ok(Json(state.services.reports.person_rsvps(person_id).await?))
}
