//! Participation endpoints: volunteering, RSVPs, capacity and payments

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::handlers::extract::{ApiJson, ApiPath};
use crate::handlers::AppState;
use crate::models::{EventRsvp, EventSummary};
use crate::services::{CancellationOutcome, RsvpOutcome, SignupOutcome, VolunteerCapacity};
use crate::utils::errors::Result;

/// Body for volunteer signup and RSVP requests. The person id comes from a
/// trusted upstream layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParticipantRequest {
    pub person_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentOutcomeRequest {
    pub outcome: PaymentOutcome,
    #[serde(default)]
    pub amount_cents: i64,
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventSummary>>> {
    Ok(Json(state.services.reports.event_summaries().await?))
}

pub async fn event_capacity(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<VolunteerCapacity>> {
    Ok(Json(state.services.capacity.volunteer_capacity(event_id).await?))
}

pub async fn volunteer_sign_up(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i64>,
    ApiJson(input): ApiJson<ParticipantRequest>,
) -> Result<(StatusCode, Json<SignupOutcome>)> {
    let outcome = state.services.signups.volunteer_sign_up(input.person_id, event_id).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn cancel_volunteer_signup(
    State(state): State<AppState>,
    ApiPath((event_id, person_id)): ApiPath<(i64, i64)>,
) -> Result<Json<CancellationOutcome>> {
    let outcome = state
        .services
        .cancellations
        .cancel_volunteer_signup(person_id, event_id)
        .await?;
    Ok(Json(outcome))
}

pub async fn event_rsvp(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i64>,
    ApiJson(input): ApiJson<ParticipantRequest>,
) -> Result<(StatusCode, Json<RsvpOutcome>)> {
    let outcome = state.services.signups.event_rsvp(input.person_id, event_id).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn cancel_rsvp(
    State(state): State<AppState>,
    ApiPath((event_id, person_id)): ApiPath<(i64, i64)>,
) -> Result<Json<CancellationOutcome>> {
    let outcome = state.services.cancellations.cancel_rsvp(person_id, event_id).await?;
    Ok(Json(outcome))
}

/// Payment side channel callback
pub async fn record_payment(
    State(state): State<AppState>,
    ApiPath(rsvp_id): ApiPath<i64>,
    ApiJson(input): ApiJson<PaymentOutcomeRequest>,
) -> Result<Json<EventRsvp>> {
    let payments = &state.services.payments;
    let rsvp = match input.outcome {
        PaymentOutcome::Completed => payments.complete_payment(rsvp_id, input.amount_cents).await?,
        PaymentOutcome::Failed => payments.fail_payment(rsvp_id).await?,
    };
    Ok(Json(rsvp))
}
