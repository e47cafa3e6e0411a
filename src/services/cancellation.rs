//! Cancellation coordination
//!
//! Cancelling an RSVP cascades to the volunteer signup for the same event.
//! Cancelling a volunteer signup never touches the RSVP.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::database::store::{ParticipationStore, StoreTransaction};
use crate::models::{EventRsvp, VolunteerSignup};
use crate::services::transaction::{run_with_retry, RetryPolicy};
use crate::utils::errors::{ParticipationError, Result};
use crate::utils::logging::{log_invariant_violation, log_participation_action, log_participation_rejected};

#[derive(Debug, Clone, Serialize)]
pub struct CancellationOutcome {
    /// The signup cancelled by this call, if any
    pub signup: Option<VolunteerSignup>,
    /// The RSVP cancelled by this call, or the one left in place when only
    /// the volunteer signup was cancelled
    pub rsvp: Option<EventRsvp>,
    pub volunteer_signup_cancelled: bool,
    pub message: String,
}

#[derive(Clone)]
pub struct CancellationCoordinator {
    store: Arc<dyn ParticipationStore>,
    retry: RetryPolicy,
}

impl CancellationCoordinator {
    pub fn new(store: Arc<dyn ParticipationStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Cancel a confirmed volunteer signup. The person stays registered to
    /// attend.
    pub async fn cancel_volunteer_signup(&self, person_id: i64, event_id: i64) -> Result<CancellationOutcome> {
        debug!(person_id = person_id, event_id = event_id, "Volunteer cancellation requested");

        let result = run_with_retry(&self.retry, "cancel_volunteer_signup", || {
            self.try_cancel_volunteer_signup(person_id, event_id)
        })
        .await;
        log_outcome(&result, person_id, event_id, "cancel_volunteer_signup");

        result
    }

    /// Cancel a confirmed RSVP together with any volunteer signup the person
    /// holds for the same event
    pub async fn cancel_rsvp(&self, person_id: i64, event_id: i64) -> Result<CancellationOutcome> {
        debug!(person_id = person_id, event_id = event_id, "RSVP cancellation requested");

        let result = run_with_retry(&self.retry, "cancel_rsvp", || self.try_cancel_rsvp(person_id, event_id)).await;
        log_outcome(&result, person_id, event_id, "cancel_rsvp");

        result
    }

    async fn try_cancel_volunteer_signup(&self, person_id: i64, event_id: i64) -> Result<CancellationOutcome> {
        let mut tx = self.store.begin().await?;
        // Cancelling stays possible after the event itself was cancelled.
        tx.lock_event(event_id).await?;

        let signup = tx
            .find_active_signup(person_id, event_id)
            .await?
            .ok_or(ParticipationError::SignupNotFound { person_id, event_id })?;

        let cancelled = cancel_locked_signup(tx.as_mut(), &signup).await?;

        let rsvp = tx.find_active_rsvp(person_id, event_id).await?;
        if rsvp.is_none() {
            return Err(ParticipationError::InvariantViolation(
                "confirmed volunteer signup had no confirmed RSVP".to_string(),
            ));
        }

        tx.commit().await?;

        Ok(CancellationOutcome {
            signup: Some(cancelled),
            rsvp,
            volunteer_signup_cancelled: true,
            message: "Your volunteer signup has been cancelled successfully. You remain registered to attend this event."
                .to_string(),
        })
    }

    async fn try_cancel_rsvp(&self, person_id: i64, event_id: i64) -> Result<CancellationOutcome> {
        let mut tx = self.store.begin().await?;
        tx.lock_event(event_id).await?;

        let rsvp = tx
            .find_active_rsvp(person_id, event_id)
            .await?
            .ok_or(ParticipationError::RsvpNotFound { person_id, event_id })?;

        let cancelled_rsvp = match tx.cancel_rsvp(rsvp.id).await? {
            Some(cancelled) => cancelled,
            None => {
                return Err(ParticipationError::InvariantViolation(format!(
                    "RSVP {} was confirmed but could not be cancelled",
                    rsvp.id
                )));
            }
        };

        let cancelled_signup = match tx.find_active_signup(person_id, event_id).await? {
            Some(signup) => Some(cancel_locked_signup(tx.as_mut(), &signup).await?),
            None => None,
        };

        tx.commit().await?;

        let volunteer_signup_cancelled = cancelled_signup.is_some();
        let message = if volunteer_signup_cancelled {
            "Your RSVP and volunteer signup have been cancelled successfully. You cannot volunteer for an event you're not attending."
        } else {
            "Your RSVP has been cancelled successfully. We hope to see you at future events!"
        };

        Ok(CancellationOutcome {
            signup: cancelled_signup,
            rsvp: Some(cancelled_rsvp),
            volunteer_signup_cancelled,
            message: message.to_string(),
        })
    }
}

async fn cancel_locked_signup(tx: &mut dyn StoreTransaction, signup: &VolunteerSignup) -> Result<VolunteerSignup> {
    match tx.cancel_signup(signup.id).await? {
        Some(cancelled) => Ok(cancelled),
        None => Err(ParticipationError::InvariantViolation(format!(
            "signup {} was confirmed but could not be cancelled",
            signup.id
        ))),
    }
}

fn log_outcome(result: &Result<CancellationOutcome>, person_id: i64, event_id: i64, action: &str) {
    match result {
        Ok(outcome) => {
            let details = outcome.volunteer_signup_cancelled.then_some("volunteer signup cancelled");
            log_participation_action(event_id, person_id, action, details);
        }
        Err(ParticipationError::InvariantViolation(details)) => {
            log_invariant_violation(event_id, Some(person_id), details)
        }
        Err(e) if e.is_domain() => log_participation_rejected(event_id, person_id, action, e.kind()),
        Err(_) => {}
    }
}
