//! Volunteer signup and direct RSVP coordination
//!
//! Both operations lock the event row first, so every check below sees the
//! committed state of that event and nothing else can change it until the
//! transaction ends.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::database::store::{ParticipationStore, StoreTransaction};
use crate::models::{Event, EventRsvp, NewRsvp, VolunteerSignup};
use crate::services::capacity::{is_volunteer_full, volunteer_spots_left};
use crate::services::transaction::{run_with_retry, RetryPolicy};
use crate::utils::errors::{ParticipationError, Result};
use crate::utils::helpers::format_cents;
use crate::utils::logging::{log_invariant_violation, log_participation_action, log_participation_rejected};

#[derive(Debug, Clone, Serialize)]
pub struct SignupOutcome {
    pub signup: VolunteerSignup,
    pub rsvp: EventRsvp,
    /// False when the person already held an RSVP for the event
    pub rsvp_auto_created: bool,
    pub volunteer_spots_left: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RsvpOutcome {
    pub rsvp: EventRsvp,
    pub payment_required: bool,
    pub amount_due_cents: i64,
    pub message: String,
}

/// Creates volunteer signups and RSVPs
#[derive(Clone)]
pub struct SignupCoordinator {
    store: Arc<dyn ParticipationStore>,
    retry: RetryPolicy,
}

impl SignupCoordinator {
    pub fn new(store: Arc<dyn ParticipationStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Sign a person up to volunteer, creating their RSVP in the same
    /// transaction when they do not already hold one
    pub async fn volunteer_sign_up(&self, person_id: i64, event_id: i64) -> Result<SignupOutcome> {
        debug!(person_id = person_id, event_id = event_id, "Volunteer signup requested");

        let result = run_with_retry(&self.retry, "volunteer_sign_up", || {
            self.try_volunteer_sign_up(person_id, event_id)
        })
        .await;

        match &result {
            Ok(outcome) => {
                let details = if outcome.rsvp_auto_created { "rsvp auto-created" } else { "existing rsvp kept" };
                log_participation_action(event_id, person_id, "volunteer_sign_up", Some(details));
            }
            Err(ParticipationError::InvariantViolation(details)) => {
                log_invariant_violation(event_id, Some(person_id), details)
            }
            Err(e) if e.is_domain() => log_participation_rejected(event_id, person_id, "volunteer_sign_up", e.kind()),
            Err(_) => {}
        }

        result
    }

    /// RSVP directly to an event
    pub async fn event_rsvp(&self, person_id: i64, event_id: i64) -> Result<RsvpOutcome> {
        debug!(person_id = person_id, event_id = event_id, "RSVP requested");

        let result = run_with_retry(&self.retry, "event_rsvp", || self.try_event_rsvp(person_id, event_id)).await;

        match &result {
            Ok(outcome) => {
                let details = outcome.payment_required.then_some("payment pending");
                log_participation_action(event_id, person_id, "event_rsvp", details);
            }
            Err(ParticipationError::InvariantViolation(details)) => {
                log_invariant_violation(event_id, Some(person_id), details)
            }
            Err(e) if e.is_domain() => log_participation_rejected(event_id, person_id, "event_rsvp", e.kind()),
            Err(_) => {}
        }

        result
    }

    async fn try_volunteer_sign_up(&self, person_id: i64, event_id: i64) -> Result<SignupOutcome> {
        let mut tx = self.store.begin().await?;
        let event = lock_active_event(tx.as_mut(), event_id).await?;

        if !event.accepts_volunteers() {
            return Err(ParticipationError::EventNotAcceptingVolunteers { event_id });
        }

        let confirmed = tx.count_confirmed_signups(event_id).await?;
        if confirmed > i64::from(event.volunteer_capacity) {
            let details = format!(
                "{} confirmed signups exceed volunteer capacity {}",
                confirmed, event.volunteer_capacity
            );
            return Err(ParticipationError::InvariantViolation(details));
        }
        if is_volunteer_full(event.volunteer_capacity, confirmed) {
            return Err(ParticipationError::EventFull { event_id, capacity: event.volunteer_capacity });
        }

        if tx.find_active_signup(person_id, event_id).await?.is_some() {
            return Err(ParticipationError::AlreadySignedUp { person_id, event_id });
        }

        let signup = tx.insert_signup(person_id, event_id).await.map_err(|e| match e {
            ParticipationError::DuplicateSignup { person_id, event_id } => {
                warn!(person_id = person_id, event_id = event_id, "Signup uniqueness rejected a concurrent insert");
                ParticipationError::AlreadySignedUp { person_id, event_id }
            }
            other => other,
        })?;

        let (rsvp, rsvp_auto_created) = match tx.find_active_rsvp(person_id, event_id).await? {
            Some(existing) => (existing, false),
            None => (tx.insert_rsvp(NewRsvp::auto_derived(person_id, event_id)).await?, true),
        };

        tx.commit().await?;

        let message = if rsvp_auto_created {
            "Successfully signed up to volunteer! You've been automatically added to the event attendance."
        } else {
            "Successfully signed up to volunteer!"
        };

        Ok(SignupOutcome {
            signup,
            rsvp,
            rsvp_auto_created,
            volunteer_spots_left: volunteer_spots_left(event.volunteer_capacity, confirmed + 1),
            message: message.to_string(),
        })
    }

    async fn try_event_rsvp(&self, person_id: i64, event_id: i64) -> Result<RsvpOutcome> {
        let mut tx = self.store.begin().await?;
        let event = lock_active_event(tx.as_mut(), event_id).await?;

        if tx.find_active_rsvp(person_id, event_id).await?.is_some() {
            return Err(ParticipationError::AlreadyRsvped { person_id, event_id });
        }

        let rsvp = tx
            .insert_rsvp(NewRsvp::direct(person_id, event_id, event.price_cents))
            .await
            .map_err(|e| match e {
                ParticipationError::DuplicateRsvp { person_id, event_id } => {
                    warn!(person_id = person_id, event_id = event_id, "RSVP uniqueness rejected a concurrent insert");
                    ParticipationError::AlreadyRsvped { person_id, event_id }
                }
                other => other,
            })?;

        tx.commit().await?;

        let payment_required = !event.is_free();
        let message = if payment_required {
            format!(
                "RSVP successful! Payment of {} is required to confirm your attendance.",
                format_cents(event.price_cents)
            )
        } else {
            "RSVP successful! We look forward to seeing you at the event.".to_string()
        };

        Ok(RsvpOutcome {
            rsvp,
            payment_required,
            amount_due_cents: event.price_cents,
            message,
        })
    }
}

/// Lock the event and require it to be active. Cancelled events are
/// reported the same way as missing ones.
async fn lock_active_event(tx: &mut dyn StoreTransaction, event_id: i64) -> Result<Event> {
    tx.lock_event(event_id)
        .await?
        .filter(Event::is_active)
        .ok_or(ParticipationError::EventNotFound { event_id })
}
