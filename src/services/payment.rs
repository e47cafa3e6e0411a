//! Payment outcome recording
//!
//! Payments are processed elsewhere; this service only records the result
//! against the RSVP. Payment state never affects RSVP or signup status.

use std::sync::Arc;

use crate::database::store::ParticipationStore;
use crate::models::{EventRsvp, PaymentStatus};
use crate::services::transaction::{run_with_retry, RetryPolicy};
use crate::utils::errors::{ParticipationError, Result};
use crate::utils::logging::{log_invariant_violation, log_payment_update};

#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn ParticipationStore>,
    retry: RetryPolicy,
}

impl PaymentService {
    pub fn new(store: Arc<dyn ParticipationStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Record a successful payment for a pending or previously failed RSVP
    pub async fn complete_payment(&self, rsvp_id: i64, amount_paid_cents: i64) -> Result<EventRsvp> {
        if amount_paid_cents < 0 {
            return Err(ParticipationError::InvalidInput("amount_paid_cents must not be negative".to_string()));
        }

        let rsvp = run_with_retry(&self.retry, "complete_payment", || {
            self.transition(rsvp_id, PaymentStatus::Completed, amount_paid_cents)
        })
        .await?;

        log_payment_update(rsvp_id, "completed", amount_paid_cents);
        Ok(rsvp)
    }

    /// Record a failed payment for a pending RSVP
    pub async fn fail_payment(&self, rsvp_id: i64) -> Result<EventRsvp> {
        let rsvp = run_with_retry(&self.retry, "fail_payment", || {
            self.transition(rsvp_id, PaymentStatus::Failed, 0)
        })
        .await?;

        log_payment_update(rsvp_id, "failed", 0);
        Ok(rsvp)
    }

    async fn transition(&self, rsvp_id: i64, next: PaymentStatus, amount_paid_cents: i64) -> Result<EventRsvp> {
        let mut tx = self.store.begin().await?;

        let rsvp = tx
            .lock_rsvp(rsvp_id)
            .await?
            .ok_or(ParticipationError::RsvpRecordNotFound { rsvp_id })?;

        if !rsvp.payment_status.can_transition_to(next) {
            return Err(ParticipationError::InvalidPaymentTransition {
                rsvp_id,
                from: rsvp.payment_status,
                to: next,
            });
        }

        let updated = match tx.update_rsvp_payment(rsvp_id, next, amount_paid_cents).await? {
            Some(updated) => updated,
            None => {
                let details = format!("locked RSVP {} disappeared during payment update", rsvp_id);
                log_invariant_violation(rsvp.event_id, Some(rsvp.person_id), &details);
                return Err(ParticipationError::InvariantViolation(details));
            }
        };

        tx.commit().await?;
        Ok(updated)
    }
}
