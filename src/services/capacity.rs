//! Capacity evaluation
//!
//! Remaining volunteer slots are always derived from the confirmed signup
//! rows; nothing here caches a counter. The pure functions are what the
//! coordinators call inside their transactions, the [`CapacityEvaluator`]
//! answers the same question for read-only callers.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::store::ParticipationStore;
use crate::models::Event;
use crate::utils::errors::{ParticipationError, Result};

/// `max(capacity - confirmed, 0)`
pub fn volunteer_spots_left(volunteer_capacity: i32, confirmed_signups: i64) -> i64 {
    (i64::from(volunteer_capacity) - confirmed_signups).max(0)
}

/// Only an event that takes volunteers can be full. Capacity 0 means
/// volunteering is disabled.
pub fn is_volunteer_full(volunteer_capacity: i32, confirmed_signups: i64) -> bool {
    volunteer_capacity > 0 && volunteer_spots_left(volunteer_capacity, confirmed_signups) == 0
}

/// Snapshot of an event's volunteer capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerCapacity {
    pub event_id: i64,
    pub volunteer_capacity: i32,
    pub confirmed_volunteers: i64,
    pub spots_left: i64,
    pub accepting_volunteers: bool,
    pub is_full: bool,
}

impl VolunteerCapacity {
    pub fn evaluate(event: &Event, confirmed_volunteers: i64) -> Self {
        Self {
            event_id: event.id,
            volunteer_capacity: event.volunteer_capacity,
            confirmed_volunteers,
            spots_left: volunteer_spots_left(event.volunteer_capacity, confirmed_volunteers),
            accepting_volunteers: event.accepts_volunteers(),
            is_full: is_volunteer_full(event.volunteer_capacity, confirmed_volunteers),
        }
    }
}

/// Read-only capacity queries against the store
#[derive(Clone)]
pub struct CapacityEvaluator {
    store: Arc<dyn ParticipationStore>,
}

impl CapacityEvaluator {
    pub fn new(store: Arc<dyn ParticipationStore>) -> Self {
        Self { store }
    }

    /// Capacity snapshot for an active event
    pub async fn volunteer_capacity(&self, event_id: i64) -> Result<VolunteerCapacity> {
        let mut tx = self.store.begin().await?;
        let event = tx
            .find_event(event_id)
            .await?
            .filter(Event::is_active)
            .ok_or(ParticipationError::EventNotFound { event_id })?;
        let confirmed = tx.count_confirmed_signups(event_id).await?;

        Ok(VolunteerCapacity::evaluate(&event, confirmed))
    }

    pub async fn volunteer_spots_left(&self, event_id: i64) -> Result<i64> {
        Ok(self.volunteer_capacity(event_id).await?.spots_left)
    }

    pub async fn is_volunteer_full(&self, event_id: i64) -> Result<bool> {
        Ok(self.volunteer_capacity(event_id).await?.is_full)
    }
}
