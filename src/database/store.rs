//! Participation store abstraction
//!
//! Every coordinator call runs inside one [`StoreTransaction`]. Dropping a
//! transaction without calling [`StoreTransaction::commit`] discards all of
//! its writes, so a failure at any step leaves storage untouched.

use async_trait::async_trait;

use crate::models::{
    CreateEventRequest, Event, EventRsvp, EventStatus, NewRsvp, ParticipationStats, PaymentStatus,
    UpdateEventRequest, VolunteerSignup,
};
use crate::utils::errors::Result;

/// Durable, constraint-checked storage for events, signups and RSVPs
#[async_trait]
pub trait ParticipationStore: Send + Sync {
    /// Open a new transaction
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Operations available inside a single store transaction
#[async_trait]
pub trait StoreTransaction: Send {
    /// Load an event regardless of status and hold a lock on it until the
    /// transaction ends. Serializes all participation changes per event.
    async fn lock_event(&mut self, event_id: i64) -> Result<Option<Event>>;

    async fn find_event(&mut self, event_id: i64) -> Result<Option<Event>>;

    async fn insert_event(&mut self, request: &CreateEventRequest) -> Result<Event>;

    async fn update_event(&mut self, event_id: i64, request: &UpdateEventRequest) -> Result<Option<Event>>;

    async fn set_event_status(&mut self, event_id: i64, status: EventStatus) -> Result<Option<Event>>;

    /// Active events ordered by date and time
    async fn list_active_events(&mut self) -> Result<Vec<Event>>;

    /// The confirmed signup for a pair, if any
    async fn find_active_signup(&mut self, person_id: i64, event_id: i64) -> Result<Option<VolunteerSignup>>;

    /// Insert a confirmed signup. Fails with `DuplicateSignup` when the pair
    /// already holds one.
    async fn insert_signup(&mut self, person_id: i64, event_id: i64) -> Result<VolunteerSignup>;

    /// Mark a confirmed signup cancelled. `None` if it is not confirmed.
    async fn cancel_signup(&mut self, signup_id: i64) -> Result<Option<VolunteerSignup>>;

    async fn count_confirmed_signups(&mut self, event_id: i64) -> Result<i64>;

    async fn list_event_signups(&mut self, event_id: i64) -> Result<Vec<VolunteerSignup>>;

    async fn list_person_signups(&mut self, person_id: i64) -> Result<Vec<VolunteerSignup>>;

    /// The confirmed RSVP for a pair, if any
    async fn find_active_rsvp(&mut self, person_id: i64, event_id: i64) -> Result<Option<EventRsvp>>;

    /// Load an RSVP by id and hold a lock on it until the transaction ends
    async fn lock_rsvp(&mut self, rsvp_id: i64) -> Result<Option<EventRsvp>>;

    /// Insert a confirmed RSVP. Fails with `DuplicateRsvp` when the pair
    /// already holds one.
    async fn insert_rsvp(&mut self, rsvp: NewRsvp) -> Result<EventRsvp>;

    /// Mark a confirmed RSVP cancelled. `None` if it is not confirmed.
    async fn cancel_rsvp(&mut self, rsvp_id: i64) -> Result<Option<EventRsvp>>;

    async fn update_rsvp_payment(
        &mut self,
        rsvp_id: i64,
        payment_status: PaymentStatus,
        amount_paid_cents: i64,
    ) -> Result<Option<EventRsvp>>;

    async fn count_confirmed_rsvps(&mut self, event_id: i64) -> Result<i64>;

    async fn list_event_rsvps(&mut self, event_id: i64) -> Result<Vec<EventRsvp>>;

    async fn list_person_rsvps(&mut self, person_id: i64) -> Result<Vec<EventRsvp>>;

    async fn participation_stats(&mut self) -> Result<ParticipationStats>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
