//! PostgreSQL participation store

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::database::connection::{health_check, DatabasePool};
use crate::database::repositories::{EventRepository, RsvpRepository, SignupRepository};
use crate::database::store::{ParticipationStore, StoreTransaction};
use crate::models::{
    CreateEventRequest, Event, EventRsvp, EventStatus, NewRsvp, ParticipationStats, PaymentStatus,
    UpdateEventRequest, VolunteerSignup,
};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct PgParticipationStore {
    pool: DatabasePool,
}

impl PgParticipationStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationStore for PgParticipationStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn health_check(&self) -> Result<()> {
        health_check(&self.pool).await
    }
}

/// A read-committed PostgreSQL transaction. Rolled back on drop unless
/// committed.
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn lock_event(&mut self, event_id: i64) -> Result<Option<Event>> {
        EventRepository::lock_by_id(&mut self.tx, event_id).await
    }

    async fn find_event(&mut self, event_id: i64) -> Result<Option<Event>> {
        EventRepository::find_by_id(&mut self.tx, event_id).await
    }

    async fn insert_event(&mut self, request: &CreateEventRequest) -> Result<Event> {
        EventRepository::create(&mut self.tx, request).await
    }

    async fn update_event(&mut self, event_id: i64, request: &UpdateEventRequest) -> Result<Option<Event>> {
        EventRepository::update(&mut self.tx, event_id, request).await
    }

    async fn set_event_status(&mut self, event_id: i64, status: EventStatus) -> Result<Option<Event>> {
        EventRepository::set_status(&mut self.tx, event_id, status).await
    }

    async fn list_active_events(&mut self) -> Result<Vec<Event>> {
        EventRepository::list_active(&mut self.tx).await
    }

    async fn find_active_signup(&mut self, person_id: i64, event_id: i64) -> Result<Option<VolunteerSignup>> {
        SignupRepository::find_confirmed(&mut self.tx, person_id, event_id).await
    }

    async fn insert_signup(&mut self, person_id: i64, event_id: i64) -> Result<VolunteerSignup> {
        SignupRepository::create(&mut self.tx, person_id, event_id).await
    }

    async fn cancel_signup(&mut self, signup_id: i64) -> Result<Option<VolunteerSignup>> {
        SignupRepository::cancel(&mut self.tx, signup_id).await
    }

    async fn count_confirmed_signups(&mut self, event_id: i64) -> Result<i64> {
        SignupRepository::count_confirmed(&mut self.tx, event_id).await
    }

    async fn list_event_signups(&mut self, event_id: i64) -> Result<Vec<VolunteerSignup>> {
        SignupRepository::list_for_event(&mut self.tx, event_id).await
    }

    async fn list_person_signups(&mut self, person_id: i64) -> Result<Vec<VolunteerSignup>> {
        SignupRepository::list_for_person(&mut self.tx, person_id).await
    }

    async fn find_active_rsvp(&mut self, person_id: i64, event_id: i64) -> Result<Option<EventRsvp>> {
        RsvpRepository::find_confirmed(&mut self.tx, person_id, event_id).await
    }

    async fn lock_rsvp(&mut self, rsvp_id: i64) -> Result<Option<EventRsvp>> {
        RsvpRepository::lock_by_id(&mut self.tx, rsvp_id).await
    }

    async fn insert_rsvp(&mut self, rsvp: NewRsvp) -> Result<EventRsvp> {
        RsvpRepository::create(&mut self.tx, rsvp).await
    }

    async fn cancel_rsvp(&mut self, rsvp_id: i64) -> Result<Option<EventRsvp>> {
        RsvpRepository::cancel(&mut self.tx, rsvp_id).await
    }

    async fn update_rsvp_payment(
        &mut self,
        rsvp_id: i64,
        payment_status: PaymentStatus,
        amount_paid_cents: i64,
    ) -> Result<Option<EventRsvp>> {
        RsvpRepository::update_payment(&mut self.tx, rsvp_id, payment_status, amount_paid_cents).await
    }

    async fn count_confirmed_rsvps(&mut self, event_id: i64) -> Result<i64> {
        RsvpRepository::count_confirmed(&mut self.tx, event_id).await
    }

    async fn list_event_rsvps(&mut self, event_id: i64) -> Result<Vec<EventRsvp>> {
        RsvpRepository::list_for_event(&mut self.tx, event_id).await
    }

    async fn list_person_rsvps(&mut self, person_id: i64) -> Result<Vec<EventRsvp>> {
        RsvpRepository::list_for_person(&mut self.tx, person_id).await
    }

    async fn participation_stats(&mut self) -> Result<ParticipationStats> {
        RsvpRepository::stats(&mut self.tx).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
