//! Read-only participation reporting
//!
//! Listings, rosters, per-person views and dashboard totals. Nothing here
//! writes; transactions are dropped instead of committed.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::database::store::{ParticipationStore, StoreTransaction};
use crate::models::{EventRsvp, EventSummary, ParticipationStats, RosterRsvp, VolunteerSignup};
use crate::services::capacity::volunteer_spots_left;
use crate::utils::errors::{ParticipationError, Result};

#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn ParticipationStore>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn ParticipationStore>) -> Self {
        Self { store }
    }

    /// Active events in date order with their participation counts
    pub async fn event_summaries(&self) -> Result<Vec<EventSummary>> {
        let mut tx = self.store.begin().await?;
        let events = tx.list_active_events().await?;

        let mut summaries = Vec::with_capacity(events.len());
        for event in events {
            let confirmed_volunteers = tx.count_confirmed_signups(event.id).await?;
            let confirmed_rsvps = tx.count_confirmed_rsvps(event.id).await?;
            summaries.push(EventSummary {
                volunteer_spots_left: volunteer_spots_left(event.volunteer_capacity, confirmed_volunteers),
                confirmed_volunteers,
                confirmed_rsvps,
                event,
            });
        }

        debug!(count = summaries.len(), "Built event summaries");
        Ok(summaries)
    }

    /// Every volunteer signup for an event, cancelled ones included
    pub async fn event_volunteers(&self, event_id: i64) -> Result<Vec<VolunteerSignup>> {
        let mut tx = self.store.begin().await?;
        require_event(tx.as_mut(), event_id).await?;
        tx.list_event_signups(event_id).await
    }

    /// Every RSVP for an event, each flagged with whether the person
    /// currently volunteers for it
    pub async fn event_rsvps(&self, event_id: i64) -> Result<Vec<RosterRsvp>> {
        let mut tx = self.store.begin().await?;
        require_event(tx.as_mut(), event_id).await?;

        let volunteers: HashSet<i64> = tx
            .list_event_signups(event_id)
            .await?
            .into_iter()
            .filter(VolunteerSignup::is_confirmed)
            .map(|signup| signup.person_id)
            .collect();

        let roster = tx
            .list_event_rsvps(event_id)
            .await?
            .into_iter()
            .map(|rsvp| RosterRsvp {
                is_volunteer: volunteers.contains(&rsvp.person_id),
                rsvp,
            })
            .collect();

        Ok(roster)
    }

    pub async fn person_signups(&self, person_id: i64) -> Result<Vec<VolunteerSignup>> {
        let mut tx = self.store.begin().await?;
        tx.list_person_signups(person_id).await
    }

    pub async fn person_rsvps(&self, person_id: i64) -> Result<Vec<EventRsvp>> {
        let mut tx = self.store.begin().await?;
        tx.list_person_rsvps(person_id).await
    }

    pub async fn stats(&self) -> Result<ParticipationStats> {
        let mut tx = self.store.begin().await?;
        tx.participation_stats().await
    }
}

async fn require_event(tx: &mut dyn StoreTransaction, event_id: i64) -> Result<()> {
    match tx.find_event(event_id).await? {
        Some(_) => Ok(()),
        None => Err(ParticipationError::EventNotFound { event_id }),
    }
}
