//! In-memory participation store
//!
//! Committed rows live behind a short-lived std mutex. A transaction works on
//! a snapshot taken at `begin`; `lock_event` takes a per-event async lock held
//! until the transaction ends and refreshes that event's rows from the
//! committed state. Changed rows are published on commit after the same
//! uniqueness checks the PostgreSQL indexes perform, so transactions on
//! different events run concurrently while those on one event serialize.
//! Used by tests and the `memory` storage backend.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::database::store::{ParticipationStore, StoreTransaction};
use crate::models::{
    CreateEventRequest, Event, EventRsvp, EventStatus, NewRsvp, ParticipationStats, ParticipationStatus,
    PaymentStatus, UpdateEventRequest, VolunteerSignup,
};
use crate::utils::errors::{ParticipationError, Result};

/// One-shot failures that can be armed on a [`MemoryParticipationStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFault {
    /// The next `begin` reports the store as unavailable
    Unavailable,
    /// The next RSVP insert fails as if the connection dropped
    InsertRsvp,
    /// The next commit fails with a transaction conflict
    CommitConflict,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    events: BTreeMap<i64, Event>,
    signups: Vec<VolunteerSignup>,
    rsvps: Vec<EventRsvp>,
}

#[derive(Debug, Clone, Copy)]
enum RowKind {
    Event,
    Signup,
    Rsvp,
}

#[derive(Debug, Default)]
struct Sequences {
    event: i64,
    signup: i64,
    rsvp: i64,
}

#[derive(Debug, Default)]
struct Shared {
    committed: StdMutex<MemoryState>,
    sequences: StdMutex<Sequences>,
    event_locks: StdMutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl Shared {
    fn committed(&self) -> StdMutexGuard<'_, MemoryState> {
        self.committed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ids come from store-wide sequences; a rolled back insert burns its id
    fn next_id(&self, kind: RowKind) -> i64 {
        let mut sequences = self.sequences.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let counter = match kind {
            RowKind::Event => &mut sequences.event,
            RowKind::Signup => &mut sequences.signup,
            RowKind::Rsvp => &mut sequences.rsvp,
        };
        *counter += 1;
        *counter
    }

    fn event_lock(&self, event_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.event_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(event_id).or_default())
    }
}

#[derive(Debug, Clone, Default)]
struct Faults(Arc<StdMutex<Vec<MemoryFault>>>);

impl Faults {
    fn take(&self, fault: MemoryFault) -> bool {
        let mut armed = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match armed.iter().position(|f| *f == fault) {
            Some(index) => {
                armed.remove(index);
                true
            }
            None => false,
        }
    }

    fn arm(&self, fault: MemoryFault) {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(fault);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryParticipationStore {
    shared: Arc<Shared>,
    faults: Faults,
}

impl MemoryParticipationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot fault; each armed fault fires once
    pub fn inject_fault(&self, fault: MemoryFault) {
        self.faults.arm(fault);
    }
}

#[async_trait]
impl ParticipationStore for MemoryParticipationStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        if self.faults.take(MemoryFault::Unavailable) {
            return Err(ParticipationError::StorageUnavailable("memory store offline".to_string()));
        }

        let working = self.shared.committed().clone();
        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            working,
            dirty: DirtyRows::default(),
            held_locks: HashMap::new(),
            faults: self.faults.clone(),
        }))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Ids of rows written by the current transaction
#[derive(Debug, Default)]
struct DirtyRows {
    events: BTreeSet<i64>,
    signups: BTreeSet<i64>,
    rsvps: BTreeSet<i64>,
}

pub struct MemoryTransaction {
    shared: Arc<Shared>,
    working: MemoryState,
    dirty: DirtyRows,
    held_locks: HashMap<i64, OwnedMutexGuard<()>>,
    faults: Faults,
}

impl MemoryTransaction {
    fn confirmed_signups(&self, person_id: i64, event_id: i64) -> Vec<&VolunteerSignup> {
        self.working
            .signups
            .iter()
            .filter(|s| s.person_id == person_id && s.event_id == event_id && s.is_confirmed())
            .collect()
    }

    fn confirmed_rsvps(&self, person_id: i64, event_id: i64) -> Vec<&EventRsvp> {
        self.working
            .rsvps
            .iter()
            .filter(|r| r.person_id == person_id && r.event_id == event_id && r.is_confirmed())
            .collect()
    }

    /// Take the event's lock unless this transaction already holds it, then
    /// replace the snapshot of that event's rows with the committed ones
    async fn acquire_event(&mut self, event_id: i64) {
        if self.held_locks.contains_key(&event_id) {
            return;
        }

        let guard = self.shared.event_lock(event_id).lock_owned().await;
        self.held_locks.insert(event_id, guard);

        let shared = Arc::clone(&self.shared);
        let committed = shared.committed();
        self.refresh_event(&committed, event_id);
    }

    fn refresh_event(&mut self, committed: &MemoryState, event_id: i64) {
        let dirty = &self.dirty;

        if !dirty.events.contains(&event_id) {
            match committed.events.get(&event_id) {
                Some(event) => self.working.events.insert(event_id, event.clone()),
                None => self.working.events.remove(&event_id),
            };
        }

        self.working
            .signups
            .retain(|s| s.event_id != event_id || dirty.signups.contains(&s.id));
        self.working.signups.extend(
            committed
                .signups
                .iter()
                .filter(|s| s.event_id == event_id && !dirty.signups.contains(&s.id))
                .cloned(),
        );
        self.working.signups.sort_by_key(|s| s.id);

        self.working
            .rsvps
            .retain(|r| r.event_id != event_id || dirty.rsvps.contains(&r.id));
        self.working.rsvps.extend(
            committed
                .rsvps
                .iter()
                .filter(|r| r.event_id == event_id && !dirty.rsvps.contains(&r.id))
                .cloned(),
        );
        self.working.rsvps.sort_by_key(|r| r.id);
    }

    fn event_exists(&self, event_id: i64) -> bool {
        self.working.events.contains_key(&event_id) || self.shared.committed().events.contains_key(&event_id)
    }

    fn event_is_active(&self, event_id: i64) -> bool {
        self.working
            .events
            .get(&event_id)
            .map(Event::is_active)
            .unwrap_or(false)
    }

    fn require_event(&self, event_id: i64) -> Result<()> {
        if self.working.events.contains_key(&event_id) {
            Ok(())
        } else {
            // mirrors the foreign key on the participation tables
            Err(ParticipationError::InvalidInput(format!("event {} does not exist", event_id)))
        }
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn lock_event(&mut self, event_id: i64) -> Result<Option<Event>> {
        if !self.event_exists(event_id) {
            return Ok(None);
        }
        self.acquire_event(event_id).await;
        Ok(self.working.events.get(&event_id).cloned())
    }

    async fn find_event(&mut self, event_id: i64) -> Result<Option<Event>> {
        Ok(self.working.events.get(&event_id).cloned())
    }

    async fn insert_event(&mut self, request: &CreateEventRequest) -> Result<Event> {
        let now = Utc::now();
        let event = Event {
            id: self.shared.next_id(RowKind::Event),
            title: request.title.clone(),
            description: request.description.clone(),
            event_date: request.event_date,
            event_time: request.event_time,
            location: request.location.clone(),
            category: request.category.clone(),
            requirements: request.requirements.clone(),
            contact_email: request.contact_email.clone(),
            volunteer_capacity: request.volunteer_capacity,
            price_cents: request.price_cents,
            status: EventStatus::Active,
            created_by: request.created_by,
            created_at: now,
            updated_at: now,
        };
        self.working.events.insert(event.id, event.clone());
        self.dirty.events.insert(event.id);
        Ok(event)
    }

    async fn update_event(&mut self, event_id: i64, request: &UpdateEventRequest) -> Result<Option<Event>> {
        let Some(event) = self.working.events.get_mut(&event_id) else {
            return Ok(None);
        };
        self.dirty.events.insert(event_id);

        if let Some(title) = &request.title {
            event.title = title.clone();
        }
        if let Some(description) = &request.description {
            event.description = description.clone();
        }
        if let Some(event_date) = request.event_date {
            event.event_date = event_date;
        }
        if let Some(event_time) = request.event_time {
            event.event_time = event_time;
        }
        if let Some(location) = &request.location {
            event.location = location.clone();
        }
        if let Some(category) = &request.category {
            event.category = category.clone();
        }
        if let Some(requirements) = &request.requirements {
            event.requirements = Some(requirements.clone());
        }
        if let Some(contact_email) = &request.contact_email {
            event.contact_email = contact_email.clone();
        }
        if let Some(volunteer_capacity) = request.volunteer_capacity {
            event.volunteer_capacity = volunteer_capacity;
        }
        if let Some(price_cents) = request.price_cents {
            event.price_cents = price_cents;
        }
        if let Some(status) = request.status {
            event.status = status;
        }
        event.updated_at = Utc::now();

        Ok(Some(event.clone()))
    }

    async fn set_event_status(&mut self, event_id: i64, status: EventStatus) -> Result<Option<Event>> {
        let dirty = &mut self.dirty;
        Ok(self.working.events.get_mut(&event_id).map(|event| {
            dirty.events.insert(event.id);
            event.status = status;
            event.updated_at = Utc::now();
            event.clone()
        }))
    }

    async fn list_active_events(&mut self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .working
            .events
            .values()
            .filter(|e| e.is_active())
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.event_date, e.event_time, e.id));
        Ok(events)
    }

    async fn find_active_signup(&mut self, person_id: i64, event_id: i64) -> Result<Option<VolunteerSignup>> {
        let found = self.confirmed_signups(person_id, event_id);
        if found.len() > 1 {
            return Err(ParticipationError::InvariantViolation(format!(
                "{} confirmed volunteer signups for person {} at event {}",
                found.len(),
                person_id,
                event_id
            )));
        }
        Ok(found.first().map(|s| (*s).clone()))
    }

    async fn insert_signup(&mut self, person_id: i64, event_id: i64) -> Result<VolunteerSignup> {
        self.require_event(event_id)?;
        if !self.confirmed_signups(person_id, event_id).is_empty() {
            return Err(ParticipationError::DuplicateSignup { person_id, event_id });
        }

        let signup = VolunteerSignup {
            id: self.shared.next_id(RowKind::Signup),
            person_id,
            event_id,
            status: ParticipationStatus::Confirmed,
            created_at: Utc::now(),
            cancelled_at: None,
        };
        self.working.signups.push(signup.clone());
        self.dirty.signups.insert(signup.id);
        Ok(signup)
    }

    async fn cancel_signup(&mut self, signup_id: i64) -> Result<Option<VolunteerSignup>> {
        let dirty = &mut self.dirty;
        Ok(self
            .working
            .signups
            .iter_mut()
            .find(|s| s.id == signup_id && s.is_confirmed())
            .map(|signup| {
                dirty.signups.insert(signup.id);
                signup.status = ParticipationStatus::Cancelled;
                signup.cancelled_at = Some(Utc::now());
                signup.clone()
            }))
    }

    async fn count_confirmed_signups(&mut self, event_id: i64) -> Result<i64> {
        Ok(self
            .working
            .signups
            .iter()
            .filter(|s| s.event_id == event_id && s.is_confirmed())
            .count() as i64)
    }

    async fn list_event_signups(&mut self, event_id: i64) -> Result<Vec<VolunteerSignup>> {
        Ok(self.working.signups.iter().filter(|s| s.event_id == event_id).cloned().collect())
    }

    async fn list_person_signups(&mut self, person_id: i64) -> Result<Vec<VolunteerSignup>> {
        Ok(self.working.signups.iter().filter(|s| s.person_id == person_id).cloned().collect())
    }

    async fn find_active_rsvp(&mut self, person_id: i64, event_id: i64) -> Result<Option<EventRsvp>> {
        let found = self.confirmed_rsvps(person_id, event_id);
        if found.len() > 1 {
            return Err(ParticipationError::InvariantViolation(format!(
                "{} confirmed RSVPs for person {} at event {}",
                found.len(),
                person_id,
                event_id
            )));
        }
        Ok(found.first().map(|r| (*r).clone()))
    }

    async fn lock_rsvp(&mut self, rsvp_id: i64) -> Result<Option<EventRsvp>> {
        // an RSVP never moves between events, so its event lock covers it
        let event_id = match self.working.rsvps.iter().find(|r| r.id == rsvp_id) {
            Some(rsvp) => Some(rsvp.event_id),
            None => self
                .shared
                .committed()
                .rsvps
                .iter()
                .find(|r| r.id == rsvp_id)
                .map(|r| r.event_id),
        };
        let Some(event_id) = event_id else {
            return Ok(None);
        };

        self.acquire_event(event_id).await;
        Ok(self.working.rsvps.iter().find(|r| r.id == rsvp_id).cloned())
    }

    async fn insert_rsvp(&mut self, rsvp: NewRsvp) -> Result<EventRsvp> {
        if self.faults.take(MemoryFault::InsertRsvp) {
            return Err(ParticipationError::StorageUnavailable("connection reset during RSVP insert".to_string()));
        }
        self.require_event(rsvp.event_id)?;
        if !self.confirmed_rsvps(rsvp.person_id, rsvp.event_id).is_empty() {
            return Err(ParticipationError::DuplicateRsvp {
                person_id: rsvp.person_id,
                event_id: rsvp.event_id,
            });
        }

        let created = EventRsvp {
            id: self.shared.next_id(RowKind::Rsvp),
            person_id: rsvp.person_id,
            event_id: rsvp.event_id,
            status: ParticipationStatus::Confirmed,
            payment_status: rsvp.payment_status,
            amount_paid_cents: 0,
            auto_derived: rsvp.auto_derived,
            created_at: Utc::now(),
            cancelled_at: None,
            payment_updated_at: None,
        };
        self.working.rsvps.push(created.clone());
        self.dirty.rsvps.insert(created.id);
        Ok(created)
    }

    async fn cancel_rsvp(&mut self, rsvp_id: i64) -> Result<Option<EventRsvp>> {
        let dirty = &mut self.dirty;
        Ok(self
            .working
            .rsvps
            .iter_mut()
            .find(|r| r.id == rsvp_id && r.is_confirmed())
            .map(|rsvp| {
                dirty.rsvps.insert(rsvp.id);
                rsvp.status = ParticipationStatus::Cancelled;
                rsvp.cancelled_at = Some(Utc::now());
                rsvp.clone()
            }))
    }

    async fn update_rsvp_payment(
        &mut self,
        rsvp_id: i64,
        payment_status: PaymentStatus,
        amount_paid_cents: i64,
    ) -> Result<Option<EventRsvp>> {
        let dirty = &mut self.dirty;
        Ok(self.working.rsvps.iter_mut().find(|r| r.id == rsvp_id).map(|rsvp| {
            dirty.rsvps.insert(rsvp.id);
            rsvp.payment_status = payment_status;
            rsvp.amount_paid_cents = amount_paid_cents;
            rsvp.payment_updated_at = Some(Utc::now());
            rsvp.clone()
        }))
    }

    async fn count_confirmed_rsvps(&mut self, event_id: i64) -> Result<i64> {
        Ok(self
            .working
            .rsvps
            .iter()
            .filter(|r| r.event_id == event_id && r.is_confirmed())
            .count() as i64)
    }

    async fn list_event_rsvps(&mut self, event_id: i64) -> Result<Vec<EventRsvp>> {
        Ok(self.working.rsvps.iter().filter(|r| r.event_id == event_id).cloned().collect())
    }

    async fn list_person_rsvps(&mut self, person_id: i64) -> Result<Vec<EventRsvp>> {
        Ok(self.working.rsvps.iter().filter(|r| r.person_id == person_id).cloned().collect())
    }

    async fn participation_stats(&mut self) -> Result<ParticipationStats> {
        let active_signups: Vec<&VolunteerSignup> = self
            .working
            .signups
            .iter()
            .filter(|s| s.is_confirmed() && self.event_is_active(s.event_id))
            .collect();
        let active_rsvps: Vec<&EventRsvp> = self
            .working
            .rsvps
            .iter()
            .filter(|r| r.is_confirmed() && self.event_is_active(r.event_id))
            .collect();

        let mut volunteers: Vec<i64> = active_signups.iter().map(|s| s.person_id).collect();
        volunteers.sort_unstable();
        volunteers.dedup();

        Ok(ParticipationStats {
            active_events: self.working.events.values().filter(|e| e.is_active()).count() as i64,
            active_volunteers: volunteers.len() as i64,
            confirmed_signups: active_signups.len() as i64,
            confirmed_rsvps: active_rsvps.len() as i64,
            pending_payments: active_rsvps
                .iter()
                .filter(|r| r.payment_status == PaymentStatus::Pending)
                .count() as i64,
            collected_cents: self
                .working
                .rsvps
                .iter()
                .filter(|r| r.payment_status == PaymentStatus::Completed)
                .map(|r| r.amount_paid_cents)
                .sum(),
        })
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction {
            shared,
            working,
            dirty,
            held_locks,
            faults,
        } = *self;
        if faults.take(MemoryFault::CommitConflict) {
            return Err(ParticipationError::TransactionConflict("simulated serialization failure".to_string()));
        }

        let mut committed = shared.committed();
        let signups: Vec<&VolunteerSignup> = working.signups.iter().filter(|s| dirty.signups.contains(&s.id)).collect();
        let rsvps: Vec<&EventRsvp> = working.rsvps.iter().filter(|r| dirty.rsvps.contains(&r.id)).collect();

        // same guarantees as the partial unique indexes
        for signup in signups.iter().filter(|s| s.is_confirmed()) {
            let clash = committed.signups.iter().any(|other| {
                other.id != signup.id
                    && other.person_id == signup.person_id
                    && other.event_id == signup.event_id
                    && other.is_confirmed()
            });
            if clash {
                return Err(ParticipationError::DuplicateSignup {
                    person_id: signup.person_id,
                    event_id: signup.event_id,
                });
            }
        }
        for rsvp in rsvps.iter().filter(|r| r.is_confirmed()) {
            let clash = committed.rsvps.iter().any(|other| {
                other.id != rsvp.id
                    && other.person_id == rsvp.person_id
                    && other.event_id == rsvp.event_id
                    && other.is_confirmed()
            });
            if clash {
                return Err(ParticipationError::DuplicateRsvp {
                    person_id: rsvp.person_id,
                    event_id: rsvp.event_id,
                });
            }
        }

        for event_id in &dirty.events {
            if let Some(event) = working.events.get(event_id) {
                committed.events.insert(*event_id, event.clone());
            }
        }
        for signup in signups {
            match committed.signups.iter_mut().find(|s| s.id == signup.id) {
                Some(existing) => *existing = signup.clone(),
                None => committed.signups.push(signup.clone()),
            }
        }
        committed.signups.sort_by_key(|s| s.id);
        for rsvp in rsvps {
            match committed.rsvps.iter_mut().find(|r| r.id == rsvp.id) {
                Some(existing) => *existing = rsvp.clone(),
                None => committed.rsvps.push(rsvp.clone()),
            }
        }
        committed.rsvps.sort_by_key(|r| r.id);

        drop(committed);
        drop(held_locks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, NaiveTime};
    use std::time::Duration;

    fn event_request(capacity: i32) -> CreateEventRequest {
        CreateEventRequest {
            title: "Masjid cleanup".to_string(),
            description: String::new(),
            event_date: NaiveDate::from_ymd_opt(2026, 11, 7).unwrap(),
            event_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            location: "Main hall".to_string(),
            category: "service".to_string(),
            requirements: None,
            contact_email: "events@masjid.org".to_string(),
            volunteer_capacity: capacity,
            price_cents: 0,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let store = MemoryParticipationStore::new();

        let mut tx = store.begin().await.unwrap();
        let event = tx.insert_event(&event_request(2)).await.unwrap();
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.find_event(event.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_confirmed_signup_is_rejected() {
        let store = MemoryParticipationStore::new();
        let mut tx = store.begin().await.unwrap();
        let event = tx.insert_event(&event_request(2)).await.unwrap();

        let signup = tx.insert_signup(7, event.id).await.unwrap();
        assert_matches!(
            tx.insert_signup(7, event.id).await,
            Err(ParticipationError::DuplicateSignup { person_id: 7, .. })
        );

        // a cancelled row no longer blocks a new confirmed one
        tx.cancel_signup(signup.id).await.unwrap();
        assert!(tx.insert_signup(7, event.id).await.is_ok());
        assert_eq!(tx.list_event_signups(event.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_event_locks_do_not_block_other_events() {
        let store = MemoryParticipationStore::new();
        let mut setup = store.begin().await.unwrap();
        let first = setup.insert_event(&event_request(2)).await.unwrap();
        let second = setup.insert_event(&event_request(2)).await.unwrap();
        setup.commit().await.unwrap();

        let mut holder = store.begin().await.unwrap();
        holder.lock_event(first.id).await.unwrap();
        holder.insert_signup(1, first.id).await.unwrap();

        let mut other = store.begin().await.unwrap();
        let locked = tokio::time::timeout(Duration::from_secs(1), other.lock_event(second.id)).await;
        assert!(locked.unwrap().unwrap().is_some());
        other.insert_signup(2, second.id).await.unwrap();
        other.commit().await.unwrap();

        // the same event waits for the holder
        let mut waiter = store.begin().await.unwrap();
        assert!(tokio::time::timeout(Duration::from_millis(50), waiter.lock_event(first.id))
            .await
            .is_err());

        holder.commit().await.unwrap();
        waiter.lock_event(first.id).await.unwrap();
        assert_eq!(waiter.count_confirmed_signups(first.id).await.unwrap(), 1);
        assert_eq!(waiter.count_confirmed_signups(second.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_rejects_confirmed_duplicates() {
        let store = MemoryParticipationStore::new();
        let mut setup = store.begin().await.unwrap();
        let event = setup.insert_event(&event_request(3)).await.unwrap();
        setup.commit().await.unwrap();

        // neither transaction takes the event lock, so both see no signup
        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        first.insert_signup(5, event.id).await.unwrap();
        second.insert_signup(5, event.id).await.unwrap();

        first.commit().await.unwrap();
        assert_matches!(
            second.commit().await,
            Err(ParticipationError::DuplicateSignup { person_id: 5, .. })
        );

        let mut check = store.begin().await.unwrap();
        assert_eq!(check.count_confirmed_signups(event.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_conflict_fault_fires_once() {
        let store = MemoryParticipationStore::new();
        store.inject_fault(MemoryFault::CommitConflict);

        let tx = store.begin().await.unwrap();
        assert_matches!(tx.commit().await, Err(ParticipationError::TransactionConflict(_)));

        let tx = store.begin().await.unwrap();
        assert!(tx.commit().await.is_ok());
    }

    #[tokio::test]
    async fn test_participation_requires_existing_event() {
        let store = MemoryParticipationStore::new();
        let mut tx = store.begin().await.unwrap();
        assert_matches!(tx.insert_signup(1, 99).await, Err(ParticipationError::InvalidInput(_)));
    }
}
