//! Volunteer signup and RSVP models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Status shared by both participation tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Free,
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Payment transitions the side channel may request. A failed charge
    /// can still be completed by a later attempt.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Failed, PaymentStatus::Completed)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::Free => "free",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VolunteerSignup {
    pub id: i64,
    pub person_id: i64,
    pub event_id: i64,
    pub status: ParticipationStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl VolunteerSignup {
    pub fn is_confirmed(&self) -> bool {
        self.status == ParticipationStatus::Confirmed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventRsvp {
    pub id: i64,
    pub person_id: i64,
    pub event_id: i64,
    pub status: ParticipationStatus,
    pub payment_status: PaymentStatus,
    pub amount_paid_cents: i64,
    /// Created as a side effect of a volunteer signup
    pub auto_derived: bool,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub payment_updated_at: Option<DateTime<Utc>>,
}

impl EventRsvp {
    pub fn is_confirmed(&self) -> bool {
        self.status == ParticipationStatus::Confirmed
    }
}

/// Values for a new RSVP row; status is always `confirmed` on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRsvp {
    pub person_id: i64,
    pub event_id: i64,
    pub payment_status: PaymentStatus,
    pub auto_derived: bool,
}

impl NewRsvp {
    /// RSVP created because the person volunteered. Volunteers are never
    /// charged for the event they work.
    pub fn auto_derived(person_id: i64, event_id: i64) -> Self {
        Self {
            person_id,
            event_id,
            payment_status: PaymentStatus::Free,
            auto_derived: true,
        }
    }

    /// RSVP requested directly by the attendee
    pub fn direct(person_id: i64, event_id: i64, price_cents: i64) -> Self {
        Self {
            person_id,
            event_id,
            payment_status: if price_cents > 0 { PaymentStatus::Pending } else { PaymentStatus::Free },
            auto_derived: false,
        }
    }
}

/// An RSVP on an event roster, annotated with whether the person
/// currently holds a confirmed volunteer signup for the same event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRsvp {
    #[serde(flatten)]
    pub rsvp: EventRsvp,
    pub is_volunteer: bool,
}

/// Organization-wide participation totals for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ParticipationStats {
    pub active_events: i64,
    pub active_volunteers: i64,
    pub confirmed_signups: i64,
    pub confirmed_rsvps: i64,
    pub pending_payments: i64,
    pub collected_cents: i64,
}
