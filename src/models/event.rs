//! Event model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an event. Events are never hard-deleted, only cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub category: String,
    pub requirements: Option<String>,
    pub contact_email: String,
    /// 0 means the event does not take volunteers
    pub volunteer_capacity: i32,
    /// 0 means the event is free
    pub price_cents: i64,
    pub status: EventStatus,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    pub fn accepts_volunteers(&self) -> bool {
        self.volunteer_capacity > 0
    }

    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub category: String,
    pub requirements: Option<String>,
    pub contact_email: String,
    #[serde(default)]
    pub volunteer_capacity: i32,
    #[serde(default)]
    pub price_cents: i64,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub requirements: Option<String>,
    pub contact_email: Option<String>,
    pub volunteer_capacity: Option<i32>,
    pub price_cents: Option<i64>,
    pub status: Option<EventStatus>,
}

/// An active event together with its participation counts, as shown on
/// listings and admin dashboards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub confirmed_volunteers: i64,
    pub confirmed_rsvps: i64,
    pub volunteer_spots_left: i64,
}
