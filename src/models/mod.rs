//! Data models module
//!
//! This module contains all data structures used throughout the engine

pub mod event;
pub mod participation;

// Re-export commonly used models
pub use event::{Event, EventStatus, EventSummary, CreateEventRequest, UpdateEventRequest};
pub use participation::{
    VolunteerSignup, EventRsvp, NewRsvp, ParticipationStatus, PaymentStatus, RosterRsvp, ParticipationStats,
};
