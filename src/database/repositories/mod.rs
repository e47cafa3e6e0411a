//! Database repositories module
//!
//! This module contains the PostgreSQL queries behind the participation store

pub mod event;
pub mod signup;
pub mod rsvp;

// Re-export repositories
pub use event::EventRepository;
pub use signup::SignupRepository;
pub use rsvp::RsvpRepository;
