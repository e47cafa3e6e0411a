//! Community Events Participation Engine
//!
//! Volunteer signups and RSVPs for community events: capacity-checked
//! volunteering, RSVPs derived automatically from volunteer signups, and
//! cancellation that cascades from an RSVP to the matching signup. All
//! participation changes for one event are serialized through the
//! participation store.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ParticipationError, Result};

// Re-export main components for easy access
pub use database::{open_store, MemoryParticipationStore, ParticipationStore, PgParticipationStore};
pub use handlers::{app, AppState};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
