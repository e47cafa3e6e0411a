//! Database module
//!
//! This module handles database connections and the participation store
//! implementations

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check, open_store};
pub use memory::{MemoryParticipationStore, MemoryFault};
pub use postgres::PgParticipationStore;
pub use repositories::{EventRepository, SignupRepository, RsvpRepository};
pub use store::{ParticipationStore, StoreTransaction};
