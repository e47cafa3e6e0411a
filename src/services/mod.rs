//! Services module
//!
//! This module contains the participation coordinators and the admin and
//! reporting services built on top of the participation store

pub mod cancellation;
pub mod capacity;
pub mod events;
pub mod payment;
pub mod reporting;
pub mod signup;
pub mod transaction;

// Re-export commonly used services
pub use cancellation::{CancellationCoordinator, CancellationOutcome};
pub use capacity::{is_volunteer_full, volunteer_spots_left, CapacityEvaluator, VolunteerCapacity};
pub use events::EventAdminService;
pub use payment::PaymentService;
pub use reporting::ReportingService;
pub use signup::{RsvpOutcome, SignupCoordinator, SignupOutcome};
pub use transaction::{run_with_retry, RetryPolicy};

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::database::store::ParticipationStore;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub capacity: CapacityEvaluator,
    pub signups: SignupCoordinator,
    pub cancellations: CancellationCoordinator,
    pub payments: PaymentService,
    pub events: EventAdminService,
    pub reports: ReportingService,
    store: Arc<dyn ParticipationStore>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing one store
    pub fn new(store: Arc<dyn ParticipationStore>, engine: &EngineConfig) -> Self {
        Self::with_retry_policy(store, RetryPolicy::from(engine))
    }

    pub fn with_retry_policy(store: Arc<dyn ParticipationStore>, retry: RetryPolicy) -> Self {
        Self {
            capacity: CapacityEvaluator::new(store.clone()),
            signups: SignupCoordinator::new(store.clone(), retry),
            cancellations: CancellationCoordinator::new(store.clone(), retry),
            payments: PaymentService::new(store.clone(), retry),
            events: EventAdminService::new(store.clone(), retry),
            reports: ReportingService::new(store.clone()),
            store,
        }
    }

    /// Health check for the backing store
    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }
}
