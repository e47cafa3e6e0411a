//! Test data helpers for creating events and services

use chrono::{Days, NaiveTime, Utc};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use std::sync::Arc;
use std::time::Duration;

use community_events::database::MemoryParticipationStore;
use community_events::models::{CreateEventRequest, Event};
use community_events::services::{RetryPolicy, ServiceFactory};

/// Retries without sleeping so conflict tests stay fast
pub fn test_retry_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

/// Services over a fresh in-memory store. The returned store handle shares
/// state with the services and is used to inject faults.
pub fn memory_services() -> (ServiceFactory, MemoryParticipationStore) {
    let store = MemoryParticipationStore::new();
    let services = ServiceFactory::with_retry_policy(Arc::new(store.clone()), test_retry_policy());
    (services, store)
}

/// A valid event request with generated title and contact
pub fn event_request(volunteer_capacity: i32, price_cents: i64) -> CreateEventRequest {
    let title: String = CompanyName().fake();
    let contact_email: String = SafeEmail().fake();
    let event_date = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(14))
        .expect("date in range");

    CreateEventRequest {
        title: format!("{} Community Dinner", title),
        description: "Shared evening meal for families".to_string(),
        event_date,
        event_time: NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"),
        location: "Main hall".to_string(),
        category: "community".to_string(),
        requirements: None,
        contact_email,
        volunteer_capacity,
        price_cents,
        created_by: Some(1),
    }
}

/// Create an active event through the admin service
pub async fn create_event(services: &ServiceFactory, volunteer_capacity: i32, price_cents: i64) -> Event {
    services
        .events
        .create_event(event_request(volunteer_capacity, price_cents))
        .await
        .expect("Failed to create test event")
}
