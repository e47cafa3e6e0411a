//! Event administration service
//!
//! Admin CRUD for events. Events are never hard-deleted: removing one sets
//! its status to `cancelled` and leaves every signup and RSVP row in place
//! for reporting.

use std::sync::Arc;
use tracing::{debug, info};

use crate::database::store::ParticipationStore;
use crate::models::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::services::transaction::{run_with_retry, RetryPolicy};
use crate::utils::errors::{ParticipationError, Result};
use crate::utils::helpers::{is_valid_email, normalize_text};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct EventAdminService {
    store: Arc<dyn ParticipationStore>,
    retry: RetryPolicy,
}

impl EventAdminService {
    pub fn new(store: Arc<dyn ParticipationStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Create a new active event
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        let request = normalize_create(request)?;

        let event = run_with_retry(&self.retry, "create_event", || self.try_create_event(&request)).await?;

        log_admin_action(event.created_by, "create_event", Some(&event.id.to_string()), Some(&event.title));
        Ok(event)
    }

    /// Get an event by id, including cancelled ones
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        let mut tx = self.store.begin().await?;
        tx.find_event(event_id)
            .await?
            .ok_or(ParticipationError::EventNotFound { event_id })
    }

    /// Apply a partial update. Volunteer capacity cannot drop below the
    /// number of confirmed signups.
    pub async fn update_event(&self, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        let request = normalize_update(request)?;

        let event = run_with_retry(&self.retry, "update_event", || self.try_update_event(event_id, &request)).await?;

        log_admin_action(None, "update_event", Some(&event_id.to_string()), None);
        Ok(event)
    }

    /// Soft delete. Idempotent for events that are already cancelled.
    pub async fn cancel_event(&self, event_id: i64) -> Result<Event> {
        let event = run_with_retry(&self.retry, "cancel_event", || self.try_cancel_event(event_id)).await?;

        info!(event_id = event_id, "Event cancelled");
        log_admin_action(None, "cancel_event", Some(&event_id.to_string()), None);
        Ok(event)
    }

    async fn try_create_event(&self, request: &CreateEventRequest) -> Result<Event> {
        let mut tx = self.store.begin().await?;
        let event = tx.insert_event(request).await?;
        tx.commit().await?;
        Ok(event)
    }

    async fn try_update_event(&self, event_id: i64, request: &UpdateEventRequest) -> Result<Event> {
        let mut tx = self.store.begin().await?;
        if tx.lock_event(event_id).await?.is_none() {
            return Err(ParticipationError::EventNotFound { event_id });
        }

        if let Some(capacity) = request.volunteer_capacity {
            let confirmed = tx.count_confirmed_signups(event_id).await?;
            if i64::from(capacity) < confirmed {
                return Err(ParticipationError::InvalidInput(format!(
                    "volunteer_capacity {} is below the {} confirmed volunteers",
                    capacity, confirmed
                )));
            }
        }

        let event = tx
            .update_event(event_id, request)
            .await?
            .ok_or(ParticipationError::EventNotFound { event_id })?;
        tx.commit().await?;
        Ok(event)
    }

    async fn try_cancel_event(&self, event_id: i64) -> Result<Event> {
        let mut tx = self.store.begin().await?;
        let current = tx
            .lock_event(event_id)
            .await?
            .ok_or(ParticipationError::EventNotFound { event_id })?;
        if current.status == EventStatus::Cancelled {
            debug!(event_id = event_id, "Event already cancelled");
            return Ok(current);
        }

        let event = tx
            .set_event_status(event_id, EventStatus::Cancelled)
            .await?
            .ok_or(ParticipationError::EventNotFound { event_id })?;
        tx.commit().await?;
        Ok(event)
    }
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let value = normalize_text(value);
    if value.is_empty() {
        return Err(ParticipationError::InvalidInput(format!("{} is required", field)));
    }
    Ok(value)
}

fn require_email(value: &str) -> Result<String> {
    let value = value.trim();
    if !is_valid_email(value) {
        return Err(ParticipationError::InvalidInput(format!("invalid contact_email: {}", value)));
    }
    Ok(value.to_string())
}

fn require_capacity(capacity: i32) -> Result<i32> {
    if capacity < 0 {
        return Err(ParticipationError::InvalidInput("volunteer_capacity must not be negative".to_string()));
    }
    Ok(capacity)
}

fn require_price(price_cents: i64) -> Result<i64> {
    if price_cents < 0 {
        return Err(ParticipationError::InvalidInput("price_cents must not be negative".to_string()));
    }
    Ok(price_cents)
}

fn normalize_create(request: CreateEventRequest) -> Result<CreateEventRequest> {
    Ok(CreateEventRequest {
        title: require_text("title", &request.title)?,
        description: request.description.trim().to_string(),
        location: require_text("location", &request.location)?,
        category: require_text("category", &request.category)?,
        requirements: request
            .requirements
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        contact_email: require_email(&request.contact_email)?,
        volunteer_capacity: require_capacity(request.volunteer_capacity)?,
        price_cents: require_price(request.price_cents)?,
        ..request
    })
}

fn normalize_update(request: UpdateEventRequest) -> Result<UpdateEventRequest> {
    Ok(UpdateEventRequest {
        title: request.title.as_deref().map(|t| require_text("title", t)).transpose()?,
        description: request.description.map(|d| d.trim().to_string()),
        location: request.location.as_deref().map(|l| require_text("location", l)).transpose()?,
        category: request.category.as_deref().map(|c| require_text("category", c)).transpose()?,
        contact_email: request.contact_email.as_deref().map(require_email).transpose()?,
        volunteer_capacity: request.volunteer_capacity.map(require_capacity).transpose()?,
        price_cents: request.price_cents.map(require_price).transpose()?,
        ..request
    })
}
