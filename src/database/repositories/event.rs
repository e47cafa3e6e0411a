//! Event repository implementation

use sqlx::PgConnection;

use crate::models::event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::utils::errors::Result;

const EVENT_COLUMNS: &str = "id, title, description, event_date, event_time, location, category, requirements, contact_email, volunteer_capacity, price_cents, status, created_by, created_at, updated_at";

/// Event queries, run on the connection of an open transaction
pub struct EventRepository;

impl EventRepository {
    /// Create a new event
    pub async fn create(conn: &mut PgConnection, request: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, event_date, event_time, location, category, requirements, contact_email, volunteer_capacity, price_cents, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.event_date)
        .bind(request.event_time)
        .bind(&request.location)
        .bind(&request.category)
        .bind(&request.requirements)
        .bind(&request.contact_email)
        .bind(request.volunteer_capacity)
        .bind(request.price_cents)
        .bind(request.created_by)
        .fetch_one(conn)
        .await?;

        Ok(event)
    }

    /// Find event by ID, any status
    pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(event)
    }

    /// Find event by ID and lock its row until the transaction ends
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1 FOR UPDATE",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(conn: &mut PgConnection, id: i64, request: &UpdateEventRequest) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                event_time = COALESCE($5, event_time),
                location = COALESCE($6, location),
                category = COALESCE($7, category),
                requirements = COALESCE($8, requirements),
                contact_email = COALESCE($9, contact_email),
                volunteer_capacity = COALESCE($10, volunteer_capacity),
                price_cents = COALESCE($11, price_cents),
                status = COALESCE($12, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.event_date)
        .bind(request.event_time)
        .bind(&request.location)
        .bind(&request.category)
        .bind(&request.requirements)
        .bind(&request.contact_email)
        .bind(request.volunteer_capacity)
        .bind(request.price_cents)
        .bind(request.status)
        .fetch_optional(conn)
        .await?;

        Ok(event)
    }

    /// Set event status. Cancelling is the only way an event is removed.
    pub async fn set_status(conn: &mut PgConnection, id: i64, status: EventStatus) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(conn)
        .await?;

        Ok(event)
    }

    /// Active events in schedule order
    pub async fn list_active(conn: &mut PgConnection) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE status = 'active' ORDER BY event_date ASC, event_time ASC, id ASC",
            EVENT_COLUMNS
        ))
        .fetch_all(conn)
        .await?;

        Ok(events)
    }
}
