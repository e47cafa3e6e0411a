//! RSVP repository implementation

use sqlx::PgConnection;

use crate::models::participation::{EventRsvp, NewRsvp, ParticipationStats, PaymentStatus};
use crate::utils::errors::{is_unique_violation, ParticipationError, Result};

const RSVP_COLUMNS: &str = "id, person_id, event_id, status, payment_status, amount_paid_cents, auto_derived, created_at, cancelled_at, payment_updated_at";

/// RSVP queries, run on the connection of an open transaction
pub struct RsvpRepository;

impl RsvpRepository {
    /// Insert a confirmed RSVP. The partial unique index on
    /// `(person_id, event_id) WHERE status = 'confirmed'` rejects duplicates.
    pub async fn create(conn: &mut PgConnection, rsvp: NewRsvp) -> Result<EventRsvp> {
        sqlx::query_as::<_, EventRsvp>(&format!(
            r#"
            INSERT INTO event_rsvps (person_id, event_id, status, payment_status, amount_paid_cents, auto_derived)
            VALUES ($1, $2, 'confirmed', $3, 0, $4)
            RETURNING {}
            "#,
            RSVP_COLUMNS
        ))
        .bind(rsvp.person_id)
        .bind(rsvp.event_id)
        .bind(rsvp.payment_status)
        .bind(rsvp.auto_derived)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ParticipationError::DuplicateRsvp {
                    person_id: rsvp.person_id,
                    event_id: rsvp.event_id,
                }
            } else {
                e.into()
            }
        })
    }

    /// Find the confirmed RSVP for a pair
    pub async fn find_confirmed(conn: &mut PgConnection, person_id: i64, event_id: i64) -> Result<Option<EventRsvp>> {
        let mut rsvps = sqlx::query_as::<_, EventRsvp>(&format!(
            "SELECT {} FROM event_rsvps WHERE person_id = $1 AND event_id = $2 AND status = 'confirmed'",
            RSVP_COLUMNS
        ))
        .bind(person_id)
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        if rsvps.len() > 1 {
            return Err(ParticipationError::InvariantViolation(format!(
                "{} confirmed RSVPs for person {} at event {}",
                rsvps.len(),
                person_id,
                event_id
            )));
        }

        Ok(rsvps.pop())
    }

    /// Find RSVP by ID and lock its row until the transaction ends
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<EventRsvp>> {
        let rsvp = sqlx::query_as::<_, EventRsvp>(&format!(
            "SELECT {} FROM event_rsvps WHERE id = $1 FOR UPDATE",
            RSVP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(rsvp)
    }

    /// Cancel a confirmed RSVP; the row is kept for reporting
    pub async fn cancel(conn: &mut PgConnection, id: i64) -> Result<Option<EventRsvp>> {
        let rsvp = sqlx::query_as::<_, EventRsvp>(&format!(
            r#"
            UPDATE event_rsvps
            SET status = 'cancelled', cancelled_at = NOW()
            WHERE id = $1 AND status = 'confirmed'
            RETURNING {}
            "#,
            RSVP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(rsvp)
    }

    /// Record a payment outcome
    pub async fn update_payment(
        conn: &mut PgConnection,
        id: i64,
        payment_status: PaymentStatus,
        amount_paid_cents: i64,
    ) -> Result<Option<EventRsvp>> {
        let rsvp = sqlx::query_as::<_, EventRsvp>(&format!(
            r#"
            UPDATE event_rsvps
            SET payment_status = $2, amount_paid_cents = $3, payment_updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            RSVP_COLUMNS
        ))
        .bind(id)
        .bind(payment_status)
        .bind(amount_paid_cents)
        .fetch_optional(conn)
        .await?;

        Ok(rsvp)
    }

    /// Count confirmed RSVPs for an event
    pub async fn count_confirmed(conn: &mut PgConnection, event_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_rsvps WHERE event_id = $1 AND status = 'confirmed'"
        )
        .bind(event_id)
        .fetch_one(conn)
        .await?;

        Ok(count.0)
    }

    /// All RSVPs for an event, including cancelled history
    pub async fn list_for_event(conn: &mut PgConnection, event_id: i64) -> Result<Vec<EventRsvp>> {
        let rsvps = sqlx::query_as::<_, EventRsvp>(&format!(
            "SELECT {} FROM event_rsvps WHERE event_id = $1 ORDER BY created_at ASC, id ASC",
            RSVP_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        Ok(rsvps)
    }

    /// All RSVPs made by a person, including cancelled history
    pub async fn list_for_person(conn: &mut PgConnection, person_id: i64) -> Result<Vec<EventRsvp>> {
        let rsvps = sqlx::query_as::<_, EventRsvp>(&format!(
            "SELECT {} FROM event_rsvps WHERE person_id = $1 ORDER BY created_at ASC, id ASC",
            RSVP_COLUMNS
        ))
        .bind(person_id)
        .fetch_all(conn)
        .await?;

        Ok(rsvps)
    }

    /// Organization-wide totals. Participation counts cover active events
    /// only; collected money covers every completed payment.
    pub async fn stats(conn: &mut PgConnection) -> Result<ParticipationStats> {
        let stats = sqlx::query_as::<_, ParticipationStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM events WHERE status = 'active') AS active_events,
                (SELECT COUNT(DISTINCT vs.person_id)
                   FROM volunteer_signups vs
                   JOIN events e ON e.id = vs.event_id
                  WHERE vs.status = 'confirmed' AND e.status = 'active') AS active_volunteers,
                (SELECT COUNT(*)
                   FROM volunteer_signups vs
                   JOIN events e ON e.id = vs.event_id
                  WHERE vs.status = 'confirmed' AND e.status = 'active') AS confirmed_signups,
                (SELECT COUNT(*)
                   FROM event_rsvps r
                   JOIN events e ON e.id = r.event_id
                  WHERE r.status = 'confirmed' AND e.status = 'active') AS confirmed_rsvps,
                (SELECT COUNT(*)
                   FROM event_rsvps r
                   JOIN events e ON e.id = r.event_id
                  WHERE r.status = 'confirmed' AND r.payment_status = 'pending' AND e.status = 'active') AS pending_payments,
                (SELECT COALESCE(SUM(amount_paid_cents), 0)::BIGINT
                   FROM event_rsvps
                  WHERE payment_status = 'completed') AS collected_cents
            "#
        )
        .fetch_one(conn)
        .await?;

        Ok(stats)
    }
}
