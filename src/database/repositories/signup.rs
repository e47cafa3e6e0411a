//! Volunteer signup repository implementation

use sqlx::PgConnection;

use crate::models::participation::VolunteerSignup;
use crate::utils::errors::{is_unique_violation, ParticipationError, Result};

const SIGNUP_COLUMNS: &str = "id, person_id, event_id, status, created_at, cancelled_at";

/// Volunteer signup queries, run on the connection of an open transaction
pub struct SignupRepository;

impl SignupRepository {
    /// Insert a confirmed signup. The partial unique index on
    /// `(person_id, event_id) WHERE status = 'confirmed'` rejects duplicates.
    pub async fn create(conn: &mut PgConnection, person_id: i64, event_id: i64) -> Result<VolunteerSignup> {
        sqlx::query_as::<_, VolunteerSignup>(&format!(
            r#"
            INSERT INTO volunteer_signups (person_id, event_id, status)
            VALUES ($1, $2, 'confirmed')
            RETURNING {}
            "#,
            SIGNUP_COLUMNS
        ))
        .bind(person_id)
        .bind(event_id)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ParticipationError::DuplicateSignup { person_id, event_id }
            } else {
                e.into()
            }
        })
    }

    /// Find the confirmed signup for a pair
    pub async fn find_confirmed(conn: &mut PgConnection, person_id: i64, event_id: i64) -> Result<Option<VolunteerSignup>> {
        let mut signups = sqlx::query_as::<_, VolunteerSignup>(&format!(
            "SELECT {} FROM volunteer_signups WHERE person_id = $1 AND event_id = $2 AND status = 'confirmed'",
            SIGNUP_COLUMNS
        ))
        .bind(person_id)
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        if signups.len() > 1 {
            return Err(ParticipationError::InvariantViolation(format!(
                "{} confirmed volunteer signups for person {} at event {}",
                signups.len(),
                person_id,
                event_id
            )));
        }

        Ok(signups.pop())
    }

    /// Cancel a confirmed signup; the row is kept for reporting
    pub async fn cancel(conn: &mut PgConnection, id: i64) -> Result<Option<VolunteerSignup>> {
        let signup = sqlx::query_as::<_, VolunteerSignup>(&format!(
            r#"
            UPDATE volunteer_signups
            SET status = 'cancelled', cancelled_at = NOW()
            WHERE id = $1 AND status = 'confirmed'
            RETURNING {}
            "#,
            SIGNUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(signup)
    }

    /// Count confirmed signups for an event
    pub async fn count_confirmed(conn: &mut PgConnection, event_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM volunteer_signups WHERE event_id = $1 AND status = 'confirmed'"
        )
        .bind(event_id)
        .fetch_one(conn)
        .await?;

        Ok(count.0)
    }

    /// All signups for an event, including cancelled history
    pub async fn list_for_event(conn: &mut PgConnection, event_id: i64) -> Result<Vec<VolunteerSignup>> {
        let signups = sqlx::query_as::<_, VolunteerSignup>(&format!(
            "SELECT {} FROM volunteer_signups WHERE event_id = $1 ORDER BY created_at ASC, id ASC",
            SIGNUP_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        Ok(signups)
    }

    /// All signups made by a person, including cancelled history
    pub async fn list_for_person(conn: &mut PgConnection, person_id: i64) -> Result<Vec<VolunteerSignup>> {
        let signups = sqlx::query_as::<_, VolunteerSignup>(&format!(
            "SELECT {} FROM volunteer_signups WHERE person_id = $1 ORDER BY created_at ASC, id ASC",
            SIGNUP_COLUMNS
        ))
        .bind(person_id)
        .fetch_all(conn)
        .await?;

        Ok(signups)
    }
}
