//! Error handling for the participation engine
//!
//! This module defines the main error type used throughout the crate.
//! Domain errors carry user-facing messages, infrastructure errors are
//! classified so callers can decide whether to retry, and invariant
//! violations are kept apart because they indicate a bug in the engine.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::PaymentStatus;

/// Main error type for the participation engine
#[derive(Error, Debug)]
pub enum ParticipationError {
    #[error("Event not found or no longer active")]
    EventNotFound { event_id: i64 },

    #[error("This event is not accepting volunteers")]
    EventNotAcceptingVolunteers { event_id: i64 },

    #[error("This event is full")]
    EventFull { event_id: i64, capacity: i32 },

    #[error("You are already signed up for this event")]
    AlreadySignedUp { person_id: i64, event_id: i64 },

    #[error("You have already RSVPed for this event")]
    AlreadyRsvped { person_id: i64, event_id: i64 },

    #[error("You are not signed up for this volunteer opportunity")]
    SignupNotFound { person_id: i64, event_id: i64 },

    #[error("You have not RSVPed to this event")]
    RsvpNotFound { person_id: i64, event_id: i64 },

    #[error("RSVP {rsvp_id} not found")]
    RsvpRecordNotFound { rsvp_id: i64 },

    #[error("Duplicate volunteer signup for person {person_id} at event {event_id}")]
    DuplicateSignup { person_id: i64, event_id: i64 },

    #[error("Duplicate RSVP for person {person_id} at event {event_id}")]
    DuplicateRsvp { person_id: i64, event_id: i64 },

    #[error("Invalid payment transition for RSVP {rsvp_id}: {from} -> {to}")]
    InvalidPaymentTransition {
        rsvp_id: i64,
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid request body: {0}")]
    InvalidJson(#[from] JsonRejection),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ParticipationError>;

impl From<sqlx::Error> for ParticipationError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code().map(|code| code.into_owned());
            // serialization_failure, deadlock_detected
            if matches!(code.as_deref(), Some("40001") | Some("40P01")) {
                return ParticipationError::TransactionConflict(db_err.message().to_string());
            }
        }

        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => ParticipationError::StorageUnavailable(err.to_string()),
            other => ParticipationError::Database(other),
        }
    }
}

impl From<config::ConfigError> for ParticipationError {
    fn from(err: config::ConfigError) -> Self {
        ParticipationError::Config(err.to_string())
    }
}

/// Returns true when `err` is a unique-index violation reported by the database
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

impl ParticipationError {
    /// Check if the error is recoverable by retrying the same request
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParticipationError::StorageUnavailable(_) | ParticipationError::TransactionConflict(_)
        )
    }

    /// Domain errors are user-correctable and rendered verbatim
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ParticipationError::EventNotFound { .. }
                | ParticipationError::EventNotAcceptingVolunteers { .. }
                | ParticipationError::EventFull { .. }
                | ParticipationError::AlreadySignedUp { .. }
                | ParticipationError::AlreadyRsvped { .. }
                | ParticipationError::SignupNotFound { .. }
                | ParticipationError::RsvpNotFound { .. }
                | ParticipationError::RsvpRecordNotFound { .. }
                | ParticipationError::DuplicateSignup { .. }
                | ParticipationError::DuplicateRsvp { .. }
                | ParticipationError::InvalidPaymentTransition { .. }
                | ParticipationError::InvalidInput(_)
                | ParticipationError::InvalidJson(_)
                | ParticipationError::InvalidPath(_)
        )
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ParticipationError::EventNotFound { .. } => "event_not_found",
            ParticipationError::EventNotAcceptingVolunteers { .. } => "event_not_accepting_volunteers",
            ParticipationError::EventFull { .. } => "event_full",
            ParticipationError::AlreadySignedUp { .. } => "already_signed_up",
            ParticipationError::AlreadyRsvped { .. } => "already_rsvped",
            ParticipationError::SignupNotFound { .. } => "signup_not_found",
            ParticipationError::RsvpNotFound { .. } => "rsvp_not_found",
            ParticipationError::RsvpRecordNotFound { .. } => "rsvp_record_not_found",
            ParticipationError::DuplicateSignup { .. } => "duplicate_signup",
            ParticipationError::DuplicateRsvp { .. } => "duplicate_rsvp",
            ParticipationError::InvalidPaymentTransition { .. } => "invalid_payment_transition",
            ParticipationError::InvalidInput(_) => "invalid_input",
            ParticipationError::InvalidJson(_) | ParticipationError::InvalidPath(_) => "invalid_request",
            ParticipationError::StorageUnavailable(_) => "storage_unavailable",
            ParticipationError::TransactionConflict(_) => "transaction_conflict",
            ParticipationError::InvariantViolation(_) => "invariant_violation",
            ParticipationError::Database(_) => "database_error",
            ParticipationError::Migration(_) => "migration_error",
            ParticipationError::Config(_) => "config_error",
            ParticipationError::Io(_) => "io_error",
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ParticipationError::InvariantViolation(_) => ErrorSeverity::Critical,
            ParticipationError::Database(_) => ErrorSeverity::Critical,
            ParticipationError::Migration(_) => ErrorSeverity::Critical,
            ParticipationError::Config(_) => ErrorSeverity::Critical,
            ParticipationError::StorageUnavailable(_) => ErrorSeverity::Error,
            ParticipationError::TransactionConflict(_) => ErrorSeverity::Warning,
            ParticipationError::Io(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Info,
        }
    }

    /// HTTP status used when the error crosses the request/response boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            ParticipationError::EventNotFound { .. }
            | ParticipationError::SignupNotFound { .. }
            | ParticipationError::RsvpNotFound { .. }
            | ParticipationError::RsvpRecordNotFound { .. } => StatusCode::NOT_FOUND,
            ParticipationError::EventFull { .. }
            | ParticipationError::AlreadySignedUp { .. }
            | ParticipationError::AlreadyRsvped { .. }
            | ParticipationError::DuplicateSignup { .. }
            | ParticipationError::DuplicateRsvp { .. }
            | ParticipationError::InvalidPaymentTransition { .. } => StatusCode::CONFLICT,
            ParticipationError::EventNotAcceptingVolunteers { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ParticipationError::InvalidInput(_)
            | ParticipationError::InvalidJson(_)
            | ParticipationError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ParticipationError::StorageUnavailable(_)
            | ParticipationError::TransactionConflict(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ParticipationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_domain() {
            self.to_string()
        } else if self.is_recoverable() {
            warn!(error = %self, kind = self.kind(), "Recoverable infrastructure error");
            "The service is temporarily unavailable, please try again".to_string()
        } else {
            error!(error = %self, kind = self.kind(), severity = %self.severity(), "Internal error");
            "Internal server error".to_string()
        };

        (status, Json(json!({ "error": self.kind(), "message": message }))).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
