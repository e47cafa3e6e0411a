//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! helpers for participation and administration actions.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::{ParticipationError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// must hold it for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| ParticipationError::Config(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| ParticipationError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a participation change made through one of the coordinators
pub fn log_participation_action(event_id: i64, person_id: i64, action: &str, details: Option<&str>) {
    info!(
        event_id = event_id,
        person_id = person_id,
        action = action,
        details = details,
        "Participation action performed"
    );
}

/// Log a rejected participation request
pub fn log_participation_rejected(event_id: i64, person_id: i64, action: &str, reason: &str) {
    debug!(
        event_id = event_id,
        person_id = person_id,
        action = action,
        reason = reason,
        "Participation request rejected"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: Option<i64>, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log payment side channel updates
pub fn log_payment_update(rsvp_id: i64, outcome: &str, amount_cents: i64) {
    info!(
        rsvp_id = rsvp_id,
        outcome = outcome,
        amount_cents = amount_cents,
        "Payment status updated"
    );
}

/// Log a broken engine invariant. These are bugs, never user errors.
pub fn log_invariant_violation(event_id: i64, person_id: Option<i64>, details: &str) {
    error!(
        event_id = event_id,
        person_id = person_id,
        details = details,
        "Participation invariant violated"
    );
}

/// Log a transaction retry after a conflict
pub fn log_transaction_retry(operation: &str, attempt: u32, error: &str) {
    warn!(
        operation = operation,
        attempt = attempt,
        error = error,
        "Retrying transaction after conflict"
    );
}
