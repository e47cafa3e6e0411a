//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ParticipationError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    if settings.engine.storage == StorageBackend::Postgres {
        validate_database_config(&settings.database)?;
    }
    validate_engine_config(&settings.engine)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(ParticipationError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(ParticipationError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ParticipationError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ParticipationError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ParticipationError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(ParticipationError::Config(
            "Acquire timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate engine configuration
fn validate_engine_config(config: &super::EngineConfig) -> Result<()> {
    if config.max_transaction_retries > 10 {
        return Err(ParticipationError::Config(
            "Max transaction retries cannot exceed 10".to_string()
        ));
    }

    if config.retry_backoff_ms > 5_000 {
        return Err(ParticipationError::Config(
            "Retry backoff cannot exceed 5000ms".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ParticipationError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ParticipationError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if config.file_prefix.is_empty() {
        return Err(ParticipationError::Config(
            "Log file prefix is required".to_string()
        ));
    }

    Ok(())
}
