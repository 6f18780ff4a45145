//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds, window geometry, deadlines)
//! - Detect duplicate group names
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: CommandFileConfig → Result<(), Vec<ValidationError>>
//! - Runs before any group is built from the config

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{CommandConfig, CommandFileConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("group '{group}': error_threshold_percentage must be 0-100, got {value}")]
    ErrorThresholdOutOfRange { group: String, value: u8 },

    #[error("group '{group}': bucket_count must be at least 1")]
    ZeroBucketCount { group: String },

    #[error("group '{group}': window_ms ({window_ms}) must cover at least 1ms per bucket ({bucket_count} buckets)")]
    WindowTooSmall {
        group: String,
        window_ms: u64,
        bucket_count: u32,
    },

    #[error("group '{group}': execution_timeout_ms must be greater than zero")]
    ZeroExecutionTimeout { group: String },

    #[error("duplicate group name '{group}'")]
    DuplicateGroup { group: String },
}

/// Check every group; collect every problem.
pub fn validate_config(config: &CommandFileConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for group in &config.groups {
        if !seen.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup {
                group: group.name.clone(),
            });
        }
        validate_command(&group.name, &group.command, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_command(group: &str, config: &CommandConfig, errors: &mut Vec<ValidationError>) {
    if config.error_threshold_percentage > 100 {
        errors.push(ValidationError::ErrorThresholdOutOfRange {
            group: group.to_string(),
            value: config.error_threshold_percentage,
        });
    }
    if config.bucket_count == 0 {
        errors.push(ValidationError::ZeroBucketCount {
            group: group.to_string(),
        });
    } else if config.window_ms < u64::from(config.bucket_count) {
        errors.push(ValidationError::WindowTooSmall {
            group: group.to_string(),
            window_ms: config.window_ms,
            bucket_count: config.bucket_count,
        });
    }
    if config.execution_timeout_ms == 0 {
        errors.push(ValidationError::ZeroExecutionTimeout {
            group: group.to_string(),
        });
    }
}
