//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Tuning for one command group.
///
/// Shared read-only by the group's breaker and executor; every field is
/// required in configuration files.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommandConfig {
    /// Minimum executed requests in the rolling window before the error
    /// percentage is evaluated at all.
    pub request_volume_threshold: u32,

    /// Error percentage (0-100) at or above which the circuit opens.
    pub error_threshold_percentage: u8,

    /// How long an opened circuit rejects requests before admitting a
    /// trial.
    pub sleep_window_ms: u64,

    /// Deadline for a single operation execution.
    pub execution_timeout_ms: u64,

    /// Span of the rolling statistics window.
    pub window_ms: u64,

    /// Number of buckets the window is divided into.
    pub bucket_count: u32,
}

/// Root of a command configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommandFileConfig {
    /// Command group definitions.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// One named command group in a configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GroupConfig {
    /// Group identifier keying breaker state, logs and metrics.
    pub name: String,

    /// Breaker and executor tuning for this group.
    #[serde(flatten)]
    pub command: CommandConfig,
}
