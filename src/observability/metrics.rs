//! Metric definitions and recording helpers.
//!
//! # Metrics
//! - `command_outcomes_total` (counter): executions by group, outcome
//! - `circuit_transitions_total` (counter): breaker state changes by
//!   group, new state

use crate::breaker::state::CircuitState;
use crate::command::outcome::ExecutionOutcome;

pub const COMMAND_OUTCOMES_TOTAL: &str = "command_outcomes_total";
pub const CIRCUIT_TRANSITIONS_TOTAL: &str = "circuit_transitions_total";

pub fn record_outcome(group: &str, outcome: ExecutionOutcome) {
    metrics::counter!(
        COMMAND_OUTCOMES_TOTAL,
        "group" => group.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_transition(group: &str, to: CircuitState) {
    metrics::counter!(
        CIRCUIT_TRANSITIONS_TOTAL,
        "group" => group.to_string(),
        "state" => to.as_str()
    )
    .increment(1);
}
