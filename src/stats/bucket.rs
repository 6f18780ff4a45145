//! Per-slot outcome counters.

use crate::command::outcome::ExecutionOutcome;

/// Counters for one time slot of the rolling window.
///
/// A bucket belongs to exactly one slot (`elapsed / bucket_width`) and is
/// only ever mutated while its slot is live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    /// Window slot this bucket covers.
    pub slot: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub timeout_count: u64,
    pub rejected_count: u64,
}

impl Bucket {
    pub fn new(slot: u64) -> Self {
        Self {
            slot,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: ExecutionOutcome) {
        match outcome {
            ExecutionOutcome::Success => self.success_count += 1,
            ExecutionOutcome::Failure => self.failure_count += 1,
            ExecutionOutcome::Timeout => self.timeout_count += 1,
            ExecutionOutcome::ShortCircuited => self.rejected_count += 1,
        }
    }
}
