//! Sliding window of outcome buckets.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::command::outcome::ExecutionOutcome;
use crate::stats::bucket::Bucket;

/// Aggregated counts over the live window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Executed requests in the window (successes + failures + timeouts).
    pub total_requests: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub timeout_count: u64,
    /// Short-circuited requests; not part of `total_requests`.
    pub rejected_count: u64,
}

impl StatsSnapshot {
    /// Percentage of executed requests that failed or timed out.
    pub fn error_percentage(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        (self.failure_count + self.timeout_count) as f64 * 100.0 / self.total_requests as f64
    }
}

/// Time-bucketed outcome counters over a sliding window.
///
/// The window is divided into `bucket_count` slots of equal width. A
/// recorded outcome lands in the bucket covering its timestamp; buckets
/// whose slot has left the window are evicted. Both `record` and
/// `snapshot` touch at most `bucket_count` buckets.
#[derive(Debug)]
pub struct RollingStats {
    origin: Instant,
    bucket_width_ms: u64,
    bucket_count: u64,
    buckets: Mutex<VecDeque<Bucket>>,
}

impl RollingStats {
    pub fn new(window: Duration, bucket_count: u32) -> Self {
        let bucket_count = u64::from(bucket_count.max(1));
        let window_ms = window.as_millis() as u64;
        Self {
            origin: Instant::now(),
            bucket_width_ms: (window_ms / bucket_count).max(1),
            bucket_count,
            buckets: Mutex::new(VecDeque::with_capacity(bucket_count as usize)),
        }
    }

    /// Record an outcome against the current time.
    pub fn record(&self, outcome: ExecutionOutcome) {
        self.record_at(outcome, Instant::now());
    }

    /// Record an outcome against an explicit timestamp.
    ///
    /// A timestamp older than every live bucket is counted into the
    /// oldest live bucket rather than dropped.
    pub fn record_at(&self, outcome: ExecutionOutcome, now: Instant) {
        let slot = self.slot_at(now);
        let mut buckets = self.buckets.lock().expect("rolling stats mutex poisoned");

        // Evict buckets that have left the window.
        while buckets
            .front()
            .is_some_and(|b| b.slot + self.bucket_count <= slot)
        {
            buckets.pop_front();
        }

        let newest_slot = buckets.back().map(|b| b.slot);
        match newest_slot {
            Some(newest) if newest > slot => {
                // Timestamp behind the newest bucket: count into the exact
                // slot if it is still live, otherwise into the oldest.
                if let Some(bucket) = buckets.iter_mut().find(|b| b.slot == slot) {
                    bucket.record(outcome);
                } else if let Some(front) = buckets.front_mut() {
                    front.record(outcome);
                }
                return;
            }
            Some(newest) if newest == slot => {}
            _ => buckets.push_back(Bucket::new(slot)),
        }

        if let Some(back) = buckets.back_mut() {
            back.record(outcome);
        }
    }

    /// Aggregate counts over buckets still inside the window.
    pub fn snapshot(&self) -> StatsSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> StatsSnapshot {
        let slot = self.slot_at(now);
        let min_live = slot.saturating_sub(self.bucket_count - 1);
        let buckets = self.buckets.lock().expect("rolling stats mutex poisoned");

        let mut snapshot = StatsSnapshot::default();
        for bucket in buckets.iter().filter(|b| b.slot >= min_live) {
            snapshot.success_count += bucket.success_count;
            snapshot.failure_count += bucket.failure_count;
            snapshot.timeout_count += bucket.timeout_count;
            snapshot.rejected_count += bucket.rejected_count;
        }
        snapshot.total_requests =
            snapshot.success_count + snapshot.failure_count + snapshot.timeout_count;
        snapshot
    }

    /// Drop every bucket. Used when the breaker closes after a trial.
    pub fn reset(&self) {
        self.buckets
            .lock()
            .expect("rolling stats mutex poisoned")
            .clear();
    }

    fn slot_at(&self, now: Instant) -> u64 {
        let elapsed_ms = now.saturating_duration_since(self.origin).as_millis() as u64;
        elapsed_ms / self.bucket_width_ms
    }
}
