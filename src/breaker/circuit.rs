//! Circuit breaker state machine.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::breaker::state::CircuitState;
use crate::command::outcome::ExecutionOutcome;
use crate::config::schema::CommandConfig;
use crate::observability::metrics;
use crate::stats::rolling::RollingStats;

/// Per-group admission decisions driven by rolling statistics.
///
/// The state byte and the opened-at timestamp are atomics; every
/// transition goes through `compare_exchange`, so concurrent callers
/// racing for the half-open trial slot produce exactly one winner.
pub struct CircuitBreaker {
    group: String,
    config: Arc<CommandConfig>,
    stats: Arc<RollingStats>,
    origin: Instant,
    state: AtomicU8,
    /// Milliseconds since `origin` of the last transition into Open.
    opened_at_ms: AtomicU64,
}

impl CircuitBreaker {
    pub fn new(group: String, config: Arc<CommandConfig>, stats: Arc<RollingStats>) -> Self {
        Self {
            group,
            config,
            stats,
            origin: Instant::now(),
            state: AtomicU8::new(CircuitState::Closed as u8),
            opened_at_ms: AtomicU64::new(0),
        }
    }

    pub fn current_state(&self) -> CircuitState {
        CircuitState::from(self.state.load(Ordering::Acquire))
    }

    /// Decide whether a request may execute right now.
    pub fn allow_request(&self) -> bool {
        self.allow_request_at(Instant::now())
    }

    pub fn allow_request_at(&self, now: Instant) -> bool {
        match self.current_state() {
            CircuitState::Closed => {
                let snapshot = self.stats.snapshot_at(now);
                let volume_met = snapshot.total_requests
                    >= u64::from(self.config.request_volume_threshold);
                let errors_met = snapshot.error_percentage()
                    >= f64::from(self.config.error_threshold_percentage);
                if volume_met && errors_met {
                    self.trip(CircuitState::Closed, now);
                    return false;
                }
                true
            }
            CircuitState::Open => {
                let opened_at = self.opened_at_ms.load(Ordering::Acquire);
                let since_open = self.elapsed_ms(now).saturating_sub(opened_at);
                if since_open >= self.config.sleep_window_ms
                    && self.transition(CircuitState::Open, CircuitState::HalfOpen)
                {
                    metrics::record_transition(&self.group, CircuitState::HalfOpen);
                    tracing::info!(
                        group = %self.group,
                        "sleep window elapsed, admitting trial request"
                    );
                    return true;
                }
                false
            }
            // The trial is already in flight; everyone else fails fast.
            CircuitState::HalfOpen => false,
        }
    }

    /// Feed an execution outcome back into the state machine.
    ///
    /// Only the half-open trial reacts here: while the breaker is
    /// half-open no other request executes, so any success, failure or
    /// timeout observed in that state belongs to the trial. Closed-state
    /// trips happen inside `allow_request`, and rejections never drive
    /// transitions.
    pub fn note_outcome(&self, outcome: ExecutionOutcome) {
        self.note_outcome_at(outcome, Instant::now());
    }

    pub fn note_outcome_at(&self, outcome: ExecutionOutcome, now: Instant) {
        if self.current_state() != CircuitState::HalfOpen {
            return;
        }
        match outcome {
            ExecutionOutcome::Success => {
                // Reset before closing so the closed breaker starts from a
                // clean window.
                self.stats.reset();
                if self.transition(CircuitState::HalfOpen, CircuitState::Closed) {
                    metrics::record_transition(&self.group, CircuitState::Closed);
                    tracing::info!(group = %self.group, "trial succeeded, circuit closed");
                }
            }
            ExecutionOutcome::Failure | ExecutionOutcome::Timeout => {
                self.trip(CircuitState::HalfOpen, now);
            }
            ExecutionOutcome::ShortCircuited => {}
        }
    }

    fn trip(&self, from: CircuitState, now: Instant) {
        // Publish the timestamp before the state so no reader observes
        // Open with a stale opened-at value.
        self.opened_at_ms.store(self.elapsed_ms(now), Ordering::Release);
        if self.transition(from, CircuitState::Open) {
            metrics::record_transition(&self.group, CircuitState::Open);
            match from {
                CircuitState::Closed => tracing::warn!(
                    group = %self.group,
                    "error threshold exceeded, circuit opened"
                ),
                _ => tracing::warn!(
                    group = %self.group,
                    "trial failed, circuit reopened"
                ),
            }
        }
    }

    fn transition(&self, from: CircuitState, to: CircuitState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn elapsed_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.origin).as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> CommandConfig {
        CommandConfig {
            request_volume_threshold: 3,
            error_threshold_percentage: 50,
            sleep_window_ms: 500,
            execution_timeout_ms: 100,
            window_ms: 10_000,
            bucket_count: 10,
        }
    }

    fn breaker(config: CommandConfig) -> (CircuitBreaker, Arc<RollingStats>) {
        let config = Arc::new(config);
        let stats = Arc::new(RollingStats::new(
            Duration::from_millis(config.window_ms),
            config.bucket_count,
        ));
        let breaker = CircuitBreaker::new("test".into(), config, Arc::clone(&stats));
        (breaker, stats)
    }

    fn at(breaker: &CircuitBreaker, offset_ms: u64) -> Instant {
        breaker.origin + Duration::from_millis(offset_ms)
    }

    #[test]
    fn starts_closed_and_admits() {
        let (breaker, _stats) = breaker(config());
        assert_eq!(breaker.current_state(), CircuitState::Closed);
        assert!(breaker.allow_request_at(at(&breaker, 0)));
    }

    #[test]
    fn stays_closed_below_volume_threshold() {
        let (breaker, stats) = breaker(config());
        stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));

        // 2 requests at 100% errors, but volume threshold is 3.
        assert!(breaker.allow_request_at(at(&breaker, 20)));
        assert_eq!(breaker.current_state(), CircuitState::Closed);
    }

    #[test]
    fn trips_at_inclusive_thresholds() {
        let (breaker, stats) = breaker(config());
        stats.record_at(ExecutionOutcome::Success, at(&breaker, 10));
        stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        stats.record_at(ExecutionOutcome::Timeout, at(&breaker, 10));
        stats.record_at(ExecutionOutcome::Success, at(&breaker, 10));

        // Exactly 4 >= 3 requests and exactly 50% >= 50% errors.
        assert!(!breaker.allow_request_at(at(&breaker, 20)));
        assert_eq!(breaker.current_state(), CircuitState::Open);
    }

    #[test]
    fn rejects_during_sleep_window() {
        let (breaker, stats) = breaker(config());
        for _ in 0..3 {
            stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        }
        assert!(!breaker.allow_request_at(at(&breaker, 20)));

        assert!(!breaker.allow_request_at(at(&breaker, 100)));
        assert!(!breaker.allow_request_at(at(&breaker, 519)));
        assert_eq!(breaker.current_state(), CircuitState::Open);
    }

    #[test]
    fn admits_single_trial_after_sleep_window() {
        let (breaker, stats) = breaker(config());
        for _ in 0..3 {
            stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        }
        assert!(!breaker.allow_request_at(at(&breaker, 20)));

        // First caller past the window wins the trial, the rest fail fast.
        assert!(breaker.allow_request_at(at(&breaker, 520)));
        assert_eq!(breaker.current_state(), CircuitState::HalfOpen);
        assert!(!breaker.allow_request_at(at(&breaker, 521)));
        assert!(!breaker.allow_request_at(at(&breaker, 600)));
    }

    #[test]
    fn trial_success_closes_and_resets() {
        let (breaker, stats) = breaker(config());
        for _ in 0..3 {
            stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        }
        assert!(!breaker.allow_request_at(at(&breaker, 20)));
        assert!(breaker.allow_request_at(at(&breaker, 520)));

        breaker.note_outcome_at(ExecutionOutcome::Success, at(&breaker, 540));
        assert_eq!(breaker.current_state(), CircuitState::Closed);
        assert_eq!(stats.snapshot_at(at(&breaker, 540)).total_requests, 0);
        assert!(breaker.allow_request_at(at(&breaker, 550)));
    }

    #[test]
    fn trial_failure_reopens_and_extends_window() {
        let (breaker, stats) = breaker(config());
        for _ in 0..3 {
            stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        }
        assert!(!breaker.allow_request_at(at(&breaker, 20)));
        assert!(breaker.allow_request_at(at(&breaker, 520)));

        breaker.note_outcome_at(ExecutionOutcome::Timeout, at(&breaker, 600));
        assert_eq!(breaker.current_state(), CircuitState::Open);

        // The sleep window restarts at the trial failure time.
        assert!(!breaker.allow_request_at(at(&breaker, 1050)));
        assert!(breaker.allow_request_at(at(&breaker, 1100)));
    }

    #[test]
    fn rejections_do_not_drive_transitions() {
        let (breaker, stats) = breaker(config());
        for _ in 0..3 {
            stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        }
        assert!(!breaker.allow_request_at(at(&breaker, 20)));
        assert!(breaker.allow_request_at(at(&breaker, 520)));

        breaker.note_outcome_at(ExecutionOutcome::ShortCircuited, at(&breaker, 530));
        assert_eq!(breaker.current_state(), CircuitState::HalfOpen);
    }

    #[test]
    fn concurrent_callers_get_one_trial() {
        let cfg = CommandConfig {
            sleep_window_ms: 0,
            ..config()
        };
        let (breaker, stats) = breaker(cfg);
        for _ in 0..3 {
            stats.record_at(ExecutionOutcome::Failure, at(&breaker, 10));
        }
        assert!(!breaker.allow_request_at(at(&breaker, 20)));

        let breaker = Arc::new(breaker);
        let admitted = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let breaker = Arc::clone(&breaker);
            let admitted = Arc::clone(&admitted);
            handles.push(std::thread::spawn(move || {
                if breaker.allow_request() {
                    admitted.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(admitted.load(Ordering::SeqCst), 1);
        assert_eq!(breaker.current_state(), CircuitState::HalfOpen);
    }
}
