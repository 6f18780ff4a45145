//! Supervised execution of a single command group.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::breaker::circuit::CircuitBreaker;
use crate::breaker::state::CircuitState;
use crate::command::error::CommandError;
use crate::command::outcome::{CommandResponse, ExecutionOutcome, FallbackTrigger};
use crate::config::schema::CommandConfig;
use crate::observability::metrics;
use crate::stats::rolling::{RollingStats, StatsSnapshot};

/// Executes commands against one remote dependency.
///
/// Holds the group's breaker and rolling statistics; both live as long as
/// the executor. Distinct dependencies get distinct executors.
pub struct CommandExecutor {
    group: String,
    config: Arc<CommandConfig>,
    stats: Arc<RollingStats>,
    breaker: CircuitBreaker,
}

impl CommandExecutor {
    pub fn new(group: impl Into<String>, config: CommandConfig) -> Self {
        let group = group.into();
        let config = Arc::new(config);
        let stats = Arc::new(RollingStats::new(
            Duration::from_millis(config.window_ms),
            config.bucket_count,
        ));
        let breaker = CircuitBreaker::new(group.clone(), Arc::clone(&config), Arc::clone(&stats));
        Self {
            group,
            config,
            stats,
            breaker,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    /// Current breaker state, for observability and tests.
    pub fn state(&self) -> CircuitState {
        self.breaker.current_state()
    }

    /// Aggregated outcome counts over the live window.
    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Run `operation` under breaker supervision, falling back on
    /// failure, timeout or rejection.
    ///
    /// The operation runs as a spawned task joined under the configured
    /// execution deadline. On timeout the task handle is aborted; the
    /// abort is a cancellation signal to the waiting side only, so
    /// blocking work inside the operation may outlive the deadline.
    ///
    /// The fallback runs on the caller's task. If it fails, that error is
    /// terminal and surfaces as [`CommandError::FallbackFailure`].
    pub async fn execute<T, E, F, Fut, FB, FbFut>(
        &self,
        operation: F,
        fallback: FB,
    ) -> Result<CommandResponse<T>, CommandError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: fmt::Debug + Send + 'static,
        FB: FnOnce() -> FbFut,
        FbFut: Future<Output = Result<T, E>>,
    {
        if !self.breaker.allow_request() {
            self.record(ExecutionOutcome::ShortCircuited);
            tracing::debug!(group = %self.group, "request short-circuited");
            return self.run_fallback(fallback, FallbackTrigger::ShortCircuited).await;
        }

        let deadline = Duration::from_millis(self.config.execution_timeout_ms);
        let mut handle = tokio::spawn(operation());

        match tokio::time::timeout(deadline, &mut handle).await {
            Ok(Ok(Ok(value))) => {
                self.record(ExecutionOutcome::Success);
                Ok(CommandResponse::primary(value))
            }
            Ok(Ok(Err(error))) => {
                self.record(ExecutionOutcome::Failure);
                tracing::debug!(group = %self.group, error = ?error, "operation failed");
                self.run_fallback(fallback, FallbackTrigger::OperationFailure).await
            }
            Ok(Err(join_error)) => {
                // The task panicked or was aborted externally.
                self.record(ExecutionOutcome::Failure);
                tracing::warn!(group = %self.group, error = %join_error, "operation task died");
                self.run_fallback(fallback, FallbackTrigger::OperationFailure).await
            }
            Err(_) => {
                handle.abort();
                self.record(ExecutionOutcome::Timeout);
                tracing::warn!(
                    group = %self.group,
                    timeout_ms = self.config.execution_timeout_ms,
                    "operation timed out"
                );
                self.run_fallback(fallback, FallbackTrigger::OperationTimeout).await
            }
        }
    }

    async fn run_fallback<T, E, FB, FbFut>(
        &self,
        fallback: FB,
        trigger: FallbackTrigger,
    ) -> Result<CommandResponse<T>, CommandError<E>>
    where
        FB: FnOnce() -> FbFut,
        FbFut: Future<Output = Result<T, E>>,
    {
        match fallback().await {
            Ok(value) => Ok(CommandResponse::fallback(value, trigger)),
            Err(source) => {
                tracing::warn!(group = %self.group, trigger = %trigger, "fallback failed");
                Err(CommandError::FallbackFailure { trigger, source })
            }
        }
    }

    fn record(&self, outcome: ExecutionOutcome) {
        self.stats.record(outcome);
        self.breaker.note_outcome(outcome);
        metrics::record_outcome(&self.group, outcome);
    }
}
