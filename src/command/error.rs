//! Errors surfaced by command execution.

use thiserror::Error;

use crate::command::outcome::FallbackTrigger;

/// Errors a caller of `execute` can observe.
///
/// Operation failures, timeouts and short-circuits are absorbed into a
/// fallback invocation; only a failing fallback reaches the caller, since
/// at that point there is no further degradation path.
#[derive(Debug, Error)]
pub enum CommandError<E> {
    /// The fallback itself failed after the primary path was abandoned.
    #[error("fallback failed after {trigger}")]
    FallbackFailure {
        /// What sent execution down the fallback path.
        trigger: FallbackTrigger,
        /// The fallback's own error.
        source: E,
    },
}

impl<E> CommandError<E> {
    pub fn trigger(&self) -> FallbackTrigger {
        match self {
            CommandError::FallbackFailure { trigger, .. } => *trigger,
        }
    }

    pub fn into_source(self) -> E {
        match self {
            CommandError::FallbackFailure { source, .. } => source,
        }
    }
}
