//! Outcome classification and response provenance.

use std::fmt;

/// Terminal classification of one command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Failure,
    Timeout,
    ShortCircuited,
}

impl ExecutionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionOutcome::Success => "success",
            ExecutionOutcome::Failure => "failure",
            ExecutionOutcome::Timeout => "timeout",
            ExecutionOutcome::ShortCircuited => "short_circuited",
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fallback was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTrigger {
    /// The operation returned an error.
    OperationFailure,
    /// The operation missed its execution deadline.
    OperationTimeout,
    /// The breaker rejected the request without running the operation.
    ShortCircuited,
}

impl fmt::Display for FallbackTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackTrigger::OperationFailure => "operation failure",
            FallbackTrigger::OperationTimeout => "operation timeout",
            FallbackTrigger::ShortCircuited => "short-circuit",
        };
        f.write_str(s)
    }
}

/// Where a returned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// The operation completed before its deadline.
    Primary,
    /// The fallback supplied the value.
    Fallback(FallbackTrigger),
}

/// A command result plus its provenance.
///
/// Callers that only care about the value use `into_value`; the source is
/// the diagnostic that tells a fallback value apart from a primary one.
#[derive(Debug)]
pub struct CommandResponse<T> {
    value: T,
    source: ResponseSource,
}

impl<T> CommandResponse<T> {
    pub(crate) fn primary(value: T) -> Self {
        Self {
            value,
            source: ResponseSource::Primary,
        }
    }

    pub(crate) fn fallback(value: T, trigger: FallbackTrigger) -> Self {
        Self {
            value,
            source: ResponseSource::Fallback(trigger),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn source(&self) -> ResponseSource {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ResponseSource::Fallback(_))
    }
}
