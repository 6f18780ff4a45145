//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! breaker + executor produce:
//!     → tracing events at the call sites (structured log fields)
//!     → metrics.rs (outcome and transition counters)
//!
//! Consumers:
//!     → whatever subscriber/recorder the host process installs
//! ```
//!
//! # Design Decisions
//! - This crate only emits; installing a tracing subscriber or a metrics
//!   recorder is the embedding application's job
//! - Metrics are cheap counter increments labeled by group
//! - No exporter ships here

pub mod metrics;
