//! Rolling statistics subsystem.
//!
//! # Data Flow
//! ```text
//! Command outcome (success/failure/timeout/rejection)
//!     → bucket.rs (per-slot counters)
//!     → rolling.rs (sliding window, eviction, aggregation)
//!     → snapshot read by the circuit breaker trip check
//! ```
//!
//! # Design Decisions
//! - Fixed bucket count; snapshot cost never depends on request volume
//! - Buckets older than the window are evicted, never zeroed in place
//! - Rejections are counted for observability but excluded from the
//!   request volume that feeds the trip condition

pub mod bucket;
pub mod rolling;

pub use rolling::RollingStats;
pub use rolling::StatsSnapshot;
