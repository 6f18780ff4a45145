//! Command execution subsystem.
//!
//! # Data Flow
//! ```text
//! Caller
//!     → executor.rs (breaker admission, spawned operation, timeout join)
//!     → outcome.rs (execution outcome, fallback trigger, response source)
//!     → stats + breaker (outcome recording)
//!     → value returned, or fallback value, or error.rs on fallback failure
//! ```
//!
//! # Design Decisions
//! - Operation and fallback are plain async closures returning `Result`
//! - The operation runs as a spawned task; timeout aborts the join, not
//!   necessarily the work
//! - Fallback failures are terminal, never retried
//! - Groups are explicit objects; registry.rs keys them by name

pub mod error;
pub mod executor;
pub mod outcome;
pub mod registry;

pub use error::CommandError;
pub use executor::CommandExecutor;
pub use registry::CommandRegistry;
