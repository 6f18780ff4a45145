//! Circuit breaker subsystem.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: dependency assumed down, requests fail fast
//! - Half-Open: testing whether the dependency recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: request volume and error percentage thresholds both met
//! Open → Half-Open: after the sleep window elapses
//! Half-Open → Closed: trial request succeeds (statistics reset)
//! Half-Open → Open: trial request fails or times out (window extended)
//! ```
//!
//! # Design Decisions
//! - One breaker per command group, never global
//! - Fail fast in Open state (no waiting for the operation timeout)
//! - Single trial in Half-Open; admission races resolved by compare-exchange
//! - Rejections never feed the trip condition

pub mod circuit;
pub mod state;

pub use circuit::CircuitBreaker;
pub use state::CircuitState;
