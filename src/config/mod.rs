//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CommandFileConfig (validated, immutable)
//!     → CommandRegistry builds one group per entry
//! ```
//!
//! # Design Decisions
//! - Every tuning field is required; there are no hidden defaults
//! - A group's configuration is immutable once the group exists
//! - Validation separates syntactic (serde) from semantic checks and
//!   returns all errors, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::CommandConfig;
pub use schema::CommandFileConfig;
pub use schema::GroupConfig;
