//! Circuit-breaker protected command execution.

pub mod breaker;
pub mod command;
pub mod config;
pub mod observability;
pub mod stats;

pub use breaker::state::CircuitState;
pub use command::error::CommandError;
pub use command::executor::CommandExecutor;
pub use command::outcome::{CommandResponse, ExecutionOutcome, FallbackTrigger, ResponseSource};
pub use command::registry::CommandRegistry;
pub use config::schema::CommandConfig;
pub use stats::rolling::StatsSnapshot;
