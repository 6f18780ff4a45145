//! Command group registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::command::executor::CommandExecutor;
use crate::config::schema::{CommandConfig, CommandFileConfig};

/// Explicitly constructed collection of command groups keyed by name.
///
/// Each group owns an independent breaker and statistics window. The
/// registry is an ordinary value the caller builds and passes around;
/// nothing here is global.
#[derive(Default)]
pub struct CommandRegistry {
    groups: DashMap<String, Arc<CommandExecutor>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }

    /// Build a registry with one group per configured entry.
    pub fn from_config(config: &CommandFileConfig) -> Self {
        let registry = Self::new();
        for group in &config.groups {
            registry.group(&group.name, group.command.clone());
        }
        registry
    }

    /// Fetch the executor for `name`, creating it with `config` on first
    /// use. Later calls for the same name ignore `config`.
    pub fn group(&self, name: &str, config: CommandConfig) -> Arc<CommandExecutor> {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(CommandExecutor::new(name, config)))
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<CommandExecutor>> {
        self.groups.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CommandConfig {
        CommandConfig {
            request_volume_threshold: 1,
            error_threshold_percentage: 50,
            sleep_window_ms: 1000,
            execution_timeout_ms: 100,
            window_ms: 10_000,
            bucket_count: 10,
        }
    }

    #[test]
    fn same_name_returns_same_group() {
        let registry = CommandRegistry::new();
        let a = registry.group("payments", config());
        let b = registry.group("payments", config());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn distinct_groups_have_independent_state() {
        let registry = CommandRegistry::new();
        let a = registry.group("payments", config());
        let b = registry.group("quotes", config());
        assert!(!Arc::ptr_eq(&a, &b));

        let _ = a
            .execute(
                || async { Err::<i32, _>("down".to_string()) },
                || async { Ok(0) },
            )
            .await;

        assert_eq!(a.stats_snapshot().failure_count, 1);
        assert_eq!(b.stats_snapshot().failure_count, 0);
    }

    #[test]
    fn get_misses_unknown_groups() {
        let registry = CommandRegistry::new();
        assert!(registry.get("nope").is_none());
        registry.group("known", config());
        assert!(registry.get("known").is_some());
    }
}
