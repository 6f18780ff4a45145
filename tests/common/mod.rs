//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use circuit_command::CommandConfig;

/// Config tuned for fast tests: trips after a single failure, short
/// sleep window, tight execution deadline.
#[allow(dead_code)]
pub fn fast_config() -> CommandConfig {
    CommandConfig {
        request_volume_threshold: 1,
        error_threshold_percentage: 50,
        sleep_window_ms: 300,
        execution_timeout_ms: 100,
        window_ms: 10_000,
        bucket_count: 10,
    }
}

/// Remote dependency stub: fails until its recovery instant, then
/// succeeds after a short service delay.
#[allow(dead_code)]
#[derive(Clone)]
pub struct FlakyService {
    recover_at: Instant,
    calls: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl FlakyService {
    pub fn new(recover_after: Duration) -> Self {
        Self {
            recover_at: Instant::now() + recover_after,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// How many times the dependency was actually hit.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn call(&self) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if Instant::now() < self.recover_at {
            Err("service is not ok".to_string())
        } else {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok("success".to_string())
        }
    }
}

/// Install a test subscriber once so failing runs show the breaker logs.
#[allow(dead_code)]
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}
