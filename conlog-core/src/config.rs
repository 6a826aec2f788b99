use std::{sync::LazyLock, time::Duration};

use derive_from_env::FromEnv;

use crate::mode::QueueFullMode;

/// Settings read from `CONLOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "CONLOG")]
#[allow(non_snake_case)]
pub struct ConlogEnv {
    #[from_env(default = "2500")]
    pub QUEUE_CAPACITY: usize,
    #[from_env(default = "wait")]
    pub QUEUE_FULL_MODE: QueueFullMode,
    #[from_env(default = "1500")]
    pub SHUTDOWN_GRACE_MS: u64,
}

impl Default for ConlogEnv {
    fn default() -> Self {
        Self {
            QUEUE_CAPACITY: 2500,
            QUEUE_FULL_MODE: QueueFullMode::Wait,
            SHUTDOWN_GRACE_MS: 1500,
        }
    }
}

impl ConlogEnv {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.SHUTDOWN_GRACE_MS)
    }
}

// A malformed environment, or a zero capacity, falls back to the defaults.
pub static CONLOG_CONFIG: LazyLock<ConlogEnv> = LazyLock::new(|| {
    ConlogEnv::from_env()
        .ok()
        .filter(|env| env.QUEUE_CAPACITY > 0)
        .unwrap_or_default()
});
