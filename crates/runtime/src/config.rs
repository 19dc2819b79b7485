//! Runtime configuration read from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::EngineConfig;
use crate::types::{DRAW_INTERVAL_MS, INPUT_POLL_MS, JOIN_TIMEOUT_MS, WAIT_MS};

/// Log file name used when `DEFRAG_LOG_PATH` is unset.
pub const DEFAULT_LOG_FILE: &str = "tui-defrag.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Pause between two engine ticks.
    pub draw_interval: Duration,
    /// How long the sorted picture stays up.
    pub wait: Duration,
    /// Input poll timeout of the foreground loop.
    pub poll_timeout: Duration,
    /// Upper bound on waiting for the pulse thread at shutdown.
    pub join_timeout: Duration,
    /// Fixed RNG seed; entropy when `None`.
    pub seed: Option<u64>,
    pub log_path: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            draw_interval: Duration::from_millis(DRAW_INTERVAL_MS),
            wait: Duration::from_millis(WAIT_MS),
            poll_timeout: Duration::from_millis(INPUT_POLL_MS),
            join_timeout: Duration::from_millis(JOIN_TIMEOUT_MS),
            seed: None,
            log_path: env::temp_dir().join(DEFAULT_LOG_FILE),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Unparsable values fall back to the defaults. Intervals must be
    /// non-zero; the wait may be zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
        };
        let non_zero = |key: &str| millis(key).filter(|d| !d.is_zero());

        let seed = lookup("DEFRAG_SEED").and_then(|s| s.trim().parse().ok());

        let log_path = lookup("DEFRAG_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
            .unwrap_or(defaults.log_path);

        Self {
            draw_interval: non_zero("DEFRAG_DRAW_INTERVAL_MS").unwrap_or(defaults.draw_interval),
            wait: millis("DEFRAG_WAIT_MS").unwrap_or(defaults.wait),
            poll_timeout: non_zero("DEFRAG_POLL_MS").unwrap_or(defaults.poll_timeout),
            join_timeout: millis("DEFRAG_JOIN_TIMEOUT_MS").unwrap_or(defaults.join_timeout),
            seed,
            log_path,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig { wait: self.wait }
    }
}
