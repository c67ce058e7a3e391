//! Configuration for the On-call enricher actions.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::cache::DEFAULT_CACHE_CAPACITY;

/// Environment variable for the lookup cache capacity.
const ENV_CACHE_SIZE: &str = "ONCALL_ENRICHER_CACHE_SIZE";

/// Environment variable for an optional request timeout, in seconds.
const ENV_TIMEOUT_SECS: &str = "ONCALL_ENRICHER_TIMEOUT_SECS";

/// On-call enricher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cached answers.
    pub cache_capacity: usize,
    /// Request timeout. `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Read configuration from environment variables.
    pub fn from_env() -> Self {
        let cache_capacity = match env::var(ENV_CACHE_SIZE) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    warn!(
                        value = %raw,
                        default = DEFAULT_CACHE_CAPACITY,
                        "Invalid {ENV_CACHE_SIZE}, using default"
                    );
                    DEFAULT_CACHE_CAPACITY
                }
            },
            Err(_) => DEFAULT_CACHE_CAPACITY,
        };

        let request_timeout = match env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    warn!(
                        value = %raw,
                        "Invalid {ENV_TIMEOUT_SECS}, using the HTTP client default"
                    );
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            cache_capacity,
            request_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            request_timeout: None,
        }
    }
}
