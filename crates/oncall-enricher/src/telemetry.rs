//! Tracing setup for hosts that do not install their own subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable selecting JSON log output (`LOG_FORMAT=json`).
const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Install a global subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` when a subscriber is already installed, which is expected
/// when the host configured tracing first.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        assert!(!init());
    }
}
