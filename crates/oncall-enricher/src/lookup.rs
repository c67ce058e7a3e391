//! Cached lookups against the On-call enricher.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cache::LookupCache;
use crate::client::EnricherClient;
use crate::config::Config;
use crate::error::EnricherError;

/// Outcome of a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    /// Enricher answer, possibly empty.
    pub result: String,
    /// Wall-clock time of the live fetch. `None` when served from cache.
    pub elapsed: Option<Duration>,
}

impl LookupResult {
    /// Whether the answer came from the cache rather than a live fetch.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.elapsed.is_none()
    }

    /// Markdown for the finding body.
    ///
    /// Live fetches get a separator and a "Time taken" footer; cache hits are
    /// rendered as the bare answer, so an empty cached answer yields empty text.
    pub fn display_text(&self) -> String {
        let mut lines = Vec::with_capacity(3);
        if !self.result.is_empty() || self.elapsed.is_some() {
            lines.push(self.result.clone());
        }
        if let Some(elapsed) = self.elapsed {
            lines.push("\n\n ---".to_string());
            lines.push(format!(
                "\n\n | Time taken: {:.2} seconds |",
                elapsed.as_secs_f64()
            ));
        }
        lines.join("\n")
    }
}

/// Answers search terms from the cache, falling back to the enricher endpoint.
#[derive(Debug)]
pub struct EnrichmentLookup {
    cache: LookupCache,
    client: EnricherClient,
}

impl EnrichmentLookup {
    pub fn new(cache: LookupCache, client: EnricherClient) -> Self {
        Self { cache, client }
    }

    /// Build the cache and HTTP client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, EnricherError> {
        let cache = LookupCache::new(config.cache_capacity)?;
        let client = match config.request_timeout {
            Some(timeout) => EnricherClient::with_timeout(timeout)?,
            None => EnricherClient::new(),
        };
        Ok(Self::new(cache, client))
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Look up `search_term`, fetching from `enricher_url` on a cache miss.
    ///
    /// A successful fetch is cached even when the answer is empty. Failures are
    /// never cached and are returned as-is.
    pub async fn lookup(
        &self,
        search_term: &str,
        enricher_url: &str,
    ) -> Result<LookupResult, EnricherError> {
        info!(search_term, "On-call enricher search term");

        if let Some(result) = self.cache.get(search_term) {
            debug!(search_term, "Serving On-call enricher answer from cache");
            return Ok(LookupResult {
                result,
                elapsed: None,
            });
        }

        let start = Instant::now();
        let result = match self.client.search(enricher_url, search_term).await {
            Ok(result) => result,
            Err(e) => {
                warn!(search_term, error = %e, "On-call enricher lookup failed");
                return Err(e);
            }
        };
        let elapsed = start.elapsed();

        self.cache.put(search_term, result.clone());
        debug!(
            search_term,
            elapsed_secs = elapsed.as_secs_f64(),
            cached_terms = self.cache.len(),
            "Cached On-call enricher answer"
        );

        Ok(LookupResult {
            result,
            elapsed: Some(elapsed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_with_timing() {
        let result = LookupResult {
            result: "Scale the deployment".to_string(),
            elapsed: Some(Duration::from_millis(1234)),
        };
        assert!(!result.is_cached());
        assert_eq!(
            result.display_text(),
            "Scale the deployment\n\n\n ---\n\n\n | Time taken: 1.23 seconds |"
        );
    }

    #[test]
    fn test_display_text_cache_hit_has_no_footer() {
        let result = LookupResult {
            result: "Scale the deployment".to_string(),
            elapsed: None,
        };
        assert!(result.is_cached());
        assert_eq!(result.display_text(), "Scale the deployment");
    }

    #[test]
    fn test_display_text_empty_cache_hit() {
        let result = LookupResult {
            result: String::new(),
            elapsed: None,
        };
        assert!(result.display_text().is_empty());
    }

    #[test]
    fn test_display_text_empty_fetch_keeps_footer() {
        let result = LookupResult {
            result: String::new(),
            elapsed: Some(Duration::from_millis(50)),
        };
        let text = result.display_text();
        assert!(text.starts_with("\n\n\n ---"));
        assert!(text.ends_with("| Time taken: 0.05 seconds |"));
    }

    #[test]
    fn test_from_config_rejects_zero_capacity() {
        let config = Config {
            cache_capacity: 0,
            ..Config::default()
        };
        assert!(EnrichmentLookup::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_uses_capacity() {
        let config = Config {
            cache_capacity: 7,
            ..Config::default()
        };
        let lookup = EnrichmentLookup::from_config(&config).unwrap();
        assert_eq!(lookup.cache().capacity(), 7);
    }
}
