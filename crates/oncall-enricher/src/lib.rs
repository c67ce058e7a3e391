//! On-call enricher actions for the alert host.
//!
//! This crate exposes two actions to an alert-orchestration host:
//!
//! - `on_call_enricher` runs on Prometheus alerts and adds an
//!   "Ask On-call enricher: {alertname}" button to the alert.
//! - `show_on_call_search` runs when that button is clicked (or on demand) and
//!   adds a finding with the enricher's answer for the search term.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use oncall_enricher::{register_actions, ActionRegistry, Config, EnrichmentLookup};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! oncall_enricher::telemetry::init();
//!
//! let lookup = Arc::new(EnrichmentLookup::from_config(&Config::from_env())?);
//! let mut registry = ActionRegistry::new();
//! register_actions(&mut registry, lookup)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! - `ONCALL_ENRICHER_CACHE_SIZE`: number of cached answers (default 100)
//! - `ONCALL_ENRICHER_TIMEOUT_SECS`: request timeout (default: HTTP client default)
//!
//! # Architecture
//!
//! - [`LookupCache`] keeps the most recent answers, evicting least recently used
//! - [`EnricherClient`] performs the `GET {url}?search_term=...` request
//! - [`EnrichmentLookup`] combines the two and times live fetches
//! - [`ActionRegistry`] maps action names to [`Action`] implementations

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod finding;
pub mod lookup;
pub mod registry;
pub mod telemetry;

pub use actions::{
    register_actions, OnCallEnricher, OnCallEnricherParams, SearchParams, ShowOnCallSearch,
    ALERT_ACTION, SEARCH_ACTION,
};
pub use cache::{LookupCache, DEFAULT_CACHE_CAPACITY};
pub use client::EnricherClient;
pub use config::Config;
pub use error::{ActionError, EnricherError};
pub use finding::{
    Block, CallbackChoice, Enrichment, ExecutionEvent, Finding, FindingSource, PrometheusAlert,
};
pub use lookup::{EnrichmentLookup, LookupResult};
pub use registry::{Action, ActionEvent, ActionManifest, ActionRegistry, Trigger};
