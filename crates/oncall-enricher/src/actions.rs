//! The two host actions: a manual On-call enricher search and the alert
//! annotator that offers that search as a button.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ActionError;
use crate::finding::{
    Block, CallbackChoice, ExecutionEvent, Finding, FindingSource, PrometheusAlert,
};
use crate::lookup::EnrichmentLookup;
use crate::registry::{parse_params, Action, ActionEvent, ActionRegistry, Trigger};

/// Registered name of the search action.
pub const SEARCH_ACTION: &str = "show_on_call_search";

/// Registered name of the alert annotator.
pub const ALERT_ACTION: &str = "on_call_enricher";

const FINDING_TITLE: &str = "On-call enricher Results";
const AGGREGATION_KEY: &str = "On-call enricher Wisdom";

/// Parameters shared by both actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OnCallEnricherParams {
    /// URL for the on-call enricher
    pub on_call_enricher_url: String,
}

/// Parameters for [`SEARCH_ACTION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// URL for the on-call enricher
    pub on_call_enricher_url: String,
    /// On-call enricher search term
    pub search_term: String,
}

/// Adds a finding with the On-call enricher answer for a search term.
pub struct ShowOnCallSearch {
    lookup: Arc<EnrichmentLookup>,
}

impl ShowOnCallSearch {
    pub fn new(lookup: Arc<EnrichmentLookup>) -> Self {
        Self { lookup }
    }

    /// Look up `params.search_term` and add the answer to `event` as a finding.
    ///
    /// On failure an error finding is still added before the error is returned,
    /// so the user sees why the search produced nothing.
    pub async fn search(
        &self,
        event: &mut ExecutionEvent,
        params: &SearchParams,
    ) -> Result<(), ActionError> {
        let mut finding = Finding::new(FINDING_TITLE, FindingSource::Prometheus, AGGREGATION_KEY);

        let result = match self
            .lookup
            .lookup(&params.search_term, &params.on_call_enricher_url)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                finding.add_enrichment(vec![Block::markdown(format!(
                    "Error calling On-call enricher: {e}"
                ))]);
                event.add_finding(finding);
                return Err(e.into());
            }
        };

        let text = result.display_text();
        let block = if text.is_empty() {
            Block::markdown(format!(
                "Sorry, On-call enricher doesn't know anything about \"{}\"",
                params.search_term
            ))
        } else {
            Block::markdown(text)
        };

        finding.add_enrichment(vec![block]);
        event.add_finding(finding);
        Ok(())
    }
}

#[async_trait]
impl Action for ShowOnCallSearch {
    fn name(&self) -> &'static str {
        SEARCH_ACTION
    }

    fn description(&self) -> &'static str {
        "Add a finding with On-call enricher top results for the specified search term."
    }

    fn trigger(&self) -> Trigger {
        Trigger::Manual
    }

    fn params_schema(&self) -> RootSchema {
        schema_for!(SearchParams)
    }

    async fn run(&self, event: ActionEvent<'_>, params: Value) -> Result<(), ActionError> {
        let params: SearchParams = parse_params(SEARCH_ACTION, params)?;
        match event {
            ActionEvent::Execution(event) => self.search(event, &params).await,
            ActionEvent::Alert(_) => Err(ActionError::UnsupportedTrigger {
                action: SEARCH_ACTION.to_string(),
                trigger: Trigger::PrometheusAlert.as_str(),
            }),
        }
    }
}

/// Adds an "Ask On-call enricher" button to Prometheus alerts.
#[derive(Debug, Default, Clone, Copy)]
pub struct OnCallEnricher;

impl OnCallEnricher {
    /// Attach a callback button that runs [`SEARCH_ACTION`] for the alert's name.
    ///
    /// Alerts without an `alertname` label are left untouched.
    pub fn annotate(
        alert: &mut PrometheusAlert,
        params: &OnCallEnricherParams,
    ) -> Result<(), ActionError> {
        let Some(alert_name) = alert.alert_name().map(str::to_string) else {
            debug!("Alert has no alertname label, skipping On-call enricher button");
            return Ok(());
        };

        let search = SearchParams {
            search_term: alert_name.clone(),
            on_call_enricher_url: params.on_call_enricher_url.clone(),
        };
        let action_params =
            serde_json::to_value(&search).map_err(|source| ActionError::InvalidParams {
                action: SEARCH_ACTION.to_string(),
                source,
            })?;

        info!(alert_name = %alert_name, "Adding On-call enricher button to alert");
        alert.add_enrichment(vec![Block::callback(
            format!("Ask On-call enricher: {alert_name}"),
            CallbackChoice {
                action: SEARCH_ACTION.to_string(),
                action_params,
            },
        )]);
        Ok(())
    }
}

#[async_trait]
impl Action for OnCallEnricher {
    fn name(&self) -> &'static str {
        ALERT_ACTION
    }

    fn description(&self) -> &'static str {
        "Add a button to the alert - clicking it will ask the On-call enricher to help find a solution."
    }

    fn trigger(&self) -> Trigger {
        Trigger::PrometheusAlert
    }

    fn params_schema(&self) -> RootSchema {
        schema_for!(OnCallEnricherParams)
    }

    async fn run(&self, event: ActionEvent<'_>, params: Value) -> Result<(), ActionError> {
        let params: OnCallEnricherParams = parse_params(ALERT_ACTION, params)?;
        match event {
            ActionEvent::Alert(alert) => Self::annotate(alert, &params),
            ActionEvent::Execution(_) => Err(ActionError::UnsupportedTrigger {
                action: ALERT_ACTION.to_string(),
                trigger: Trigger::Manual.as_str(),
            }),
        }
    }
}

/// Register both On-call enricher actions, sharing one lookup (and its cache).
pub fn register_actions(
    registry: &mut ActionRegistry,
    lookup: Arc<EnrichmentLookup>,
) -> Result<(), ActionError> {
    registry.register(Arc::new(ShowOnCallSearch::new(lookup)))?;
    registry.register(Arc::new(OnCallEnricher))?;
    Ok(())
}
