//! Findings and enrichment blocks exchanged with the alert host.
//!
//! These mirror the host's data model. Actions only ever append to them; the
//! host owns delivery and rendering.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Label carrying the Prometheus alert name.
pub const ALERT_NAME_LABEL: &str = "alertname";

/// Subsystem a finding originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSource {
    /// Raised from a Prometheus alert
    Prometheus,
}

/// A deferred action invocation bound to a UI element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackChoice {
    /// Name of the registered action to run.
    pub action: String,
    /// Parameters the action receives when the choice is activated.
    pub action_params: Value,
}

/// A renderable piece of enrichment content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Markdown text
    Markdown { text: String },
    /// Interactive buttons, keyed by their display label
    Callback {
        choices: BTreeMap<String, CallbackChoice>,
    },
}

impl Block {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Markdown { text: text.into() }
    }

    /// A callback block with a single button.
    pub fn callback(label: impl Into<String>, choice: CallbackChoice) -> Self {
        let mut choices = BTreeMap::new();
        choices.insert(label.into(), choice);
        Self::Callback { choices }
    }
}

/// One or more blocks attached together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub blocks: Vec<Block>,
}

/// The host's unit of alert-attached output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: Uuid,
    pub title: String,
    pub source: FindingSource,
    /// Key the host uses to group repeated findings.
    pub aggregation_key: String,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub enrichments: Vec<Enrichment>,
}

impl Finding {
    pub fn new(
        title: impl Into<String>,
        source: FindingSource,
        aggregation_key: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            source,
            aggregation_key: aggregation_key.into(),
            creation_date: Utc::now(),
            enrichments: Vec::new(),
        }
    }

    pub fn add_enrichment(&mut self, blocks: Vec<Block>) {
        self.enrichments.push(Enrichment { blocks });
    }
}

/// Per-invocation sink for findings produced by a manually triggered action.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExecutionEvent {
    #[serde(default)]
    pub findings: Vec<Finding>,
}

impl ExecutionEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

/// A Kubernetes alert delivered by Prometheus through the host.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PrometheusAlert {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Enrichments attached to this alert's finding.
    #[serde(default)]
    pub enrichments: Vec<Enrichment>,
}

impl PrometheusAlert {
    pub fn with_labels<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// The `alertname` label, if present and non-empty.
    pub fn alert_name(&self) -> Option<&str> {
        self.labels
            .get(ALERT_NAME_LABEL)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn add_enrichment(&mut self, blocks: Vec<Block>) {
        self.enrichments.push(Enrichment { blocks });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_name() {
        let alert = PrometheusAlert::with_labels([("alertname", "KubePodCrashLooping")]);
        assert_eq!(alert.alert_name(), Some("KubePodCrashLooping"));

        let alert = PrometheusAlert::with_labels([("alertname", "")]);
        assert_eq!(alert.alert_name(), None);

        let alert = PrometheusAlert::with_labels([("severity", "critical")]);
        assert_eq!(alert.alert_name(), None);
    }

    #[test]
    fn test_finding_add_enrichment() {
        let mut finding = Finding::new("Title", FindingSource::Prometheus, "key");
        finding.add_enrichment(vec![Block::markdown("one")]);
        finding.add_enrichment(vec![Block::markdown("two")]);

        assert_eq!(finding.enrichments.len(), 2);
        assert_eq!(finding.enrichments[1].blocks, vec![Block::markdown("two")]);
    }

    #[test]
    fn test_block_serialization() {
        let block = Block::callback(
            "Ask",
            CallbackChoice {
                action: "show_on_call_search".to_string(),
                action_params: json!({"search_term": "X"}),
            },
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "callback");
        assert_eq!(value["choices"]["Ask"]["action"], "show_on_call_search");

        let value = serde_json::to_value(Block::markdown("hi")).unwrap();
        assert_eq!(value, json!({"type": "markdown", "text": "hi"}));
    }

    #[test]
    fn test_finding_source_serializes_as_host_name() {
        let finding = Finding::new("Title", FindingSource::Prometheus, "key");
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["source"], "prometheus");
        assert!(serde_json::from_value::<FindingSource>(json!("manual")).is_err());
    }

    #[test]
    fn test_alert_deserializes_from_host_payload() {
        let alert: PrometheusAlert = serde_json::from_value(json!({
            "labels": {"alertname": "TargetDown", "namespace": "monitoring"}
        }))
        .unwrap();
        assert_eq!(alert.alert_name(), Some("TargetDown"));
        assert!(alert.enrichments.is_empty());
    }
}
