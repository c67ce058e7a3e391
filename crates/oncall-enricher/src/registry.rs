//! Explicit registry of named actions the host can invoke.
//!
//! The host builds one [`ActionRegistry`] at startup, registers the actions it
//! wants to expose and then dispatches by name, either directly or when a user
//! activates a [`CallbackChoice`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ActionError;
use crate::finding::{CallbackChoice, ExecutionEvent, PrometheusAlert};

/// Kind of event an action is triggered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Run on request, e.g. from a callback button
    Manual,
    /// Run when a Prometheus alert fires
    PrometheusAlert,
}

impl Trigger {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::PrometheusAlert => "prometheus_alert",
        }
    }
}

/// The event an action runs against.
#[derive(Debug)]
pub enum ActionEvent<'a> {
    Execution(&'a mut ExecutionEvent),
    Alert(&'a mut PrometheusAlert),
}

impl ActionEvent<'_> {
    pub const fn trigger(&self) -> Trigger {
        match self {
            Self::Execution(_) => Trigger::Manual,
            Self::Alert(_) => Trigger::PrometheusAlert,
        }
    }
}

/// A named action the host can invoke with JSON parameters.
#[async_trait]
pub trait Action: Send + Sync {
    /// Registered name, used in callback choices.
    fn name(&self) -> &'static str;

    /// Human readable description shown by the host.
    fn description(&self) -> &'static str;

    /// Event kind this action handles.
    fn trigger(&self) -> Trigger;

    /// JSON schema of the parameters accepted by [`Action::run`].
    fn params_schema(&self) -> RootSchema;

    /// Run the action against `event`.
    async fn run(&self, event: ActionEvent<'_>, params: Value) -> Result<(), ActionError>;
}

/// Description of a registered action, as advertised to the host.
#[derive(Debug, Clone, Serialize)]
pub struct ActionManifest {
    pub name: &'static str,
    pub description: &'static str,
    pub trigger: Trigger,
    pub params_schema: RootSchema,
}

/// Named actions available to the host.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under its own name.
    pub fn register(&mut self, action: Arc<dyn Action>) -> Result<(), ActionError> {
        let name = action.name();
        if self.actions.contains_key(name) {
            return Err(ActionError::DuplicateAction(name.to_string()));
        }

        info!(action = name, trigger = action.trigger().as_str(), "Registered action");
        self.actions.insert(name, action);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Manifest entries for every registered action.
    pub fn manifest(&self) -> Vec<ActionManifest> {
        self.actions
            .values()
            .map(|action| ActionManifest {
                name: action.name(),
                description: action.description(),
                trigger: action.trigger(),
                params_schema: action.params_schema(),
            })
            .collect()
    }

    /// Invoke the action registered as `name`.
    pub async fn invoke(
        &self,
        name: &str,
        event: ActionEvent<'_>,
        params: Value,
    ) -> Result<(), ActionError> {
        let action = self
            .get(name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;

        let trigger = event.trigger();
        if trigger != action.trigger() {
            return Err(ActionError::UnsupportedTrigger {
                action: name.to_string(),
                trigger: trigger.as_str(),
            });
        }

        debug!(action = name, trigger = trigger.as_str(), "Invoking action");
        action.run(event, params).await
    }

    /// Run the deferred invocation behind an activated callback button.
    pub async fn resolve_callback(
        &self,
        event: &mut ExecutionEvent,
        choice: &CallbackChoice,
    ) -> Result<(), ActionError> {
        self.invoke(
            &choice.action,
            ActionEvent::Execution(event),
            choice.action_params.clone(),
        )
        .await
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

/// Deserialize action parameters, tagging failures with the action name.
pub fn parse_params<T: DeserializeOwned>(action: &str, params: Value) -> Result<T, ActionError> {
    serde_json::from_value(params).map_err(|source| ActionError::InvalidParams {
        action: action.to_string(),
        source,
    })
}
