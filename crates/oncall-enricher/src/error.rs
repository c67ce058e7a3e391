//! Error types for enricher lookups and action dispatch.

use thiserror::Error;

/// Errors that can occur while asking the On-call enricher.
#[derive(Debug, Error)]
pub enum EnricherError {
    /// Enricher answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body is not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Lookup was constructed with unusable settings
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors surfaced to the host when an action invocation fails.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The enricher lookup failed
    #[error("Error calling On-call enricher: {0}")]
    Lookup(#[from] EnricherError),

    /// Parameters did not match the action's schema
    #[error("Invalid parameters for action {action}: {source}")]
    InvalidParams {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// No action registered under this name
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// An action with this name is already registered
    #[error("Action already registered: {0}")]
    DuplicateAction(String),

    /// Action was invoked with an event it does not handle
    #[error("Action {action} cannot handle {trigger} events")]
    UnsupportedTrigger {
        action: String,
        trigger: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = EnricherError::Status {
            status: 500,
            url: "http://enricher/search?search_term=X".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 500 from http://enricher/search?search_term=X"
        );
    }

    #[test]
    fn test_lookup_error_wraps_enricher_error() {
        let err = ActionError::from(EnricherError::InvalidConfig("capacity".to_string()));
        assert_eq!(
            err.to_string(),
            "Error calling On-call enricher: Invalid configuration: capacity"
        );
    }
}
