// SPDX-License-Identifier: MIT

//! Typed error handling for flowdraft
//!
//! Library code returns [`FlowdraftError`] and propagates with `?`. The
//! HTTP boundary turns any of these into a `{"error": ...}` payload.

use thiserror::Error;

/// Top-level error type for flowdraft
#[derive(Debug, Error)]
pub enum FlowdraftError {
    /// API errors from model providers (Cohere, OpenAI, Anthropic)
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// Tool not found during an agent turn
    #[error("Tool '{name}' not found")]
    ToolNotFound { name: String },

    /// Configuration errors (missing keys, bad flag values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model/LLM-specific errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Workflow graph errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The agent loop ran out of turns without a text answer
    #[error("Max turns reached: {limit}")]
    MaxTurns { limit: u32 },
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured for provider: {0}")]
    ApiKeyMissing(String),

    /// Provider name not recognised
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Response body did not have the expected shape
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),
}

/// Structural problems with a workflow graph
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Workflow has no nodes")]
    Empty,

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    /// An edge endpoint names a node that is not in the graph
    #[error("Edge {source_id} -> {target_id} references unknown node '{missing}'")]
    UnknownNode {
        source_id: String,
        target_id: String,
        missing: String,
    },

    /// The graph does not open with exactly one start node
    #[error("Workflow must begin with a single start node")]
    MissingStart,

    /// The graph does not close with exactly one end node
    #[error("Workflow must finish with a single end node")]
    MissingEnd,

    #[error("Node '{0}' is not reachable from start")]
    Unreachable(String),

    /// Payload text could not be decoded as a workflow
    #[error("Invalid workflow payload: {0}")]
    InvalidPayload(String),
}

impl FlowdraftError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a tool not found error
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = FlowdraftError::api("Cohere", "quota exceeded");
        assert_eq!(err.to_string(), "API error from Cohere: quota exceeded");
    }

    #[test]
    fn test_workflow_error_wraps() {
        let err: FlowdraftError = WorkflowError::DuplicateNode("review".into()).into();
        assert_eq!(err.to_string(), "Workflow error: Duplicate node id: review");
    }

    #[test]
    fn test_unknown_node_display() {
        let err = WorkflowError::UnknownNode {
            source_id: "start".into(),
            target_id: "ghost".into(),
            missing: "ghost".into(),
        };
        assert!(err.to_string().contains("unknown node 'ghost'"));
    }

    #[test]
    fn test_config_error_display() {
        let err = FlowdraftError::config("invalid host 'x'");
        assert_eq!(err.to_string(), "Configuration error: invalid host 'x'");
    }
}
