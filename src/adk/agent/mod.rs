// SPDX-License-Identifier: MIT

//! Agent module - defines agent types for AI workflows
//!
//! `LLMAgent` drives a model through tool-calling turns until it answers
//! with text, and records every tool result it produced along the way.

mod llm;

pub use llm::LLMAgent;

use crate::adk::error::FlowdraftError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One tool invocation made during an agent run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolOutcome {
    pub name: String,
    pub result: serde_json::Value,
    /// False when the tool failed or was not found
    pub ok: bool,
}

/// Everything an agent run produced
#[derive(Debug, Clone, Default)]
pub struct AgentTranscript {
    /// Final text answer
    pub answer: String,
    /// Tool results in call order
    pub tool_outcomes: Vec<ToolOutcome>,
}

impl AgentTranscript {
    /// First successful result of the named tool
    pub fn first_result_of(&self, tool_name: &str) -> Option<&serde_json::Value> {
        self.tool_outcomes
            .iter()
            .find(|o| o.ok && o.name == tool_name)
            .map(|o| &o.result)
    }
}

/// Core agent trait for all agent types
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the agent name
    fn name(&self) -> &str;

    /// Run the agent and keep the tool trace
    async fn run_traced(&self, input: String) -> Result<AgentTranscript, FlowdraftError>;

    /// Run the agent with the given input
    async fn run(&self, input: String) -> Result<String, FlowdraftError> {
        Ok(self.run_traced(input).await?.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A simple mock agent that transforms input
    pub struct MockAgent {
        name: String,
        transform: fn(String) -> String,
    }

    impl MockAgent {
        pub fn new(name: &str, transform: fn(String) -> String) -> Self {
            Self {
                name: name.to_string(),
                transform,
            }
        }
    }

    #[async_trait]
    impl Agent for MockAgent {
        fn name(&self) -> &str {
            &self.name
        }

        async fn run_traced(&self, input: String) -> Result<AgentTranscript, FlowdraftError> {
            Ok(AgentTranscript {
                answer: (self.transform)(input),
                tool_outcomes: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_mock_agent() {
        let agent = MockAgent::new("test", |s| format!("{}-transformed", s));
        assert_eq!(agent.name(), "test");

        let result = agent.run("input".to_string()).await.unwrap();
        assert_eq!(result, "input-transformed");
    }

    #[test]
    fn test_first_result_skips_failures() {
        let transcript = AgentTranscript {
            answer: String::new(),
            tool_outcomes: vec![
                ToolOutcome {
                    name: "extract".into(),
                    result: json!({"error": "bad args"}),
                    ok: false,
                },
                ToolOutcome {
                    name: "other".into(),
                    result: json!(1),
                    ok: true,
                },
                ToolOutcome {
                    name: "extract".into(),
                    result: json!({"nodes": []}),
                    ok: true,
                },
            ],
        };

        assert_eq!(
            transcript.first_result_of("extract"),
            Some(&json!({"nodes": []}))
        );
        assert!(transcript.first_result_of("missing").is_none());
    }
}
