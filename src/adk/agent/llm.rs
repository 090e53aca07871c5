// SPDX-License-Identifier: MIT

//! LLM Agent - Standard LLM agent with tool calling
//!
//! This agent sends prompts to an LLM and handles tool calls in a loop
//! until a text response is received.

use super::{Agent, AgentTranscript, ToolOutcome};
use crate::adk::error::FlowdraftError;
use crate::adk::model::{Content, GenerationConfig, Model, Part};
use crate::adk::tool::Tool;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_MAX_TURNS: u32 = 10;

/// Standard LLM agent with tool calling support
pub struct LLMAgent {
    pub name: String,
    pub instruction: String,
    pub model: Arc<dyn Model>,
    pub tools: Vec<Arc<dyn Tool>>,
    pub config: Option<GenerationConfig>,
    pub max_turns: u32,
    /// HashMap for O(1) tool lookups
    tool_map: HashMap<String, usize>,
}

impl LLMAgent {
    pub fn new(
        name: String,
        instruction: String,
        model: Arc<dyn Model>,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Self {
        let tool_map: HashMap<String, usize> = tools
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name().to_string(), i))
            .collect();

        Self {
            name,
            instruction,
            model,
            tools,
            config: None,
            max_turns: DEFAULT_MAX_TURNS,
            tool_map,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// O(1) tool lookup by name
    fn get_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tool_map.get(name).map(|&i| &self.tools[i])
    }

    async fn call_tool(&self, name: &str, args: &serde_json::Value) -> ToolOutcome {
        log::info!("Tool call: {} {}", name, args);

        let (result, ok) = match self.get_tool(name) {
            Some(t) => match t.execute(args.clone()).await {
                Ok(res) => (res, true),
                Err(e) => {
                    log::error!("Tool {} failed: {}", name, e);
                    (serde_json::json!({ "error": e.to_string() }), false)
                }
            },
            None => {
                let err = FlowdraftError::tool_not_found(name);
                log::error!("{}", err);
                (serde_json::json!({ "error": err.to_string() }), false)
            }
        };

        ToolOutcome {
            name: name.to_string(),
            result,
            ok,
        }
    }
}

#[async_trait]
impl Agent for LLMAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run_traced(&self, input: String) -> Result<AgentTranscript, FlowdraftError> {
        let mut history = vec![
            Content::text("system", self.instruction.clone()),
            Content::text("user", input),
        ];
        let mut transcript = AgentTranscript::default();

        for turn in 0..self.max_turns {
            log::info!("Agent {} turn {}/{}", self.name, turn + 1, self.max_turns);
            let response = self
                .model
                .generate_content(&history, self.config.as_ref(), Some(&self.tools))
                .await?;

            let mut text_content = String::new();
            let mut function_calls = Vec::new();

            for part in &response.parts {
                match part {
                    Part::Text(text) => text_content.push_str(text),
                    Part::FunctionCall { id, name, args } => {
                        function_calls.push((id.as_str(), name.as_str(), args))
                    }
                    _ => {}
                }
            }

            if function_calls.is_empty() {
                if text_content.is_empty() {
                    log::warn!(
                        "Agent {} received empty response with no function calls",
                        self.name
                    );
                } else {
                    log::info!(
                        "Agent {} returning text response (length: {})",
                        self.name,
                        text_content.len()
                    );
                }
                transcript.answer = text_content;
                return Ok(transcript);
            }

            let mut function_responses = Vec::with_capacity(function_calls.len());
            for (id, name, args) in function_calls {
                let outcome = self.call_tool(name, args).await;

                function_responses.push(Part::FunctionResponse {
                    id: id.to_string(),
                    name: name.to_string(),
                    response: outcome.result.clone(),
                });
                transcript.tool_outcomes.push(outcome);
            }

            history.push(response);
            history.push(Content {
                role: "user".to_string(),
                parts: function_responses,
            });
        }

        log::error!(
            "Agent {} reached max turns without text response",
            self.name
        );
        Err(FlowdraftError::MaxTurns {
            limit: self.max_turns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays canned responses and records how many messages it was sent
    struct ScriptedModel {
        responses: Vec<Content>,
        cursor: AtomicUsize,
        seen_history_len: Mutex<Vec<usize>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Content>) -> Self {
            Self {
                responses,
                cursor: AtomicUsize::new(0),
                seen_history_len: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl Model for ScriptedModel {
        async fn generate_content(
            &self,
            history: &[Content],
            _config: Option<&GenerationConfig>,
            _tools: Option<&[Arc<dyn Tool>]>,
        ) -> Result<Content, FlowdraftError> {
            self.seen_history_len.lock().unwrap().push(history.len());
            let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
            Ok(self.responses[idx % self.responses.len()].clone())
        }
    }

    struct EchoTool {
        schema: Value,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its input"
        }

        fn schema(&self) -> &Value {
            &self.schema
        }

        async fn execute(&self, input: Value) -> Result<Value, FlowdraftError> {
            Ok(json!({ "echo": input }))
        }
    }

    fn call(name: &str) -> Content {
        Content {
            role: "model".to_string(),
            parts: vec![Part::FunctionCall {
                id: format!("id_{}", name),
                name: name.to_string(),
                args: json!({"x": 1}),
            }],
        }
    }

    fn agent_with(responses: Vec<Content>) -> (LLMAgent, Arc<ScriptedModel>) {
        let model = Arc::new(ScriptedModel::new(responses));
        let tool: Arc<dyn Tool> = Arc::new(EchoTool { schema: json!({}) });
        let agent = LLMAgent::new(
            "test-agent".to_string(),
            "You are a test".to_string(),
            model.clone(),
            vec![tool],
        );
        (agent, model)
    }

    #[tokio::test]
    async fn test_text_answer_returns_immediately() {
        let (agent, model) = agent_with(vec![Content::text("model", "done")]);

        let transcript = agent.run_traced("go".to_string()).await.unwrap();
        assert_eq!(transcript.answer, "done");
        assert!(transcript.tool_outcomes.is_empty());
        assert_eq!(*model.seen_history_len.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let (agent, model) = agent_with(vec![call("echo"), Content::text("model", "ok")]);

        let transcript = agent.run_traced("go".to_string()).await.unwrap();
        assert_eq!(transcript.answer, "ok");
        assert_eq!(transcript.tool_outcomes.len(), 1);
        assert!(transcript.tool_outcomes[0].ok);
        assert_eq!(transcript.tool_outcomes[0].result, json!({"echo": {"x": 1}}));
        // second turn sees the call and its response appended
        assert_eq!(*model.seen_history_len.lock().unwrap(), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_not_fatal() {
        let (agent, _) = agent_with(vec![call("missing"), Content::text("model", "sorry")]);

        let transcript = agent.run_traced("go".to_string()).await.unwrap();
        assert_eq!(transcript.answer, "sorry");
        assert!(!transcript.tool_outcomes[0].ok);
        assert!(transcript.tool_outcomes[0].result["error"]
            .as_str()
            .unwrap()
            .contains("not found"));
    }

    #[tokio::test]
    async fn test_max_turns() {
        let (agent, _) = agent_with(vec![call("echo")]);
        let agent = agent.with_max_turns(3);

        let err = agent.run("go".to_string()).await.unwrap_err();
        assert!(matches!(err, FlowdraftError::MaxTurns { limit: 3 }));
    }
}
