// SPDX-License-Identifier: MIT

//! Cohere Model - Chat v2 API implementation

use super::{new_call_id, Content, GenerationConfig, Model, Part};
use crate::adk::error::{FlowdraftError, ModelError};
use crate::adk::tool::Tool;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://api.cohere.com/v2";

/// Cohere Command model implementation
pub struct CohereModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl CohereModel {
    pub fn new(model_name: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Convert internal Content to Cohere chat messages
    fn content_to_cohere_messages(content: &Content) -> Vec<Value> {
        let role = match content.role.as_str() {
            "model" => "assistant",
            other => other,
        };

        let mut tool_messages = Vec::new();
        let mut tool_calls = Vec::new();
        let mut text_content = String::new();
        let mut tool_plan = String::new();

        for part in &content.parts {
            match part {
                Part::Text(t) => text_content.push_str(t),
                Part::Thinking(t) => tool_plan.push_str(t),
                Part::FunctionCall { id, name, args } => {
                    tool_calls.push(json!({
                        "id": id,
                        "type": "function",
                        "function": {
                            "name": name,
                            "arguments": serde_json::to_string(args).unwrap_or_default()
                        }
                    }));
                }
                Part::FunctionResponse { id, response, .. } => {
                    tool_messages.push(json!({
                        "role": "tool",
                        "tool_call_id": id,
                        "content": serde_json::to_string(response).unwrap_or_default()
                    }));
                }
            }
        }

        if !tool_messages.is_empty() {
            return tool_messages;
        }

        if !tool_calls.is_empty() {
            let mut message = json!({
                "role": role,
                "tool_calls": tool_calls
            });
            if !tool_plan.is_empty() {
                message["tool_plan"] = json!(tool_plan);
            }
            return vec![message];
        }

        vec![json!({
            "role": role,
            "content": text_content
        })]
    }

    fn tools_to_cohere_format(tools: &[Arc<dyn Tool>]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.schema()
                    }
                })
            })
            .collect()
    }

    /// Parse Cohere response into Content
    fn parse_cohere_response(response: &Value) -> Result<Content, FlowdraftError> {
        let message = response
            .get("message")
            .ok_or_else(|| ModelError::InvalidResponse("no message in Cohere response".into()))?;

        let mut parts = Vec::new();

        if let Some(plan) = message["tool_plan"].as_str() {
            if !plan.is_empty() {
                parts.push(Part::Thinking(plan.to_string()));
            }
        }

        if let Some(blocks) = message["content"].as_array() {
            let text: String = blocks
                .iter()
                .filter(|b| b["type"] == "text")
                .filter_map(|b| b["text"].as_str())
                .collect();
            if !text.is_empty() {
                parts.push(Part::Text(text));
            }
        }

        if let Some(tool_calls) = message["tool_calls"].as_array() {
            for tc in tool_calls {
                let id = tc["id"]
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(new_call_id);
                let name = tc["function"]["name"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                let args_str = tc["function"]["arguments"].as_str().unwrap_or("{}");
                let args: Value = serde_json::from_str(args_str).unwrap_or(json!({}));

                parts.push(Part::FunctionCall { id, name, args });
            }
        }

        if let Some(reason) = response["finish_reason"].as_str() {
            log::debug!("Cohere finish reason: {}", reason);
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for CohereModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        tools: Option<&[Arc<dyn Tool>]>,
    ) -> Result<Content, FlowdraftError> {
        let url = format!("{}/chat", self.base_url);

        let messages: Vec<Value> = history
            .iter()
            .flat_map(Self::content_to_cohere_messages)
            .collect();

        let mut body = json!({
            "model": self.model_name,
            "messages": messages
        });

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                body["max_tokens"] = json!(max_tokens);
            }
            if let Some(top_p) = cfg.top_p {
                body["p"] = json!(top_p);
            }
            if let Some(top_k) = cfg.top_k {
                body["k"] = json!(top_k);
            }
        }

        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = json!(Self::tools_to_cohere_format(tools));
            }
        }

        log::debug!(
            "Cohere request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(FlowdraftError::api("Cohere", text));
        }

        let resp_json: Value = resp.json().await?;
        log::debug!("Cohere response: {}", resp_json);

        Self::parse_cohere_response(&resp_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_message_keeps_role() {
        let msgs = CohereModel::content_to_cohere_messages(&Content::text("system", "Be terse"));
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[0]["content"], "Be terse");
    }

    #[test]
    fn test_tool_call_carries_plan() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![
                Part::Thinking("I will extract the workflow".to_string()),
                Part::FunctionCall {
                    id: "c1".to_string(),
                    name: "generate_workflow_from_description".to_string(),
                    args: json!({"description": "approve"}),
                },
            ],
        };

        let msgs = CohereModel::content_to_cohere_messages(&content);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0]["role"], "assistant");
        assert_eq!(msgs[0]["tool_plan"], "I will extract the workflow");
        assert_eq!(msgs[0]["tool_calls"][0]["id"], "c1");
    }

    #[test]
    fn test_tool_response_message() {
        let content = Content {
            role: "user".to_string(),
            parts: vec![Part::FunctionResponse {
                id: "c1".to_string(),
                name: "generate_workflow_from_description".to_string(),
                response: json!({"nodes": []}),
            }],
        };

        let msgs = CohereModel::content_to_cohere_messages(&content);
        assert_eq!(msgs[0]["role"], "tool");
        assert_eq!(msgs[0]["tool_call_id"], "c1");
        assert_eq!(msgs[0]["content"], "{\"nodes\":[]}");
    }

    #[test]
    fn test_parse_cohere_text_response() {
        let response = json!({
            "id": "abc",
            "finish_reason": "COMPLETE",
            "message": {
                "role": "assistant",
                "content": [{"type": "text", "text": "```json\n{}\n```"}]
            }
        });

        let content = CohereModel::parse_cohere_response(&response).unwrap();
        assert_eq!(content.parts.len(), 1);
        assert!(matches!(&content.parts[0], Part::Text(t) if t == "```json\n{}\n```"));
    }

    #[test]
    fn test_parse_cohere_tool_call_response() {
        let response = json!({
            "finish_reason": "TOOL_CALL",
            "message": {
                "role": "assistant",
                "tool_plan": "Use the extractor",
                "tool_calls": [{
                    "id": "gen_1",
                    "type": "function",
                    "function": {
                        "name": "generate_workflow_from_description",
                        "arguments": "{\"description\":\"review\"}"
                    }
                }]
            }
        });

        let content = CohereModel::parse_cohere_response(&response).unwrap();
        assert_eq!(content.parts.len(), 2);
        match &content.parts[1] {
            Part::FunctionCall { id, args, .. } => {
                assert_eq!(id, "gen_1");
                assert_eq!(args["description"], "review");
            }
            _ => panic!("Expected FunctionCall part"),
        }
    }

    #[test]
    fn test_parse_cohere_missing_message() {
        assert!(CohereModel::parse_cohere_response(&json!({"message_": 1})).is_err());
    }
}
