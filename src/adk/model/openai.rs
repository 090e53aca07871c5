// SPDX-License-Identifier: MIT

//! OpenAI Model - Chat Completions API implementation

use super::{new_call_id, Content, GenerationConfig, Model, Part};
use crate::adk::error::{FlowdraftError, ModelError};
use crate::adk::tool::Tool;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat model implementation
pub struct OpenAIModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl OpenAIModel {
    pub fn new(model_name: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at an OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Convert internal Content to OpenAI messages.
    ///
    /// Tool responses fan out to one `tool` message each.
    fn content_to_openai_messages(content: &Content) -> Vec<Value> {
        let role = match content.role.as_str() {
            "model" => "assistant",
            other => other,
        };

        let mut tool_messages = Vec::new();
        let mut tool_calls = Vec::new();
        let mut text_content = String::new();

        for part in &content.parts {
            match part {
                Part::Text(t) => text_content.push_str(t),
                Part::Thinking(_) => {}
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
            vec![json!({
                "role": role,
                "content": if text_content.is_empty() { Value::Null } else { json!(text_content) },
                "tool_calls": tool_calls
            })]
        } else {
            vec![json!({
                "role": role,
                "content": text_content
            })]
        }
    }

    /// Convert tools to OpenAI function format
    fn tools_to_openai_format(tools: &[Arc<dyn Tool>]) -> Vec<Value> {
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

    /// Parse OpenAI response into Content
    fn parse_openai_response(response: &Value) -> Result<Content, FlowdraftError> {
        let choice = response["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| ModelError::InvalidResponse("no choices in OpenAI response".into()))?;

        let message = &choice["message"];
        let mut parts = Vec::new();

        if let Some(content) = message["content"].as_str() {
            if !content.is_empty() {
                parts.push(Part::Text(content.to_string()));
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

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for OpenAIModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        tools: Option<&[Arc<dyn Tool>]>,
    ) -> Result<Content, FlowdraftError> {
        let url = format!("{}/chat/completions", self.base_url);

        let messages: Vec<Value> = history
            .iter()
            .flat_map(Self::content_to_openai_messages)
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
                body["top_p"] = json!(top_p);
            }
        }

        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = json!(Self::tools_to_openai_format(tools));
                body["tool_choice"] = json!("auto");
            }
        }

        log::debug!(
            "OpenAI request body: {}",
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
            return Err(FlowdraftError::api("OpenAI", text));
        }

        let resp_json: Value = resp.json().await?;
        log::debug!("OpenAI response: {}", resp_json);

        Self::parse_openai_response(&resp_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_to_openai_user_message() {
        let content = Content::text("user", "Hello");

        let msgs = OpenAIModel::content_to_openai_messages(&content);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0]["role"], "user");
        assert_eq!(msgs[0]["content"], "Hello");
    }

    #[test]
    fn test_content_to_openai_assistant_message() {
        let content = Content::text("model", "I can help");

        let msgs = OpenAIModel::content_to_openai_messages(&content);
        assert_eq!(msgs[0]["role"], "assistant");
    }

    #[test]
    fn test_content_to_openai_with_function_call() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![Part::FunctionCall {
                id: "call_1".to_string(),
                name: "generate_workflow_from_description".to_string(),
                args: json!({"description": "review it"}),
            }],
        };

        let msgs = OpenAIModel::content_to_openai_messages(&content);
        assert_eq!(msgs[0]["role"], "assistant");
        assert!(msgs[0]["content"].is_null());
        assert_eq!(msgs[0]["tool_calls"][0]["id"], "call_1");
        assert_eq!(
            msgs[0]["tool_calls"][0]["function"]["name"],
            "generate_workflow_from_description"
        );
    }

    #[test]
    fn test_function_responses_fan_out() {
        let content = Content {
            role: "user".to_string(),
            parts: vec![
                Part::FunctionResponse {
                    id: "a".to_string(),
                    name: "t".to_string(),
                    response: json!({"ok": 1}),
                },
                Part::FunctionResponse {
                    id: "b".to_string(),
                    name: "t".to_string(),
                    response: json!({"ok": 2}),
                },
            ],
        };

        let msgs = OpenAIModel::content_to_openai_messages(&content);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0]["role"], "tool");
        assert_eq!(msgs[1]["tool_call_id"], "b");
    }

    #[test]
    fn test_parse_openai_function_call_response() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_123",
                        "type": "function",
                        "function": {
                            "name": "generate_workflow_from_description",
                            "arguments": "{\"description\": \"approve the budget\"}"
                        }
                    }]
                }
            }]
        });

        let content = OpenAIModel::parse_openai_response(&response).unwrap();
        assert_eq!(content.parts.len(), 1);

        match &content.parts[0] {
            Part::FunctionCall { id, name, args } => {
                assert_eq!(id, "call_123");
                assert_eq!(name, "generate_workflow_from_description");
                assert_eq!(args["description"], "approve the budget");
            }
            _ => panic!("Expected FunctionCall part"),
        }
    }

    #[test]
    fn test_parse_openai_without_choices_fails() {
        let result = OpenAIModel::parse_openai_response(&json!({"error": "nope"}));
        assert!(result.is_err());
    }
}
