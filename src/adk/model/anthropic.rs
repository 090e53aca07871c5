//! Anthropic Model - Claude Messages API implementation

use super::{new_call_id, Content, GenerationConfig, Model, Part};
use crate::adk::error::{FlowdraftError, ModelError};
use crate::adk::tool::Tool;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic Claude model implementation
pub struct AnthropicModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl AnthropicModel {
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

    /// Extract system message from history
    fn extract_system_message(history: &[Content]) -> Option<String> {
        history
            .iter()
            .find(|c| c.role == "system")
            .and_then(|c| c.parts.first())
            .and_then(|p| match p {
                Part::Text(t) => Some(t.clone()),
                _ => None,
            })
    }

    /// Convert internal Content to Anthropic message format
    fn content_to_anthropic_message(content: &Content) -> Option<Value> {
        // System prompt travels in the top-level `system` field
        if content.role == "system" {
            return None;
        }

        let role = match content.role.as_str() {
            "model" => "assistant",
            other => other,
        };

        let mut message_content = Vec::new();

        for part in &content.parts {
            match part {
                Part::Text(t) => {
                    message_content.push(json!({
                        "type": "text",
                        "text": t
                    }));
                }
                // Thinking blocks need a signature to be replayed; drop them.
                Part::Thinking(_) => {}
                Part::FunctionCall { id, name, args } => {
                    message_content.push(json!({
                        "type": "tool_use",
                        "id": id,
                        "name": name,
                        "input": args
                    }));
                }
                Part::FunctionResponse { id, response, .. } => {
                    message_content.push(json!({
                        "type": "tool_result",
                        "tool_use_id": id,
                        "content": serde_json::to_string(response).unwrap_or_default()
                    }));
                }
            }
        }

        if message_content.is_empty() {
            return None;
        }

        Some(json!({
            "role": role,
            "content": message_content
        }))
    }

    /// Convert tools to Anthropic tool format
    fn tools_to_anthropic_format(tools: &[Arc<dyn Tool>]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "description": t.description(),
                    "input_schema": t.schema()
                })
            })
            .collect()
    }

    /// Parse Anthropic response into Content
    fn parse_anthropic_response(response: &Value) -> Result<Content, FlowdraftError> {
        let content_blocks = response["content"].as_array().ok_or_else(|| {
            ModelError::InvalidResponse("no content in Anthropic response".into())
        })?;

        let mut parts = Vec::new();

        for block in content_blocks {
            match block["type"].as_str() {
                Some("text") => {
                    if let Some(text) = block["text"].as_str() {
                        if !text.is_empty() {
                            parts.push(Part::Text(text.to_string()));
                        }
                    }
                }
                Some("thinking") => {
                    if let Some(thinking) = block["thinking"].as_str() {
                        if !thinking.is_empty() {
                            parts.push(Part::Thinking(thinking.to_string()));
                        }
                    }
                }
                Some("tool_use") => {
                    let id = block["id"]
                        .as_str()
                        .map(String::from)
                        .unwrap_or_else(new_call_id);
                    let name = block["name"].as_str().unwrap_or_default().to_string();
                    let args = block["input"].clone();

                    parts.push(Part::FunctionCall { id, name, args });
                }
                _ => {}
            }
        }

        if let Some(stop_reason) = response["stop_reason"].as_str() {
            log::debug!("Anthropic stop reason: {}", stop_reason);
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for AnthropicModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        tools: Option<&[Arc<dyn Tool>]>,
    ) -> Result<Content, FlowdraftError> {
        let url = format!("{}/messages", self.base_url);

        let system = Self::extract_system_message(history);

        let messages: Vec<Value> = history
            .iter()
            .filter_map(Self::content_to_anthropic_message)
            .collect();

        let mut body = json!({
            "model": self.model_name,
            "messages": messages,
            "max_tokens": config.and_then(|c| c.max_output_tokens).unwrap_or(4096)
        });

        if let Some(sys) = system {
            body["system"] = json!(sys);
        }

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
            if let Some(top_k) = cfg.top_k {
                body["top_k"] = json!(top_k);
            }
        }

        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = json!(Self::tools_to_anthropic_format(tools));
            }
        }

        log::debug!(
            "Anthropic request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(FlowdraftError::api("Anthropic", text));
        }

        let resp_json: Value = resp.json().await?;
        log::debug!("Anthropic response: {}", resp_json);

        Self::parse_anthropic_response(&resp_json)
    }
}
