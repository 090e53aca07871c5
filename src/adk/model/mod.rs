// SPDX-License-Identifier: MIT

//! Model module - defines LLM model trait and implementations
//!
//! This module provides the core Model trait and shared types.
//! Model implementations are in their own submodules:
//! - [cohere] - Cohere's Chat v2 API
//! - [openai] - OpenAI's Chat Completions API
//! - [anthropic] - Anthropic's Messages API
//!
//! Constructors take credentials explicitly; nothing in here reads the
//! process environment.

pub mod anthropic;
pub mod cohere;
pub mod openai;

use crate::adk::error::{FlowdraftError, ModelError};
use crate::adk::tool::Tool;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }
}

/// Parts of a message - text, thinking, function calls, etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Reasoning emitted alongside tool calls (Anthropic thinking, Cohere tool plan)
    Thinking(String),
    /// Function/tool call requested by the model
    FunctionCall {
        /// Provider call id, echoed back on the matching response
        id: String,
        name: String,
        args: serde_json::Value,
    },
    /// Response from executing a function/tool
    FunctionResponse {
        id: String,
        name: String,
        response: serde_json::Value,
    },
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        tools: Option<&[Arc<dyn Tool>]>,
    ) -> Result<Content, FlowdraftError>;
}

/// Hosted model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Cohere,
    OpenAI,
    Anthropic,
}

impl Provider {
    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Cohere => "command-a-03-2025",
            Self::OpenAI => "gpt-4o-mini",
            Self::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    /// Environment variable holding the API key
    pub fn key_var(&self) -> &'static str {
        match self {
            Self::Cohere => "CO_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Environment variable overriding the API base URL
    pub fn base_url_var(&self) -> &'static str {
        match self {
            Self::Cohere => "COHERE_BASE_URL",
            Self::OpenAI => "OPENAI_BASE_URL",
            Self::Anthropic => "ANTHROPIC_BASE_URL",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cohere => "cohere",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cohere" | "co" => Ok(Self::Cohere),
            "openai" | "gpt" => Ok(Self::OpenAI),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(ModelError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Everything needed to reach a hosted model
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub provider: Provider,
    pub model_name: String,
    pub api_key: String,
    pub base_url: Option<String>,
}

/// Build the model client described by `settings`
pub fn build_model(settings: &ModelSettings) -> Arc<dyn Model> {
    let name = settings.model_name.clone();
    let key = settings.api_key.clone();

    match (settings.provider, settings.base_url.clone()) {
        (Provider::Cohere, None) => Arc::new(cohere::CohereModel::new(name, key)),
        (Provider::Cohere, Some(url)) => {
            Arc::new(cohere::CohereModel::new(name, key).with_base_url(url))
        }
        (Provider::OpenAI, None) => Arc::new(openai::OpenAIModel::new(name, key)),
        (Provider::OpenAI, Some(url)) => {
            Arc::new(openai::OpenAIModel::new(name, key).with_base_url(url))
        }
        (Provider::Anthropic, None) => Arc::new(anthropic::AnthropicModel::new(name, key)),
        (Provider::Anthropic, Some(url)) => {
            Arc::new(anthropic::AnthropicModel::new(name, key).with_base_url(url))
        }
    }
}

/// Fallback id for providers that omit one on tool calls
pub(crate) fn new_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}
