// SPDX-License-Identifier: MIT

//! Workflow generation
//!
//! With an agent configured, the description is sent to the model together
//! with the extractor tool. A workflow returned by that tool wins over the
//! model's prose; otherwise the final answer is normalized and parsed.
//! Without an agent the extractor output is returned directly.

use crate::adk::agent::{Agent, LLMAgent};
use crate::adk::error::{FlowdraftError, WorkflowError};
use crate::adk::model::build_model;
use crate::flowdraft::config::AgentSettings;
use crate::flowdraft::tools::{default_registry, EXTRACT_TOOL_NAME};
use crate::flowdraft::workflow::{extract, normalize, Workflow};
use std::sync::Arc;

const AGENT_NAME: &str = "workflow-designer";

const INSTRUCTION: &str = "You are a workflow designer AI. \
Call the generate_workflow_from_description tool to ground your answer. \
Answer with a single JSON object with keys `nodes` and `edges`. \
Each node is {\"id\": string, \"type\": \"start\"|\"process\"|\"decision\"|\"end\", \"data\": {\"label\": string}}. \
Each edge is {\"source\": node id, \"target\": node id}.";

fn prompt_for(description: &str) -> String {
    format!(
        "Based on the following description, create a logical workflow \
(steps, decisions, and connections):\n\nDescription: {}\n\nRespond as JSON with keys: nodes and edges.",
        description
    )
}

/// Decode a model answer into a validated workflow
pub fn parse_workflow(text: &str) -> Result<Workflow, FlowdraftError> {
    let cleaned = normalize(text);
    let workflow: Workflow = serde_json::from_str(&cleaned)
        .map_err(|e| WorkflowError::InvalidPayload(e.to_string()))?;
    checked(workflow)
}

fn checked(workflow: Workflow) -> Result<Workflow, FlowdraftError> {
    workflow.validate()?;
    if let Err(e) = workflow.validate_topology() {
        log::warn!("Agent workflow has unusual topology: {}", e);
    }
    Ok(workflow)
}

/// Turns descriptions into workflows, optionally through a model-backed agent
#[derive(Clone)]
pub struct WorkflowGenerator {
    agent: Option<Arc<dyn Agent>>,
}

impl WorkflowGenerator {
    pub fn new(agent: Option<Arc<dyn Agent>>) -> Self {
        Self { agent }
    }

    /// Generator that only uses the keyword extractor
    pub fn deterministic() -> Self {
        Self { agent: None }
    }

    /// Build the agent described by `settings`, with the built-in tools
    pub async fn from_settings(settings: Option<&AgentSettings>) -> Self {
        let Some(settings) = settings else {
            log::info!("No agent configured, using keyword extraction only");
            return Self::deterministic();
        };

        log::info!(
            "Using provider: {} with model: {}",
            settings.model.provider,
            settings.model.model_name
        );

        let tools = default_registry().await.all().await;
        let agent = LLMAgent::new(
            AGENT_NAME.to_string(),
            INSTRUCTION.to_string(),
            build_model(&settings.model),
            tools,
        )
        .with_config(settings.generation.clone())
        .with_max_turns(settings.max_turns);

        Self::new(Some(Arc::new(agent)))
    }

    pub async fn generate(&self, description: &str) -> Result<Workflow, FlowdraftError> {
        let Some(agent) = &self.agent else {
            return Ok(extract(description));
        };

        let transcript = agent.run_traced(prompt_for(description)).await?;

        if let Some(value) = transcript.first_result_of(EXTRACT_TOOL_NAME) {
            match serde_json::from_value::<Workflow>(value.clone()) {
                Ok(workflow) => {
                    log::info!("Using workflow returned by {}", EXTRACT_TOOL_NAME);
                    return checked(workflow);
                }
                Err(e) => log::warn!("Ignoring undecodable tool result: {}", e),
            }
        }

        parse_workflow(&transcript.answer)
    }
}
