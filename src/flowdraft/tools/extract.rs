// SPDX-License-Identifier: MIT

use crate::adk::error::FlowdraftError;
use crate::adk::tool::Tool;
use crate::flowdraft::workflow::extract;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const EXTRACT_TOOL_NAME: &str = "generate_workflow_from_description";

// --- Static schema ---

static EXTRACT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let mut schema = serde_json::to_value(schema_for!(ExtractWorkflowArgs))
        .unwrap_or_else(|_| json!({ "type": "object" }));
    // Providers want a bare object schema
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    schema
});

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExtractWorkflowArgs {
    /// Plain-text description of the process to turn into a workflow
    pub description: String,
}

/// Exposes the keyword extractor to agents
#[derive(Debug, Default)]
pub struct ExtractWorkflowTool;

impl ExtractWorkflowTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for ExtractWorkflowTool {
    fn name(&self) -> &str {
        EXTRACT_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Extracts steps and connections from plain text descriptions. Returns a workflow graph with nodes (start, process, decision, end) and directed edges."
    }

    fn schema(&self) -> &Value {
        &EXTRACT_SCHEMA
    }

    async fn execute(&self, input: Value) -> Result<Value, FlowdraftError> {
        let args: ExtractWorkflowArgs = serde_json::from_value(input)?;
        let workflow = extract(&args.description);
        Ok(serde_json::to_value(workflow)?)
    }
}
