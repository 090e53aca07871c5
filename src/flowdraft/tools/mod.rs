// SPDX-License-Identifier: MIT

pub mod extract;
pub mod registry;

pub use extract::{ExtractWorkflowTool, EXTRACT_TOOL_NAME};
pub use registry::ToolRegistry;

use std::sync::Arc;

/// Registry preloaded with the built-in tools
pub async fn default_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    registry.register(Arc::new(ExtractWorkflowTool::new())).await;
    registry
}
