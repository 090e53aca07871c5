// SPDX-License-Identifier: MIT

//! Workflow graphs: the data model, the keyword extractor and the
//! normalizer for model-produced payloads.

mod extractor;
mod normalizer;
pub mod types;

pub use extractor::extract;
pub use normalizer::normalize;
pub use types::{Edge, Node, NodeData, NodeKind, Workflow};
