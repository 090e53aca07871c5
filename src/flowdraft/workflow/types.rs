//! Workflow graph type definitions
//!
//! The JSON shape follows the flowchart renderer: nodes carry their label
//! under `data`, edges are bare `source`/`target` pairs. Nodes with a flat
//! top-level `label` are accepted on input too.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::adk::error::WorkflowError;

/// Rendering shape of a node
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Process,
    Decision,
    End,
}

/// Display payload of a node
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NodeData {
    pub label: String,
}

/// A node in the workflow graph
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "RawNode")]
pub struct Node {
    /// Unique identifier within the graph
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            data: NodeData {
                label: label.into(),
            },
        }
    }

    pub fn start() -> Self {
        Self::new("start", NodeKind::Start, "Start")
    }

    pub fn end() -> Self {
        Self::new("end", NodeKind::End, "End")
    }
}

/// Input form of a node, either `data.label` or a flat `label`
#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    data: Option<NodeData>,
    label: Option<String>,
}

impl TryFrom<RawNode> for Node {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let data = match (raw.data, raw.label) {
            (Some(data), _) => data,
            (None, Some(label)) => NodeData { label },
            (None, None) => return Err(format!("node '{}' has no label", raw.id)),
        };
        Ok(Self {
            id: raw.id,
            kind: raw.kind,
            data,
        })
    }
}

/// A directed edge between two nodes
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A workflow graph: nodes in creation order plus directed edges
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct Workflow {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    /// Check the rules every graph must satisfy: non-empty, unique ids,
    /// edges referencing existing nodes.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.nodes.is_empty() {
            return Err(WorkflowError::Empty);
        }

        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(WorkflowError::DuplicateNode(node.id.clone()));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(WorkflowError::UnknownNode {
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Check the flowchart topology on top of [`Workflow::validate`]:
    /// a single start node first, a single end node last, and every node
    /// reachable from start.
    pub fn validate_topology(&self) -> Result<(), WorkflowError> {
        self.validate()?;

        let count = |kind: NodeKind| self.nodes.iter().filter(|n| n.kind == kind).count();

        let first = &self.nodes[0];
        if first.kind != NodeKind::Start || count(NodeKind::Start) != 1 {
            return Err(WorkflowError::MissingStart);
        }
        let last = &self.nodes[self.nodes.len() - 1];
        if last.kind != NodeKind::End || count(NodeKind::End) != 1 {
            return Err(WorkflowError::MissingEnd);
        }

        let reached = self.reachable_from(&first.id);
        match self.nodes.iter().find(|n| !reached.contains(n.id.as_str())) {
            Some(orphan) => Err(WorkflowError::Unreachable(orphan.id.clone())),
            None => Ok(()),
        }
    }

    /// Ids reachable from `root` by following edges forward, `root` included
    pub fn reachable_from<'a>(&'a self, root: &'a str) -> HashSet<&'a str> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            for &next in adjacency.get(id).into_iter().flatten() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}
