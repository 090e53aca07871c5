// SPDX-License-Identifier: MIT

//! Keyword-based workflow extraction
//!
//! Turns a free-text process description into a small flowchart. Matching is
//! case-insensitive substring search, so `"Reviewed"` fires the review rule and
//! `"now"` fires the decision rule. Every output has a single start node
//! first, a single end node last, and a path from one to the other.

use super::types::{Edge, Node, NodeKind, Workflow};

/// A node that is appended when any of its keywords occurs in the description
struct KeywordRule {
    keywords: &'static [&'static str],
    id: &'static str,
    kind: NodeKind,
    label: &'static str,
}

/// Evaluated in order; each fired rule chains after the previous node.
const RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["review", "approve"],
        id: "review",
        kind: NodeKind::Process,
        label: "Review",
    },
    KeywordRule {
        keywords: &["decision", "yes", "no"],
        id: "decision",
        kind: NodeKind::Decision,
        label: "Decision",
    },
];

/// Appends nodes and keeps a cursor on the most recently added one
struct Chain {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    last: String,
}

impl Chain {
    fn new() -> Self {
        let start = Node::start();
        Self {
            last: start.id.clone(),
            nodes: vec![start],
            edges: Vec::new(),
        }
    }

    fn link(&mut self, node: Node) {
        self.edges.push(Edge::new(self.last.clone(), node.id.clone()));
        self.last = node.id.clone();
        self.nodes.push(node);
    }

    fn finish(mut self) -> Workflow {
        let end = Node::end();
        if !self.edges.iter().any(|e| e.target == end.id) {
            self.edges.push(Edge::new(self.last.clone(), end.id.clone()));
        }
        self.nodes.push(end);

        Workflow {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Build a workflow graph from a process description. Never fails; text with
/// no keywords yields `start -> end`.
pub fn extract(description: &str) -> Workflow {
    let desc = description.to_lowercase();
    let mut chain = Chain::new();

    for rule in RULES {
        if rule.keywords.iter().any(|k| desc.contains(k)) {
            log::debug!("Keyword rule '{}' matched", rule.id);
            chain.link(Node::new(rule.id, rule.kind, rule.label));
        }
    }

    chain.finish()
}
