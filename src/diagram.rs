//! Dimension-flow diagram building
//!
//! Turns an extracted [`Descriptor`] into a directed node/edge graph showing
//! how storage dimensions flow bottom→top through the transform chain. The
//! graph itself is the contract; [`DiagramGraph::to_mermaid`] is one emission
//! of it for viewers that speak Mermaid, and is trivially replaceable.

use crate::model::Descriptor;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// The role a dimension id plays in the overall flow. Ids can in principle
/// appear in both the bottom and top lists; bottom wins, deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeRole {
    /// i-th bottom (storage) dimension
    Bottom(usize),
    /// i-th top (logical) dimension
    Top(usize),
    /// Intermediate hidden dimension
    Hidden,
}

/// One dimension id in the flow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    pub id: i64,
    pub role: NodeRole,
}

impl DiagramNode {
    /// Human label disambiguating the id's role
    pub fn label(&self) -> String {
        match self.role {
            NodeRole::Bottom(i) => format!("Bottom[{i}] (id {})", self.id),
            NodeRole::Top(i) => format!("Top[{i}] (id {})", self.id),
            NodeRole::Hidden => format!("id {}", self.id),
        }
    }
}

/// One transform application from a lower to an upper dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    pub from: i64,
    pub to: i64,
    pub label: &'static str,
}

/// Directed dimension-flow graph, rebuilt per request, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct DiagramGraph {
    /// Distinct dimension ids, ascending
    pub nodes: Vec<DiagramNode>,
    /// One edge per (transform, lower id, upper id) triple, in transform
    /// storage order
    pub edges: Vec<DiagramEdge>,
}

impl DiagramGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Emit the graph as a fenced Mermaid block, bottom→top layout.
    pub fn to_mermaid(&self, title: &str) -> String {
        let mut out = String::new();
        out.push_str("```mermaid\n");
        out.push_str("graph BT\n");
        if !title.is_empty() {
            let _ = writeln!(out, "    %% {title}");
        }
        for node in &self.nodes {
            let _ = writeln!(out, "    {}[\"{}\"]", ident(node.id), node.label());
        }
        for edge in &self.edges {
            let _ = writeln!(
                out,
                "    {} -->|{}| {}",
                ident(edge.from),
                edge.label,
                ident(edge.to)
            );
        }
        out.push_str("```\n");
        out
    }
}

fn ident(id: i64) -> String {
    if id < 0 {
        format!("dn{}", -id)
    } else {
        format!("d{id}")
    }
}

/// Build the dimension-flow graph for a descriptor.
///
/// One node per distinct dimension id across bottom ids, top ids and all
/// transform lower/upper ids; one labeled edge per (lower, upper) pair per
/// transform. A transform with no lower ids (replicate) still contributes its
/// upper-id nodes, with no inbound edges.
pub fn build_dimension_flow(descriptor: &Descriptor) -> DiagramGraph {
    let mut roles: BTreeMap<i64, NodeRole> = BTreeMap::new();

    for (i, &id) in descriptor.bottom_ids().iter().enumerate() {
        roles.entry(id).or_insert(NodeRole::Bottom(i));
    }
    for (i, &id) in descriptor.top_ids().iter().enumerate() {
        roles.entry(id).or_insert(NodeRole::Top(i));
    }

    let mut edges = Vec::new();
    for transform in &descriptor.transforms {
        for &id in transform.lower_dims.iter().chain(&transform.upper_dims) {
            roles.entry(id).or_insert(NodeRole::Hidden);
        }
        for &from in &transform.lower_dims {
            for &to in &transform.upper_dims {
                edges.push(DiagramEdge {
                    from,
                    to,
                    label: transform.kind.label(),
                });
            }
        }
    }

    let nodes = roles
        .into_iter()
        .map(|(id, role)| DiagramNode { id, role })
        .collect();

    DiagramGraph { nodes, edges }
}
