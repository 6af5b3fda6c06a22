//! Book graph: canonical nodes and edges built from model output.
//!
//! Nodes are books tagged Seed / Recommended / Level2; edges carry the
//! shared attribute that links two books.

mod normalize;

pub use normalize::normalize;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author shown when the model gives none.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
/// Rationale shown when the model gives none.
pub const DEFAULT_REASON: &str = "No recommendation reason provided.";
/// Summary shown when the model gives none.
pub const DEFAULT_SUMMARY: &str = "No summary available.";
/// Edge label used when the model gives none.
pub const DEFAULT_EDGE_LABEL: &str = "Related";

/// Tier of a book in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Group {
    /// One of the three user-supplied books
    Seed,
    /// Primary recommendation
    #[default]
    Recommended,
    /// Derived recommendation
    Level2,
}

impl Group {
    /// Classify a raw group tag; anything unrecognised is `Recommended`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "Seed" => Group::Seed,
            "Level2" => Group::Level2,
            _ => Group::Recommended,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Seed => "Seed",
            Group::Recommended => "Recommended",
            Group::Level2 => "Level2",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique within a graph; the title when the model gives no id.
    pub id: String,
    /// Display label.
    pub title: String,
    pub author: String,
    pub group: Group,
    pub summary: String,
    pub reason: String,
}

/// An undirected relation between two books.
///
/// `source`/`target` are not checked against the node list; edges to unknown
/// ids are kept and simply draw nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Canonical graph, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl BookGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn count_group(&self, group: Group) -> usize {
        self.nodes.iter().filter(|n| n.group == group).count()
    }

    pub fn seed_count(&self) -> usize {
        self.count_group(Group::Seed)
    }

    /// A graph without edges is structurally valid but useless to the user.
    pub fn has_edges(&self) -> bool {
        !self.edges.is_empty()
    }

    /// Edges whose endpoints are not both present.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| self.node(&e.source).is_none() || self.node(&e.target).is_none())
    }
}
