//! Graph renderer: book graph in, self-contained interactive HTML out.
//!
//! Visual encoding is fixed per group. Tooltips are plain text so model
//! output is never interpreted as markup.

mod template;

use crate::error::{NextChapterError, Result};
use crate::graph::{normalize, BookGraph, Group, Node};
use serde::Serialize;
use serde_json::Value;

/// Page-level visualization settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub height_px: u32,
    pub background: String,
    pub font_color: String,
    pub stabilization_iterations: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            height_px: 750,
            background: "#ffffff".to_string(),
            font_color: "#000000".to_string(),
            stabilization_iterations: 200,
        }
    }
}

/// Marker color and size for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub color: &'static str,
    pub size: u32,
}

impl NodeStyle {
    pub fn for_group(group: Group) -> Self {
        match group {
            Group::Seed => NodeStyle { color: "#FF6B6B", size: 50 },
            Group::Level2 => NodeStyle { color: "#FFD93D", size: 25 },
            Group::Recommended => NodeStyle { color: "#4ECDC4", size: 35 },
        }
    }
}

fn badge(group: Group) -> &'static str {
    match group {
        Group::Seed => "🔴 Your Input Book",
        Group::Level2 => "🟡 Deep Recommendation",
        Group::Recommended => "🔵 Recommended Book",
    }
}

/// Hover text: badge, title, author, rationale, summary, one block each.
pub fn tooltip_text(node: &Node) -> String {
    format!(
        "{}\n\n📚 {}\n✍️ {}\n\n💡 Why this book:\n{}\n\n📖 Summary:\n{}",
        badge(node.group),
        node.title,
        node.author,
        node.reason,
        node.summary
    )
}

/// Node record as vis-network consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    /// Plain-text tooltip
    pub title: String,
    pub color: &'static str,
    pub size: u32,
    pub group: &'static str,
}

/// Edge record as vis-network consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub title: String,
}

/// Everything the browser widget needs to draw the graph.
#[derive(Debug, Clone, Serialize)]
pub struct VisPayload {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

/// Map the canonical graph onto visual attributes.
pub fn vis_payload(graph: &BookGraph) -> VisPayload {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let style = NodeStyle::for_group(node.group);
            VisNode {
                id: node.id.clone(),
                label: node.title.clone(),
                title: tooltip_text(node),
                color: style.color,
                size: style.size,
                group: node.group.as_str(),
            }
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| VisEdge {
            from: edge.source.clone(),
            to: edge.target.clone(),
            label: edge.label.clone(),
            title: edge.label.clone(),
        })
        .collect();

    VisPayload { nodes, edges }
}

/// Produce the standalone HTML document for a graph.
pub fn render_document(graph: &BookGraph, opts: &RenderOptions) -> Result<String> {
    if graph.nodes.is_empty() {
        return Err(NextChapterError::CannotRender(
            "graph has no nodes".to_string(),
        ));
    }

    let dangling = graph.dangling_edges().count();
    if dangling > 0 {
        log::debug!("{} edge(s) reference unknown nodes and will not be drawn", dangling);
    }

    let payload = serde_json::to_string(&vis_payload(graph))
        .map_err(|e| NextChapterError::CannotRender(format!("graph data: {}", e)))?;
    let options = serde_json::to_string(&template::network_options(opts))
        .map_err(|e| NextChapterError::CannotRender(format!("options: {}", e)))?;

    Ok(template::fill(
        opts,
        &template::script_safe(&options),
        &template::script_safe(&payload),
    ))
}

/// Normalize a raw extracted value and render it.
///
/// A value the normalizer rejects cannot be rendered.
pub fn render_value(value: &Value, opts: &RenderOptions) -> Result<String> {
    let graph = normalize(value).map_err(|e| NextChapterError::CannotRender(e.to_string()))?;
    render_document(&graph, opts)
}
