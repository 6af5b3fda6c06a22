//! Coerce an extracted JSON value into a canonical `BookGraph`.

use serde_json::{Map, Value};
use std::collections::HashSet;

use super::{
    BookGraph, Edge, Group, Node, DEFAULT_AUTHOR, DEFAULT_EDGE_LABEL, DEFAULT_REASON,
    DEFAULT_SUMMARY,
};
use crate::error::{NextChapterError, Result};

const NO_ENTRIES: &[Value] = &[];

/// Validate and default an extracted value.
///
/// A bare array is taken as the node list with no edges. Anything else must
/// be an object with a `nodes` array, otherwise the value is rejected.
/// Malformed node and edge entries are dropped rather than failing the graph.
pub fn normalize(value: &Value) -> Result<BookGraph> {
    let (raw_nodes, raw_edges): (&[Value], &[Value]) = match value {
        Value::Array(items) => (items.as_slice(), NO_ENTRIES),
        Value::Object(map) => {
            let nodes = match map.get("nodes") {
                Some(Value::Array(nodes)) => nodes.as_slice(),
                Some(other) => {
                    return Err(NextChapterError::NotAGraph(format!(
                        "\"nodes\" is {}, expected an array",
                        kind(other)
                    )))
                }
                None => {
                    return Err(NextChapterError::NotAGraph(
                        "object has no \"nodes\" key".to_string(),
                    ))
                }
            };
            let edges = match map.get("edges") {
                Some(Value::Array(edges)) => edges.as_slice(),
                None | Some(Value::Null) => NO_ENTRIES,
                Some(other) => {
                    log::warn!("Ignoring \"edges\" of type {}", kind(other));
                    NO_ENTRIES
                }
            };
            (nodes, edges)
        }
        other => {
            return Err(NextChapterError::NotAGraph(format!(
                "expected an object or array, got {}",
                kind(other)
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for raw in raw_nodes {
        let Some(node) = normalize_node(raw) else {
            log::warn!("Dropping node entry without id or title: {}", raw);
            continue;
        };
        if !seen.insert(node.id.clone()) {
            log::warn!("Dropping duplicate node id: {}", node.id);
            continue;
        }
        nodes.push(node);
    }

    let edges: Vec<Edge> = raw_edges
        .iter()
        .filter_map(|raw| {
            let edge = normalize_edge(raw);
            if edge.is_none() {
                log::warn!("Dropping edge entry without source or target: {}", raw);
            }
            edge
        })
        .collect();

    Ok(BookGraph { nodes, edges })
}

fn normalize_node(raw: &Value) -> Option<Node> {
    let obj = raw.as_object()?;

    let raw_id = identifier(obj, "id");
    let raw_title = identifier(obj, "title");

    let id = raw_id.clone().or_else(|| raw_title.clone())?;
    let title = raw_title.or(raw_id)?;

    Some(Node {
        id,
        title,
        author: text_or(obj, "author", DEFAULT_AUTHOR),
        group: obj
            .get("group")
            .and_then(Value::as_str)
            .map(Group::parse)
            .unwrap_or_default(),
        summary: text_or(obj, "summary", DEFAULT_SUMMARY),
        reason: text_or(obj, "reason", DEFAULT_REASON),
    })
}

fn normalize_edge(raw: &Value) -> Option<Edge> {
    let obj = raw.as_object()?;

    Some(Edge {
        source: identifier(obj, "source")?,
        target: identifier(obj, "target")?,
        label: text_or(obj, "label", DEFAULT_EDGE_LABEL),
    })
}

/// String form of an identifier-like field; blank strings count as absent.
fn identifier(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_node_gets_defaults() {
        let graph = normalize(&json!({"nodes": [{"id": "A"}], "edges": []})).unwrap();

        assert_eq!(graph.nodes.len(), 1);
        let node = &graph.nodes[0];
        assert_eq!(node.id, "A");
        assert_eq!(node.title, "A");
        assert_eq!(node.group, Group::Recommended);
        assert_eq!(node.author, DEFAULT_AUTHOR);
        assert_eq!(node.summary, DEFAULT_SUMMARY);
        assert_eq!(node.reason, DEFAULT_REASON);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_bare_array_is_node_list() {
        let graph = normalize(&json!([{"id": "A"}])).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_edge_missing_target_dropped() {
        let graph = normalize(&json!({
            "nodes": [{"id": "A"}],
            "edges": [{"source": "A"}]
        }))
        .unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_edge_with_empty_source_dropped() {
        let graph = normalize(&json!({
            "nodes": [{"id": "A"}, {"id": "B"}],
            "edges": [{"source": "", "target": "B"}, {"source": "A", "target": "B"}]
        }))
        .unwrap();
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].label, DEFAULT_EDGE_LABEL);
    }

    #[test]
    fn test_object_without_nodes_rejected() {
        let err = normalize(&json!({"books": []})).unwrap_err();
        assert!(matches!(err, NextChapterError::NotAGraph(_)));
    }

    #[test]
    fn test_scalar_rejected() {
        assert!(matches!(
            normalize(&json!("graph")),
            Err(NextChapterError::NotAGraph(_))
        ));
        assert!(matches!(normalize(&json!(null)), Err(NextChapterError::NotAGraph(_))));
    }

    #[test]
    fn test_nodes_not_array_rejected() {
        let err = normalize(&json!({"nodes": {"id": "A"}})).unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_id_falls_back_to_title_and_back() {
        let graph = normalize(&json!({"nodes": [
            {"title": "Dune"},
            {"id": 42},
            {"id": "x1", "title": "Solaris"}
        ]}))
        .unwrap();

        assert_eq!(graph.nodes[0].id, "Dune");
        assert_eq!(graph.nodes[0].title, "Dune");
        assert_eq!(graph.nodes[1].id, "42");
        assert_eq!(graph.nodes[1].title, "42");
        assert_eq!(graph.nodes[2].id, "x1");
        assert_eq!(graph.nodes[2].title, "Solaris");
    }

    #[test]
    fn test_node_without_id_or_title_dropped() {
        let graph = normalize(&json!({"nodes": [{"author": "Anon"}, "Dune", {"id": "A"}]})).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].id, "A");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let graph = normalize(&json!({"nodes": [
            {"id": "A", "group": "Seed"},
            {"id": "A", "group": "Level2"}
        ]}))
        .unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].group, Group::Seed);
    }

    #[test]
    fn test_groups_classified() {
        let graph = normalize(&json!({"nodes": [
            {"id": "A", "group": "Seed"},
            {"id": "B", "group": "Level2"},
            {"id": "C", "group": "Bestseller"},
            {"id": "D", "group": 3}
        ]}))
        .unwrap();
        let groups: Vec<Group> = graph.nodes.iter().map(|n| n.group).collect();
        assert_eq!(
            groups,
            vec![Group::Seed, Group::Level2, Group::Recommended, Group::Recommended]
        );
    }

    #[test]
    fn test_full_node_kept_verbatim() {
        let graph = normalize(&json!({"nodes": [{
            "id": "The Stranger",
            "title": "The Stranger",
            "author": "Albert Camus",
            "group": "Seed",
            "summary": "A man kills another on a beach.",
            "reason": "Input book."
        }], "edges": []}))
        .unwrap();
        let node = &graph.nodes[0];
        assert_eq!(node.author, "Albert Camus");
        assert_eq!(node.summary, "A man kills another on a beach.");
        assert_eq!(node.reason, "Input book.");
    }

    #[test]
    fn test_dangling_edges_preserved() {
        let graph = normalize(&json!({
            "nodes": [{"id": "A"}],
            "edges": [{"source": "A", "target": "Nowhere", "label": "Mood"}]
        }))
        .unwrap();
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].label, "Mood");
    }

    #[test]
    fn test_null_edges_treated_as_empty() {
        let graph = normalize(&json!({"nodes": [{"id": "A"}], "edges": null})).unwrap();
        assert!(graph.edges.is_empty());
    }
}
