//! HTML shell for the vis-network graph view.

use super::RenderOptions;
use serde_json::{json, Value};

pub(super) const VIS_NETWORK_SRC: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>NextChapter reading map</title>
<script src="__VIS_SRC__"></script>
<style>
@import url('https://fonts.googleapis.com/css2?family=Source+Sans+3:wght@400;500;600;700&display=swap');
html, body { margin: 0; padding: 0; }
#network {
    width: 100%;
    height: __HEIGHT__px;
    background-color: __BACKGROUND__;
}
div.vis-tooltip {
    font-family: 'Source Sans 3', sans-serif !important;
    background: linear-gradient(135deg, #ffffff 0%, #f8f9fa 100%) !important;
    color: #000000 !important;
    border: 2px solid #e0e0e0 !important;
    border-radius: 16px !important;
    padding: 20px !important;
    box-shadow: 0 10px 40px rgba(0,0,0,0.15) !important;
    max-width: 380px !important;
    font-size: 14px !important;
    line-height: 1.7 !important;
    white-space: pre-wrap !important;
    word-wrap: break-word !important;
    z-index: 999999 !important;
    pointer-events: none !important;
}
canvas { outline: none !important; }
</style>
</head>
<body>
<div id="network"></div>
<script>
const options = __OPTIONS__;
const graphData = __GRAPH_DATA__;
const nodes = new vis.DataSet(graphData.nodes);
const edges = new vis.DataSet(graphData.edges);
new vis.Network(document.getElementById("network"), { nodes: nodes, edges: edges }, options);
</script>
</body>
</html>
"#;

/// vis-network options: undirected labelled edges, forceAtlas2Based physics.
pub(super) fn network_options(opts: &RenderOptions) -> Value {
    json!({
        "nodes": {
            "font": {
                "size": 16,
                "face": "Source Sans 3",
                "color": opts.font_color,
                "strokeWidth": 3,
                "strokeColor": "#ffffff",
                "bold": true
            },
            "borderWidth": 2,
            "borderWidthSelected": 4,
            "shadow": { "enabled": true, "size": 10 }
        },
        "edges": {
            "color": { "color": "#666666", "inherit": false },
            "width": 2,
            "smooth": { "type": "continuous", "roundness": 0.5 },
            "font": {
                "size": 12,
                "face": "Source Sans 3",
                "align": "middle",
                "background": "#ffffff",
                "strokeWidth": 0,
                "bold": true
            },
            "arrows": { "to": { "enabled": false } }
        },
        "physics": {
            "enabled": true,
            "solver": "forceAtlas2Based",
            "forceAtlas2Based": {
                "gravitationalConstant": -200,
                "centralGravity": 0.01,
                "springLength": 350,
                "springConstant": 0.02,
                "damping": 0.7,
                "avoidOverlap": 1
            },
            "stabilization": {
                "enabled": true,
                "iterations": opts.stabilization_iterations
            }
        },
        "interaction": {
            "hover": true,
            "tooltipDelay": 50,
            "hideEdgesOnDrag": false,
            "hideEdgesOnZoom": false
        }
    })
}

/// Make serialized JSON safe to inline in a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\uXXXX`
/// forms decode to the same characters.
pub(super) fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Fill the template. Graph data goes in last so model text is never
/// scanned for placeholders.
pub(super) fn fill(opts: &RenderOptions, options_json: &str, graph_json: &str) -> String {
    DOCUMENT_TEMPLATE
        .replace("__VIS_SRC__", VIS_NETWORK_SRC)
        .replace("__HEIGHT__", &opts.height_px.to_string())
        .replace("__BACKGROUND__", &opts.background)
        .replace("__OPTIONS__", options_json)
        .replace("__GRAPH_DATA__", graph_json)
}
