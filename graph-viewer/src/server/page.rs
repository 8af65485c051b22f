// Query page served at `/`
//
// Layout (ForceAtlas2) and drawing are done in the browser by graphology + sigma.js.
use crate::config::{
    DEFAULT_GRAPH_HEIGHT, DEFAULT_GRAPH_KEY, DEFAULT_QUERY, GRAPH_HEIGHT_STEP, MAX_GRAPH_HEIGHT,
    MIN_GRAPH_HEIGHT,
};
use crate::legend::{EDGE_COLOR, FALLBACK_COLOR};

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Neo4j Graph Viewer</title>
<style>
  body { font-family: sans-serif; margin: 2rem; color: #3d3530; background: #faf7f2; }
  textarea { width: 100%; font-family: monospace; }
  #message { margin: 1rem 0; padding: 0.6rem; border-radius: 4px; display: none; }
  #message.success { display: block; background: #e3efdc; }
  #message.warning { display: block; background: #f7ecd0; }
  #message.error { display: block; background: #f3d9d4; }
  #stage { position: relative; }
  #graph { width: 100%; border: 1px solid #d4c4b0; background: #fff; }
  .legend span { display: inline-block; margin-right: 1rem; }
  .legend i { display: inline-block; width: 0.8rem; height: 0.8rem; margin-right: 0.3rem; }
  #node-legend i { border-radius: 50%; }
  #rel-legend i { height: 0.2rem; vertical-align: middle; }
  .panel { position: absolute; top: 0.5rem; width: 260px; max-height: 80%; overflow: auto;
           background: #fffdf9; border: 1px solid #d4c4b0; border-radius: 4px; padding: 0.6rem;
           font-size: 0.85rem; display: none; }
  #node-panel { right: 0.5rem; }
  #rel-panel { left: 0.5rem; }
  .panel table { width: 100%; border-collapse: collapse; }
  .panel td { border-top: 1px solid #eee4d6; padding: 0.2rem; vertical-align: top; word-break: break-word; }
  .panel button { float: right; }
</style>
<script src="https://cdn.jsdelivr.net/npm/graphology@0.25.4/dist/graphology.umd.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/graphology-library@0.8.0/dist/graphology-library.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/sigma@2.4.0/build/sigma.min.js"></script>
</head>
<body>
<h1>Neo4j Graph Viewer</h1>
<label for="query">Enter Cypher Query</label>
<textarea id="query" rows="5">{{DEFAULT_QUERY}}</textarea>
<p>
  <label for="height">Graph Height: <output id="height-value">{{DEFAULT_HEIGHT}}</output></label>
  <input id="height" type="range" min="{{MIN_HEIGHT}}" max="{{MAX_HEIGHT}}" step="{{HEIGHT_STEP}}" value="{{DEFAULT_HEIGHT}}">
</p>
<button id="visualize">Visualize Graph</button>
<div id="message"></div>
<div id="node-legend" class="legend"></div>
<div id="rel-legend" class="legend"></div>
<div id="stage">
  <div id="graph" style="height: {{DEFAULT_HEIGHT}}px"></div>
  <div id="node-panel" class="panel"></div>
  <div id="rel-panel" class="panel"></div>
</div>
<script>
const FALLBACK_COLOR = "{{FALLBACK_COLOR}}";
const EDGE_COLOR = "{{EDGE_COLOR}}";
const GRAPH_KEY = "{{GRAPH_KEY}}";
let renderer = null;

const heightInput = document.getElementById("height");
heightInput.addEventListener("input", () => {
  document.getElementById("height-value").textContent = heightInput.value;
});

function showMessage(status, text) {
  const el = document.getElementById("message");
  el.className = status;
  el.textContent = text;
}

function legendEntry(color, text) {
  const span = document.createElement("span");
  const swatch = document.createElement("i");
  swatch.style.background = color;
  span.appendChild(swatch);
  span.appendChild(document.createTextNode(text));
  return span;
}

function drawLegend(summary) {
  const nodes = document.getElementById("node-legend");
  nodes.innerHTML = "";
  for (const entry of summary.labels) {
    nodes.appendChild(legendEntry(entry.color, entry.label));
  }
  const rels = document.getElementById("rel-legend");
  rels.innerHTML = "";
  for (const entry of summary.relationshipTypes) {
    rels.appendChild(legendEntry(EDGE_COLOR, entry.type + " (" + entry.count + ")"));
  }
}

function hidePanels() {
  for (const id of ["node-panel", "rel-panel"]) {
    document.getElementById(id).style.display = "none";
  }
}

function showPanel(id, title, subtitle, properties) {
  const panel = document.getElementById(id);
  panel.innerHTML = "";
  const close = document.createElement("button");
  close.textContent = "×";
  close.addEventListener("click", () => { panel.style.display = "none"; });
  panel.appendChild(close);
  const heading = document.createElement("strong");
  heading.textContent = title;
  panel.appendChild(heading);
  const sub = document.createElement("div");
  sub.textContent = subtitle;
  panel.appendChild(sub);
  const table = document.createElement("table");
  const keys = Object.keys(properties);
  if (keys.length === 0) {
    const row = table.insertRow();
    row.insertCell().textContent = "No properties";
  }
  for (const key of keys) {
    const row = table.insertRow();
    row.insertCell().textContent = key;
    const value = properties[key];
    row.insertCell().textContent = typeof value === "object" ? JSON.stringify(value) : String(value);
  }
  panel.appendChild(table);
  panel.style.display = "block";
}

function resetStyles(graph) {
  graph.forEachNode((n, attrs) => {
    graph.mergeNodeAttributes(n, { size: attrs.baseSize, color: attrs.baseColor, highlighted: false });
  });
  graph.forEachEdge((e) => {
    graph.mergeEdgeAttributes(e, { color: EDGE_COLOR, size: 2 });
  });
}

function highlightNeighbourhood(graph, node) {
  const attrs = graph.getNodeAttributes(node);
  const neighbours = new Set(graph.neighbors(node));
  graph.forEachNode((n, a) => {
    if (n === node) {
      graph.mergeNodeAttributes(n, { size: a.baseSize * 1.3, highlighted: true });
    } else if (!neighbours.has(n)) {
      graph.setNodeAttribute(n, "color", a.baseColor.startsWith("#") ? a.baseColor + "40" : "#e8e3d8");
    }
  });
  graph.forEachEdge((e, _a, source, target) => {
    if (source === node || target === node) {
      graph.mergeEdgeAttributes(e, { color: attrs.baseColor, size: 3 });
    } else {
      graph.setEdgeAttribute(e, "color", "#e8e3d8");
    }
  });
}

function buildGraph(payload) {
  const colors = new Map(payload.summary.labels.map((e) => [e.label, e.color]));
  const graph = new graphology.MultiDirectedGraph();
  for (const node of payload.graphData.nodes) {
    const primary = node.labels[0] || "Unknown";
    const p = node.properties;
    const size = typeof p.size === "number" ? p.size : 12;
    const color = colors.get(primary) || FALLBACK_COLOR;
    graph.addNode(String(node.identity), {
      x: Math.random() * 10 - 5,
      y: Math.random() * 10 - 5,
      size: size,
      baseSize: size,
      label: String(p.name || p.label || p.title || "Node " + primary),
      color: color,
      baseColor: color,
      labels: node.labels,
      properties: p,
    });
  }
  for (const rel of payload.graphData.relationships) {
    const source = String(rel.start);
    const target = String(rel.end);
    if (graph.hasNode(source) && graph.hasNode(target)) {
      graph.addEdgeWithKey(source + "-" + target + "-" + rel.identity, source, target, {
        size: 2,
        color: EDGE_COLOR,
        label: rel.type,
        type: "arrow",
        identity: rel.identity,
        relType: rel.type,
        properties: rel.properties,
      });
    }
  }
  graphologyLibrary.layoutForceAtlas2.assign(graph, {
    iterations: 100,
    settings: { gravity: 1, scalingRatio: 10 },
  });
  return graph;
}

function drawGraph(payload) {
  const container = document.getElementById("graph");
  container.style.height = payload.height + "px";
  if (renderer) { renderer.kill(); renderer = null; }
  hidePanels();

  const graph = buildGraph(payload);
  const sigma = new Sigma(graph, container, {
    renderEdgeLabels: false,
    enableEdgeClickEvents: true,
    enableEdgeHoverEvents: true,
    labelColor: { color: "#4a4137" },
    labelSize: 14,
  });
  renderer = sigma;

  let dragged = null;
  let moved = false;
  sigma.on("downNode", (e) => {
    dragged = e.node;
    moved = false;
    document.body.style.cursor = "grabbing";
  });
  sigma.getMouseCaptor().on("mousemovebody", (e) => {
    if (!dragged) return;
    const pos = sigma.viewportToGraph(e);
    graph.mergeNodeAttributes(dragged, { x: pos.x, y: pos.y });
    moved = true;
    e.preventSigmaDefault();
    e.original.preventDefault();
    e.original.stopPropagation();
  });
  sigma.getMouseCaptor().on("mouseup", () => {
    dragged = null;
    document.body.style.cursor = "default";
  });

  sigma.on("clickNode", ({ node }) => {
    if (moved) { moved = false; return; }
    const attrs = graph.getNodeAttributes(node);
    resetStyles(graph);
    highlightNeighbourhood(graph, node);
    showPanel("node-panel", attrs.label, "Labels: " + (attrs.labels.join(", ") || "none"), attrs.properties);
    sigma.refresh();
  });
  sigma.on("clickEdge", ({ edge }) => {
    const attrs = graph.getEdgeAttributes(edge);
    const [source, target] = graph.extremities(edge);
    showPanel("rel-panel", attrs.relType,
      graph.getNodeAttribute(source, "label") + " → " + graph.getNodeAttribute(target, "label"),
      attrs.properties);
  });
  sigma.on("clickStage", () => {
    hidePanels();
    resetStyles(graph);
    sigma.refresh();
  });
  sigma.on("enterNode", ({ node }) => {
    if (!dragged) document.body.style.cursor = "grab";
    const a = graph.getNodeAttributes(node);
    graph.setNodeAttribute(node, "size", a.baseSize * (a.highlighted ? 1.5 : 1.2));
    sigma.refresh();
  });
  sigma.on("leaveNode", ({ node }) => {
    if (!dragged) document.body.style.cursor = "default";
    const a = graph.getNodeAttributes(node);
    graph.setNodeAttribute(node, "size", a.baseSize * (a.highlighted ? 1.3 : 1));
    sigma.refresh();
  });
  sigma.on("enterEdge", ({ edge }) => {
    graph.setEdgeAttribute(edge, "size", 3);
    sigma.refresh();
  });
  sigma.on("leaveEdge", ({ edge }) => {
    graph.setEdgeAttribute(edge, "size", 2);
    sigma.refresh();
  });
}

document.getElementById("visualize").addEventListener("click", async () => {
  showMessage("warning", "Querying Neo4j...");
  try {
    const response = await fetch("/query", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({
        query: document.getElementById("query").value,
        height: Number(heightInput.value),
        key: GRAPH_KEY,
      }),
    });
    const payload = await response.json();
    showMessage(payload.status, payload.message);
    if (payload.status === "success") {
      drawLegend(payload.summary);
      drawGraph(payload);
    }
  } catch (err) {
    showMessage("error", "Error: " + err);
  }
});
</script>
</body>
</html>
"##;

/// Render the query page with the configured defaults.
pub fn render() -> String {
    TEMPLATE
        .replace("{{DEFAULT_QUERY}}", &escape_html(DEFAULT_QUERY))
        .replace("{{DEFAULT_HEIGHT}}", &DEFAULT_GRAPH_HEIGHT.to_string())
        .replace("{{MIN_HEIGHT}}", &MIN_GRAPH_HEIGHT.to_string())
        .replace("{{MAX_HEIGHT}}", &MAX_GRAPH_HEIGHT.to_string())
        .replace("{{HEIGHT_STEP}}", &GRAPH_HEIGHT_STEP.to_string())
        .replace("{{FALLBACK_COLOR}}", FALLBACK_COLOR)
        .replace("{{EDGE_COLOR}}", EDGE_COLOR)
        .replace("{{GRAPH_KEY}}", DEFAULT_GRAPH_KEY)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        let html = render();
        assert!(!html.contains("{{"));
        assert!(html.contains("MATCH (n)-[r]-&gt;(m) RETURN n, r, m LIMIT 50"));
        assert!(html.contains(r#"min="400" max="1200" step="50" value="600""#));
    }

    #[test]
    fn test_render_includes_layout_panels_and_legends() {
        let html = render();
        assert!(html.contains("graphology-library"));
        assert!(html.contains("layoutForceAtlas2.assign(graph"));
        assert!(html.contains("iterations: 100"));
        assert!(html.contains(r#"id="node-panel""#));
        assert!(html.contains(r#"id="rel-panel""#));
        assert!(html.contains(r#"sigma.on("clickNode""#));
        assert!(html.contains(r#"sigma.on("clickEdge""#));
        assert!(html.contains("summary.relationshipTypes"));
        assert!(html.contains(&format!(r#"const EDGE_COLOR = "{}";"#, EDGE_COLOR)));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
