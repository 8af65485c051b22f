// Legend data for the graph page: label colours and relationship type counts
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::GraphResult;

/// Vintage palette used for the first labels.
pub const BASE_COLORS: [&str; 12] = [
    "#CC8B65", // Warm terracotta
    "#B4846C", // Dusty rose brown
    "#8B9D83", // Sage green
    "#D4A574", // Vintage gold
    "#9B8579", // Warm taupe
    "#C99A6E", // Caramel
    "#A8968D", // Stone gray
    "#B89B88", // Sandy brown
    "#7D8B7F", // Moss green
    "#D4B59E", // Beige
    "#8E7968", // Cocoa
    "#9FA89A", // Sage gray
];

/// Colour for nodes without any label.
pub const FALLBACK_COLOR: &str = "#9B8579";

/// Colour for relationships that are not highlighted.
pub const EDGE_COLOR: &str = "#d4c4b0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelColor {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipTypeCount {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub count: usize,
}

/// Counts and legend entries attached to a successful query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub node_count: usize,
    pub relationship_count: usize,
    pub labels: Vec<LabelColor>,
    pub relationship_types: Vec<RelationshipTypeCount>,
}

impl GraphSummary {
    pub fn from_graph(graph: &GraphResult) -> Self {
        Self {
            node_count: graph.nodes.len(),
            relationship_count: graph.relationships.len(),
            labels: label_color_map(&unique_labels(graph)),
            relationship_types: relationship_types(graph),
        }
    }

    /// Message shown to the user after a successful query.
    pub fn message(&self) -> String {
        format!(
            "Found {} nodes and {} relationships",
            self.node_count, self.relationship_count
        )
    }
}

/// Distinct node labels in sorted order.
pub fn unique_labels(graph: &GraphResult) -> Vec<String> {
    graph
        .nodes
        .iter()
        .flat_map(|n| n.labels.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct relationship types in sorted order, with how often each occurs.
pub fn relationship_types(graph: &GraphResult) -> Vec<RelationshipTypeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rel in &graph.relationships {
        *counts.entry(rel.rel_type.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(rel_type, count)| RelationshipTypeCount {
            rel_type: rel_type.to_string(),
            count,
        })
        .collect()
}

/// Generate `count` colours.
///
/// The base palette is used first; beyond it, hues are spread evenly.
pub fn color_palette(count: usize) -> Vec<String> {
    if count <= BASE_COLORS.len() {
        return BASE_COLORS[..count].iter().map(|c| c.to_string()).collect();
    }

    let extra = count - BASE_COLORS.len();
    let step = 360.0 / extra as f64;
    BASE_COLORS
        .iter()
        .map(|c| c.to_string())
        .chain((0..extra).map(|i| format!("hsl({}, 45%, 60%)", i as f64 * step)))
        .collect()
}

/// Pair each label with a colour by position.
pub fn label_color_map(labels: &[String]) -> Vec<LabelColor> {
    labels
        .iter()
        .zip(color_palette(labels.len()))
        .map(|(label, color)| LabelColor {
            label: label.clone(),
            color,
        })
        .collect()
}
