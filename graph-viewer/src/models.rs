//! Transport records for graph query results.
//!
//! These are the only shapes handed to the rendering page. They hold plain
//! JSON values so they serialize without knowledge of the database driver.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Property name to value mapping, emitted with keys in sorted order.
pub type Properties = BTreeMap<String, Value>;

/// A node as returned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub identity: String,
    pub labels: Vec<String>,
    pub properties: Properties,
}

/// A directed relationship. `start` and `end` are node identities, not owned nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub identity: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub properties: Properties,
}

/// Nodes and relationships produced by one query execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResult {
    pub nodes: Vec<NodeRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

impl GraphResult {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_identities(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.identity.as_str()).collect()
    }

    pub fn relationship_identities(&self) -> HashSet<&str> {
        self.relationships
            .iter()
            .map(|r| r.identity.as_str())
            .collect()
    }

    /// Relationships whose start or end node is not part of this result.
    ///
    /// Queries that follow `MATCH (n)-[r]->(m) RETURN n, r, m` never produce
    /// any; other query shapes can.
    pub fn dangling_relationships(&self) -> Vec<&RelationshipRecord> {
        let nodes = self.node_identities();
        self.relationships
            .iter()
            .filter(|r| !nodes.contains(r.start.as_str()) || !nodes.contains(r.end.as_str()))
            .collect()
    }
}

/// Accumulates graph values seen while streaming query rows.
///
/// Nodes and relationships are deduplicated by identity. The first occurrence
/// wins and first-seen order is kept.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: GraphResult,
    seen_nodes: HashSet<String>,
    seen_relationships: HashSet<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a node with the same identity was already added.
    pub fn add_node(&mut self, node: NodeRecord) -> bool {
        if !self.seen_nodes.insert(node.identity.clone()) {
            return false;
        }
        self.graph.nodes.push(node);
        true
    }

    /// Returns `false` if a relationship with the same identity was already added.
    pub fn add_relationship(&mut self, relationship: RelationshipRecord) -> bool {
        if !self.seen_relationships.insert(relationship.identity.clone()) {
            return false;
        }
        self.graph.relationships.push(relationship);
        true
    }

    pub fn build(self) -> GraphResult {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, label: &str) -> NodeRecord {
        NodeRecord {
            identity: id.to_string(),
            labels: vec![label.to_string()],
            properties: Properties::new(),
        }
    }

    fn rel(id: &str, start: &str, end: &str) -> RelationshipRecord {
        RelationshipRecord {
            identity: id.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            rel_type: "KNOWS".to_string(),
            properties: Properties::new(),
        }
    }

    #[test]
    fn test_builder_keeps_first_seen_order_and_dedups() {
        let mut builder = GraphBuilder::new();
        assert!(builder.add_node(node("2", "Person")));
        assert!(builder.add_node(node("1", "Person")));
        assert!(!builder.add_node(node("2", "Other")));
        assert!(builder.add_relationship(rel("10", "2", "1")));
        assert!(!builder.add_relationship(rel("10", "2", "1")));

        let graph = builder.build();
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.identity.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(graph.nodes[0].labels, vec!["Person".to_string()]);
        assert_eq!(graph.relationships.len(), 1);
    }

    #[test]
    fn test_relationship_serializes_type_field() {
        let mut r = rel("10", "1", "2");
        r.properties.insert("since".to_string(), json!(2020));

        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(
            value,
            json!({
                "identity": "10",
                "start": "1",
                "end": "2",
                "type": "KNOWS",
                "properties": { "since": 2020 }
            })
        );
    }

    #[test]
    fn test_dangling_relationships() {
        let graph = GraphResult {
            nodes: vec![node("1", "A"), node("2", "A")],
            relationships: vec![rel("10", "1", "2"), rel("11", "2", "3")],
        };

        let dangling = graph.dangling_relationships();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].identity, "11");
    }

    #[test]
    fn test_empty_graph() {
        let graph = GraphResult::default();
        assert!(graph.is_empty());
        assert_eq!(
            serde_json::to_value(&graph).unwrap(),
            json!({ "nodes": [], "relationships": [] })
        );
    }
}
