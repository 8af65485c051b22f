// Bolt value conversion into transport records
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use neo4rs::{BoltMap, BoltNode, BoltPath, BoltRelation, BoltType, Row};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

use crate::errors::GraphQueryError;
use crate::models::{GraphBuilder, NodeRecord, Properties, RelationshipRecord};

/// Collect every node and relationship found in a result row.
///
/// Columns are visited in name order.
pub fn collect_row(row: &Row, builder: &mut GraphBuilder) -> Result<(), GraphQueryError> {
    let columns: BTreeMap<String, BoltType> = row
        .to()
        .map_err(|e| GraphQueryError::query(format!("Failed to decode result row: {}", e)))?;

    for value in columns.values() {
        collect_value(value, builder);
    }
    Ok(())
}

/// Walk a single value and add any graph entities it contains.
///
/// Lists and maps are searched recursively. Paths contribute their nodes and
/// their relationships with endpoints resolved from the path's index sequence.
pub fn collect_value(value: &BoltType, builder: &mut GraphBuilder) {
    match value {
        BoltType::Node(node) => {
            builder.add_node(node_record(node));
        }
        BoltType::Relation(rel) => {
            builder.add_relationship(relationship_record(rel));
        }
        BoltType::Path(path) => collect_path(path, builder),
        BoltType::List(list) => {
            for item in &list.value {
                collect_value(item, builder);
            }
        }
        BoltType::Map(map) => {
            for key in sorted_keys(map) {
                if let Some(item) = map.value.get(key) {
                    collect_value(item, builder);
                }
            }
        }
        _ => {}
    }
}

pub fn node_record(node: &BoltNode) -> NodeRecord {
    NodeRecord {
        identity: node.id.value.to_string(),
        labels: node
            .labels
            .value
            .iter()
            .filter_map(|label| match label {
                BoltType::String(s) => Some(s.value.clone()),
                _ => None,
            })
            .collect(),
        properties: properties_to_json(&node.properties),
    }
}

pub fn relationship_record(rel: &BoltRelation) -> RelationshipRecord {
    RelationshipRecord {
        identity: rel.id.value.to_string(),
        start: rel.start_node_id.value.to_string(),
        end: rel.end_node_id.value.to_string(),
        rel_type: rel.typ.value.clone(),
        properties: properties_to_json(&rel.properties),
    }
}

fn collect_path(path: &BoltPath, builder: &mut GraphBuilder) {
    let nodes: Vec<&BoltNode> = path
        .nodes
        .value
        .iter()
        .filter_map(|n| match n {
            BoltType::Node(node) => Some(node),
            _ => None,
        })
        .collect();

    for node in &nodes {
        builder.add_node(node_record(node));
    }

    let Some(mut previous) = nodes.first().copied() else {
        return;
    };

    let indices: Vec<i64> = path
        .indices
        .value
        .iter()
        .filter_map(|i| match i {
            BoltType::Integer(i) => Some(i.value),
            _ => None,
        })
        .collect();

    // Indices alternate (relationship, node). A positive relationship index is
    // 1-based and traversed forwards; a negative one is traversed backwards.
    for pair in indices.chunks_exact(2) {
        let (rel_index, node_index) = (pair[0], pair[1]);
        let Some(next) = usize::try_from(node_index).ok().and_then(|i| nodes.get(i).copied()) else {
            return;
        };
        let slot = usize::try_from(rel_index.unsigned_abs()).unwrap_or(0);
        let Some(BoltType::UnboundedRelation(rel)) = slot.checked_sub(1).and_then(|i| path.rels.value.get(i)) else {
            return;
        };

        let (start, end) = if rel_index > 0 {
            (previous, next)
        } else {
            (next, previous)
        };

        builder.add_relationship(RelationshipRecord {
            identity: rel.id.value.to_string(),
            start: start.id.value.to_string(),
            end: end.id.value.to_string(),
            rel_type: rel.typ.value.clone(),
            properties: properties_to_json(&rel.properties),
        });
        previous = next;
    }
}

fn sorted_keys(map: &BoltMap) -> Vec<&neo4rs::BoltString> {
    let mut keys: Vec<_> = map.value.keys().collect();
    keys.sort_by(|a, b| a.value.cmp(&b.value));
    keys
}

/// Convert a property map into JSON values.
///
/// Temporal values are rendered as ISO-8601 text.
pub fn properties_to_json(properties: &BoltMap) -> Properties {
    properties
        .value
        .iter()
        .map(|(key, value)| {
            let json = temporal_to_json(properties, &key.value, value)
                .unwrap_or_else(|| bolt_to_json(value));
            (key.value.clone(), json)
        })
        .collect()
}

fn temporal_to_json(properties: &BoltMap, key: &str, value: &BoltType) -> Option<Value> {
    let text = match value {
        BoltType::Date(_) => properties.get::<NaiveDate>(key).ok()?.to_string(),
        BoltType::LocalTime(_) => properties.get::<NaiveTime>(key).ok()?.to_string(),
        BoltType::LocalDateTime(_) => properties.get::<NaiveDateTime>(key).ok()?.to_string(),
        BoltType::DateTime(_) => properties.get::<DateTime<FixedOffset>>(key).ok()?.to_rfc3339(),
        _ => return None,
    };
    Some(Value::String(text))
}

/// Convert a Bolt value into plain JSON.
///
/// Values without a JSON counterpart are rendered as their debug text.
pub fn bolt_to_json(value: &BoltType) -> Value {
    match value {
        BoltType::Null(_) => Value::Null,
        BoltType::Boolean(b) => Value::Bool(b.value),
        BoltType::Integer(i) => Value::Number(i.value.into()),
        BoltType::Float(f) => Number::from_f64(f.value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.value.to_string())),
        BoltType::String(s) => Value::String(s.value.clone()),
        BoltType::List(list) => Value::Array(list.value.iter().map(bolt_to_json).collect()),
        BoltType::Map(map) => Value::Object(
            map.value
                .iter()
                .map(|(k, v)| (k.value.clone(), bolt_to_json(v)))
                .collect(),
        ),
        BoltType::Bytes(bytes) => {
            Value::Array(bytes.value.iter().map(|b| Value::from(*b)).collect())
        }
        other => Value::String(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo4rs::{BoltInteger, BoltList, BoltString, BoltUnboundedRelation};
    use serde_json::json;

    fn props(entries: Vec<(&str, BoltType)>) -> BoltMap {
        entries
            .into_iter()
            .map(|(k, v)| (BoltString::from(k), v))
            .collect()
    }

    fn bolt_node(id: i64, label: &str, name: &str) -> BoltNode {
        BoltNode {
            id: BoltInteger::new(id),
            labels: BoltList::from(vec![BoltType::from(label)]),
            properties: props(vec![("name", BoltType::from(name))]),
        }
    }

    fn bolt_rel(id: i64, start: i64, end: i64, typ: &str) -> BoltRelation {
        BoltRelation {
            id: BoltInteger::new(id),
            start_node_id: BoltInteger::new(start),
            end_node_id: BoltInteger::new(end),
            typ: BoltString::from(typ),
            properties: BoltMap::new(),
        }
    }

    fn node_ids(graph: &crate::models::GraphResult) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.identity.as_str()).collect()
    }

    fn rel_ids(graph: &crate::models::GraphResult) -> Vec<&str> {
        graph.relationships.iter().map(|r| r.identity.as_str()).collect()
    }

    fn nrm_row(n: BoltNode, r: BoltRelation, m: BoltNode) -> Row {
        Row::new(
            BoltList::from(vec![
                BoltType::from("n"),
                BoltType::from("r"),
                BoltType::from("m"),
            ]),
            BoltList::from(vec![
                BoltType::Node(n),
                BoltType::Relation(r),
                BoltType::Node(m),
            ]),
        )
    }

    #[test]
    fn test_collect_rows_of_nodes_and_relationships() {
        let rows = vec![
            nrm_row(
                bolt_node(1, "Person", "Ada"),
                bolt_rel(10, 1, 2, "KNOWS"),
                bolt_node(2, "Person", "Grace"),
            ),
            nrm_row(
                bolt_node(2, "Person", "Grace"),
                bolt_rel(11, 2, 3, "WORKS_AT"),
                bolt_node(3, "Company", "Acme"),
            ),
        ];

        let mut builder = GraphBuilder::new();
        for row in &rows {
            collect_row(row, &mut builder).unwrap();
        }
        let graph = builder.build();

        // Columns are read as m, n, r.
        assert_eq!(node_ids(&graph), vec!["2", "1", "3"]);
        assert_eq!(rel_ids(&graph), vec!["10", "11"]);
        assert!(graph.dangling_relationships().is_empty());

        let first = &graph.relationships[0];
        assert_eq!(first.start, "1");
        assert_eq!(first.end, "2");
        assert_eq!(first.rel_type, "KNOWS");
        assert_eq!(graph.nodes[2].labels, vec!["Company"]);
        assert_eq!(graph.nodes[2].properties["name"], json!("Acme"));
    }

    #[test]
    fn test_node_repeated_across_rows_is_kept_once() {
        let rows = vec![
            nrm_row(
                bolt_node(1, "Person", "Ada"),
                bolt_rel(10, 1, 2, "KNOWS"),
                bolt_node(2, "Person", "Grace"),
            ),
            nrm_row(
                bolt_node(1, "Person", "Ada"),
                bolt_rel(12, 1, 3, "KNOWS"),
                bolt_node(3, "Person", "Linus"),
            ),
        ];

        let mut builder = GraphBuilder::new();
        for row in &rows {
            collect_row(row, &mut builder).unwrap();
        }
        let graph = builder.build();

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes.iter().filter(|n| n.identity == "1").count(), 1);
        assert_eq!(rel_ids(&graph), vec!["10", "12"]);
    }

    #[test]
    fn test_path_with_reversed_relationship() {
        // (1)<-[10]-(2)
        let path = BoltPath {
            nodes: BoltList::from(vec![
                BoltType::Node(bolt_node(1, "Person", "Ada")),
                BoltType::Node(bolt_node(2, "Person", "Grace")),
            ]),
            rels: BoltList::from(vec![BoltType::UnboundedRelation(BoltUnboundedRelation {
                id: BoltInteger::new(10),
                typ: BoltString::from("KNOWS"),
                properties: props(vec![("since", BoltType::from(2020i64))]),
            })]),
            indices: BoltList::from(vec![BoltType::from(-1i64), BoltType::from(1i64)]),
        };

        let mut builder = GraphBuilder::new();
        collect_value(&BoltType::Path(path), &mut builder);
        let graph = builder.build();

        assert_eq!(node_ids(&graph), vec!["1", "2"]);
        assert_eq!(graph.relationships.len(), 1);
        let rel = &graph.relationships[0];
        assert_eq!(rel.identity, "10");
        assert_eq!(rel.start, "2");
        assert_eq!(rel.end, "1");
        assert_eq!(rel.properties["since"], json!(2020));
    }

    #[test]
    fn test_date_property_is_iso_text() {
        let node = BoltNode {
            id: BoltInteger::new(7),
            labels: BoltList::from(vec![BoltType::from("Person")]),
            properties: props(vec![
                ("born", BoltType::from(NaiveDate::from_ymd_opt(1990, 5, 1).unwrap())),
                ("name", BoltType::from("Ada")),
            ]),
        };

        let record = node_record(&node);
        assert_eq!(record.identity, "7");
        assert_eq!(record.properties["born"], json!("1990-05-01"));
        assert_eq!(record.properties["name"], json!("Ada"));
    }

    #[test]
    fn test_nodes_inside_collected_lists() {
        let people = BoltType::List(BoltList::from(vec![
            BoltType::Node(bolt_node(4, "Person", "Ada")),
            BoltType::Node(bolt_node(5, "Person", "Grace")),
        ]));

        let mut builder = GraphBuilder::new();
        collect_value(&people, &mut builder);
        assert_eq!(node_ids(&builder.build()), vec!["4", "5"]);
    }

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(bolt_to_json(&BoltType::from(42i64)), json!(42));
        assert_eq!(bolt_to_json(&BoltType::from(true)), json!(true));
        assert_eq!(bolt_to_json(&BoltType::from(1.5f64)), json!(1.5));
        assert_eq!(bolt_to_json(&BoltType::from("Alice")), json!("Alice"));
    }

    #[test]
    fn test_non_finite_float_becomes_text() {
        assert_eq!(bolt_to_json(&BoltType::from(f64::NAN)), json!("NaN"));
    }

    #[test]
    fn test_list_conversion() {
        let list = BoltType::from(vec![BoltType::from(1i64), BoltType::from("two")]);
        assert_eq!(bolt_to_json(&list), json!([1, "two"]));
    }

    #[test]
    fn test_scalars_contribute_no_graph_entities() {
        let mut builder = GraphBuilder::new();
        collect_value(&BoltType::from("not a node"), &mut builder);
        collect_value(
            &BoltType::from(vec![BoltType::from(1i64), BoltType::from(2i64)]),
            &mut builder,
        );
        assert!(builder.build().is_empty());
    }
}
