use super::*;

#[test]
fn bare_string_endpoints_deserialize() {
    let edge: Edge = serde_json::from_str(r#"{"source": "a", "target": "b"}"#).unwrap();
    assert_eq!(edge.source, "a");
    assert_eq!(edge.target, "b");
    assert!(edge.relationship.is_none());
}

#[test]
fn object_endpoints_normalize_to_ids() {
    let raw = r#"{
        "source": {"id": "a", "title": "Alpha", "index": 3},
        "target": {"id": "b"}
    }"#;
    let edge: Edge = serde_json::from_str(raw).unwrap();
    assert_eq!(edge.source, "a");
    assert_eq!(edge.target, "b");
}

#[test]
fn mixed_endpoint_forms_are_accepted() {
    let raw = r#"{"source": "a", "target": {"id": "b", "extra": true}}"#;
    let edge: Edge = serde_json::from_str(raw).unwrap();
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("a", "b"));
}

#[test]
fn graph_accepts_edges_as_alias_for_links() {
    let raw = r#"{"nodes": [], "edges": [{"source": "a", "target": "b"}]}"#;
    let graph: Graph = serde_json::from_str(raw).unwrap();
    assert_eq!(graph.links.len(), 1);
}

#[test]
fn node_defaults_tolerate_sparse_input() {
    let node: Node = serde_json::from_str(r#"{"id": "a", "title": "Alpha"}"#).unwrap();
    assert_eq!(node.content, "");
    assert_eq!(node.collection_id, "");
    assert!(node.alignment.is_none());
}

#[test]
fn unannotated_node_serializes_null_alignment() {
    let node = Node::new("a", "Alpha");
    let json = serde_json::to_value(&node).unwrap();
    assert!(json["alignment"].is_null());
    assert_eq!(json["collectionId"], "");
}

#[test]
fn classified_relationship_flattens_evidence() {
    use crate::alignment::RelationshipEvidence;

    let mut edge = Edge::new("a", "b");
    edge.relationship = Some(ClassifiedRelationship {
        evidence: RelationshipEvidence {
            kind: "killed".to_string(),
            moral_valence: -1.0,
            order_valence: 0.0,
            summary: "slew the wyrm".to_string(),
        },
        source_id: "a".to_string(),
        target_id: "b".to_string(),
    });

    let json = serde_json::to_value(&edge).unwrap();
    assert_eq!(json["relationship"]["type"], "killed");
    assert_eq!(json["relationship"]["moral_valence"], -1.0);
    assert_eq!(json["relationship"]["source_id"], "a");
    assert_eq!(json["relationship"]["target_id"], "b");
}
