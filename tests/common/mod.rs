//! Shared helpers for pipeline integration tests

use compass::{Node, PipelineConfig};
use std::collections::HashMap;
use tempfile::TempDir;

/// Collection id used for classification-eligible test nodes.
pub const CHARACTERS: &str = "col-characters";
/// Collection id never listed in the eligibility map.
pub const SCENERY: &str = "col-scenery";

/// An eligible node with the given content.
pub fn character(id: &str, title: &str, content: &str) -> Node {
    Node::new(id, title)
        .with_content(content)
        .with_collection(CHARACTERS)
}

/// An ineligible node.
pub fn scenery(id: &str, title: &str, content: &str) -> Node {
    Node::new(id, title)
        .with_content(content)
        .with_collection(SCENERY)
}

/// Eligibility map listing only the characters collection.
pub fn collections() -> HashMap<String, String> {
    HashMap::from([("characters".to_string(), CHARACTERS.to_string())])
}

/// Pipeline config with a cache file inside the test's temp dir.
pub fn config(dir: &TempDir) -> PipelineConfig {
    PipelineConfig::new(collections(), dir.path().join("cache.json"))
}
