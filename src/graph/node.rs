//! Node records ingested from the wiki export

use crate::alignment::AlignmentResult;
use serde::{Deserialize, Serialize};

/// A wiki document treated as a graph entity.
///
/// `alignment` is absent on input and populated by the pipeline: a full
/// record for classified or propagated nodes, `null` for nodes that are
/// ineligible or unreachable from any classified seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "collectionId", default)]
    pub collection_id: String,
    #[serde(default)]
    pub alignment: Option<AlignmentResult>,
}

impl Node {
    /// Create a node with empty content and no collection.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            collection_id: String::new(),
            alignment: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_collection(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = collection_id.into();
        self
    }
}
