//! Graph document model
//!
//! The input/output contract with the surrounding tooling: a list of
//! nodes and the links between them, as exported from the wiki.

mod edge;
mod node;

#[cfg(test)]
mod tests;

pub use edge::{ClassifiedRelationship, Edge};
pub use node::Node;

use serde::{Deserialize, Serialize};

/// A full export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    #[serde(alias = "edges")]
    pub links: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, links: Vec<Edge>) -> Self {
        Self { nodes, links }
    }
}
