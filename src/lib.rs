//! Compass: Behavioral Alignment Engine
//!
//! Assigns every entity in a knowledge graph a two-axis alignment score
//! (law↔chaos, good↔evil) from three evidence sources: explicit textual
//! assertions, model-inferred semantics of recorded actions toward other
//! entities, and propagation from connected entities when no direct
//! evidence exists.
//!
//! # Core Concepts
//!
//! - **Stated alignment**: the ceiling. An entity never appears more
//!   virtuous than it claims to be.
//! - **Behavioral alignment**: the stated score shifted by the weighted
//!   average of the entity's recorded actions.
//! - **Propagation**: nodes without direct evidence inherit a low-trust
//!   average from their classified neighbors.
//!
//! # Example
//!
//! ```
//! use compass::{AlignmentPipeline, Edge, Graph, Node, PipelineConfig};
//! use std::collections::HashMap;
//!
//! # tokio_test::block_on(async {
//! let nodes = vec![
//!     Node::new("paladin", "Ser Aldric")
//!         .with_content("He is a lawful good paladin.")
//!         .with_collection("characters"),
//!     Node::new("squire", "Wren").with_collection("characters"),
//! ];
//! let links = vec![Edge::new("paladin", "squire")];
//! let mut graph = Graph::new(nodes, links);
//!
//! let collections = HashMap::from([("characters".to_string(), "characters".to_string())]);
//! let config = PipelineConfig::new(collections, std::env::temp_dir().join("compass_cache.json"));
//! let report = AlignmentPipeline::new(config).run(&mut graph).await;
//!
//! assert_eq!(report.explicit, 1);
//! assert_eq!(report.propagated, 1);
//! # });
//! ```

pub mod alignment;
pub mod cache;
pub mod classify;
pub mod graph;
pub mod model;
pub mod pipeline;

pub use alignment::{
    AlignmentResult, AlignmentSource, AxisPair, RelationshipEvidence, StatedAlignment,
};
pub use cache::{AlignmentCache, CacheError};
pub use classify::Classifier;
pub use graph::{ClassifiedRelationship, Edge, Graph, Node};
pub use model::{AlignmentModel, EntityJudgment, MockModel, ModelError, RelationshipJudgment};
pub use pipeline::{AlignmentPipeline, PipelineConfig, PipelineReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
