//! The deterministic alignment core
//!
//! Everything in this module is pure computation: stated-alignment
//! extraction, link-context extraction, behavioral aggregation with the
//! ceiling constraint and drift, and label propagation. External model
//! calls and caching live in [`crate::model`] and [`crate::classify`].

mod behavioral;
mod context;
mod propagation;
mod stated;
mod types;

pub use behavioral::{apply_ceiling, behavioral_alignment, drift, ScoredAction};
pub use context::link_context;
pub use propagation::{propagate, PropagationOutcome};
pub use stated::extract_stated;
pub use types::{AlignmentResult, AlignmentSource, AxisPair, RelationshipEvidence, StatedAlignment};

pub(crate) use types::{clamp_axis, clamp_unit};
