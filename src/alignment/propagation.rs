//! Label propagation for entities with no direct evidence
//!
//! Nodes still lacking an alignment after direct classification inherit
//! the confidence-weighted average of their neighbors' final scores.
//! Each round is computed from a read-only snapshot and merged at round
//! end, so results never depend on node iteration order within a round.

use super::types::{AlignmentResult, AlignmentSource, AxisPair};
use crate::graph::{Edge, Node};
use std::collections::HashMap;

/// Upper bound on propagation rounds; disconnected components with no
/// classified seed simply never converge, which is accepted.
const MAX_ROUNDS: usize = 10;
/// Fixed confidence for inherited alignments, intentionally low.
const PROPAGATED_CONFIDENCE: f64 = 0.3;

/// What a propagation run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationOutcome {
    /// Rounds executed before convergence or the round cap.
    pub rounds: usize,
    /// Nodes that received a propagated alignment.
    pub assigned: usize,
}

/// Fill unaligned nodes from their neighbors.
///
/// Builds an undirected adjacency map over the (already normalized) edge
/// endpoints, then runs up to [`MAX_ROUNDS`] rounds of neighbor
/// averaging, stopping early once a round assigns nothing new.
pub fn propagate(nodes: &mut [Node], edges: &[Edge]) -> PropagationOutcome {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        if edge.source.is_empty() || edge.target.is_empty() {
            continue;
        }
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        adjacency
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    // Snapshot of every node that already carries a usable final score.
    let mut known: HashMap<String, (AxisPair, f64)> = nodes
        .iter()
        .filter_map(|node| {
            node.alignment
                .as_ref()
                .map(|a| (node.id.clone(), (a.final_, a.confidence)))
        })
        .collect();

    let mut assigned: HashMap<String, AxisPair> = HashMap::new();
    let mut rounds = 0;

    while rounds < MAX_ROUNDS {
        rounds += 1;

        // Pure round: read the snapshot, collect fresh assignments.
        let mut fresh: Vec<(String, AxisPair)> = Vec::new();
        for node in nodes.iter() {
            if node.alignment.is_some() || known.contains_key(&node.id) {
                continue;
            }
            let Some(neighbors) = adjacency.get(node.id.as_str()) else {
                continue;
            };

            let mut law_sum = 0.0;
            let mut good_sum = 0.0;
            let mut weight_sum = 0.0;
            for neighbor_id in neighbors {
                if let Some((axes, confidence)) = known.get(*neighbor_id) {
                    law_sum += axes.law_chaos * confidence;
                    good_sum += axes.good_evil * confidence;
                    weight_sum += confidence;
                }
            }

            if weight_sum > 0.0 {
                fresh.push((
                    node.id.clone(),
                    AxisPair::new(law_sum / weight_sum, good_sum / weight_sum),
                ));
            }
        }

        if fresh.is_empty() {
            break;
        }

        // Merge at round end; fresh values become visible next round.
        for (id, axes) in fresh {
            known.insert(id.clone(), (axes, PROPAGATED_CONFIDENCE));
            assigned.insert(id, axes);
        }
    }

    for node in nodes.iter_mut() {
        if node.alignment.is_none() {
            if let Some(axes) = assigned.get(&node.id) {
                node.alignment = Some(AlignmentResult {
                    stated: None,
                    behavioral: *axes,
                    final_: *axes,
                    confidence: PROPAGATED_CONFIDENCE,
                    drift: 0.0,
                    source: AlignmentSource::Propagated,
                });
            }
        }
    }

    let outcome = PropagationOutcome {
        rounds,
        assigned: assigned.len(),
    };
    tracing::debug!(rounds = outcome.rounds, assigned = outcome.assigned, "propagation finished");
    outcome
}
