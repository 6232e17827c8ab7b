//! # Change Descriptors
//!
//! Closed sets of structural deltas the canvas can send in one batch.
//!
//! Every variant is handled exhaustively and a change that references a
//! missing element fails the whole batch with a typed error. Nothing is
//! silently dropped.

use crate::primitives::{MAX_STACK_EDGES, MAX_STACK_NODES};
use crate::types::{EdgeId, NodeId, Position, Snapshot, StackError, TechEdge, TechNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A delta applied to the node collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    Add { node: TechNode },
    Remove { id: NodeId },
    Move { id: NodeId, position: Position },
    Select { id: NodeId, selected: bool },
}

/// A delta applied to the edge collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    Add { edge: TechEdge },
    Remove { id: EdgeId },
    Select { id: EdgeId, selected: bool },
}

/// Selected elements. View state only, never part of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub nodes: BTreeSet<NodeId>,
    pub edges: BTreeSet<EdgeId>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Drop selected ids that no longer exist in `snapshot`.
    pub fn retain_existing(&mut self, snapshot: &Snapshot) {
        self.nodes
            .retain(|id| snapshot.nodes.iter().any(|n| &n.id == id));
        self.edges
            .retain(|id| snapshot.edges.iter().any(|e| &e.id == id));
    }
}

/// Outcome of applying a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Whether nodes or edges changed (selection does not count).
    pub structural: bool,
}

// =============================================================================
// NODE CHANGES
// =============================================================================

/// Apply node changes in order. On error `snapshot` and `selection` may be
/// partially modified; callers apply batches to a scratch copy.
pub(crate) fn apply_node_changes(
    snapshot: &mut Snapshot,
    selection: &mut Selection,
    changes: &[NodeChange],
) -> Result<BatchOutcome, StackError> {
    let mut outcome = BatchOutcome::default();

    for change in changes {
        match change {
            NodeChange::Add { node } => {
                if snapshot.nodes.iter().any(|n| n.id == node.id) {
                    return Err(StackError::DuplicateNode(node.id.clone()));
                }
                if snapshot.nodes.len() >= MAX_STACK_NODES {
                    return Err(StackError::LimitExceeded(format!(
                        "stack already has the maximum of {} nodes",
                        MAX_STACK_NODES
                    )));
                }
                snapshot.nodes.push(node.clone());
                outcome.structural = true;
            }
            NodeChange::Remove { id } => {
                let index = node_index(snapshot, id)?;
                snapshot.nodes.remove(index);
                // Incident edges go with the node; no dangling edges survive.
                let removed: Vec<EdgeId> = snapshot
                    .edges
                    .iter()
                    .filter(|e| e.touches(id))
                    .map(|e| e.id.clone())
                    .collect();
                snapshot.edges.retain(|e| !e.touches(id));
                selection.nodes.remove(id);
                for edge_id in &removed {
                    selection.edges.remove(edge_id);
                }
                outcome.structural = true;
            }
            NodeChange::Move { id, position } => {
                let index = node_index(snapshot, id)?;
                snapshot.nodes[index].position = *position;
                outcome.structural = true;
            }
            NodeChange::Select { id, selected } => {
                node_index(snapshot, id)?;
                if *selected {
                    selection.nodes.insert(id.clone());
                } else {
                    selection.nodes.remove(id);
                }
            }
        }
    }

    Ok(outcome)
}

fn node_index(snapshot: &Snapshot, id: &NodeId) -> Result<usize, StackError> {
    snapshot
        .nodes
        .iter()
        .position(|n| &n.id == id)
        .ok_or_else(|| StackError::NodeNotFound(id.clone()))
}

// =============================================================================
// EDGE CHANGES
// =============================================================================

/// Apply edge changes in order. Same partial-modification caveat as
/// [`apply_node_changes`].
pub(crate) fn apply_edge_changes(
    snapshot: &mut Snapshot,
    selection: &mut Selection,
    changes: &[EdgeChange],
) -> Result<BatchOutcome, StackError> {
    let mut outcome = BatchOutcome::default();

    for change in changes {
        match change {
            EdgeChange::Add { edge } => {
                check_new_edge(snapshot, edge)?;
                snapshot.edges.push(edge.clone());
                outcome.structural = true;
            }
            EdgeChange::Remove { id } => {
                let index = edge_index(snapshot, id)?;
                snapshot.edges.remove(index);
                selection.edges.remove(id);
                outcome.structural = true;
            }
            EdgeChange::Select { id, selected } => {
                edge_index(snapshot, id)?;
                if *selected {
                    selection.edges.insert(id.clone());
                } else {
                    selection.edges.remove(id);
                }
            }
        }
    }

    Ok(outcome)
}

/// Check that `edge` may be added to `snapshot`.
pub(crate) fn check_new_edge(snapshot: &Snapshot, edge: &TechEdge) -> Result<(), StackError> {
    if edge.source == edge.target {
        return Err(StackError::SelfLoop(edge.source.clone()));
    }
    for endpoint in [&edge.source, &edge.target] {
        if !snapshot.nodes.iter().any(|n| &n.id == endpoint) {
            return Err(StackError::NodeNotFound(endpoint.clone()));
        }
    }
    if snapshot.edges.iter().any(|e| e.id == edge.id) {
        return Err(StackError::DuplicateEdge(edge.id.clone()));
    }
    if snapshot
        .edges
        .iter()
        .any(|e| e.source == edge.source && e.target == edge.target)
    {
        return Err(StackError::DuplicateConnection(
            edge.source.clone(),
            edge.target.clone(),
        ));
    }
    if snapshot.edges.len() >= MAX_STACK_EDGES {
        return Err(StackError::LimitExceeded(format!(
            "stack already has the maximum of {} edges",
            MAX_STACK_EDGES
        )));
    }
    Ok(())
}

fn edge_index(snapshot: &Snapshot, id: &EdgeId) -> Result<usize, StackError> {
    snapshot
        .edges
        .iter()
        .position(|e| &e.id == id)
        .ok_or_else(|| StackError::EdgeNotFound(id.clone()))
}

// =============================================================================
// TESTS
// =============================================================================
