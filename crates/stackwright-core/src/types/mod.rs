//! # Core Type Definitions
//!
//! This module contains the data model of the stack editor:
//! - Identifiers (`NodeId`, `EdgeId`, `StackId`)
//! - Graph elements (`TechNode`, `TechEdge`, `Position`, `NodeData`)
//! - Aggregates (`Stack`, `Snapshot`)
//! - Error types (`StackError`)
//!
//! ## Wire Format
//!
//! Field names follow the JSON shape used by the browser canvas:
//! camelCase keys, the node category serialized as `type`, and ISO-8601
//! timestamps on stacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identifier of a node on the canvas.
    NodeId
);
string_id!(
    /// Unique identifier of a connection between two nodes.
    EdgeId
);
string_id!(
    /// Unique identifier of a saved stack.
    StackId
);

impl StackId {
    /// Generate a fresh random stack identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

// =============================================================================
// NODE
// =============================================================================

/// Category of a technology node.
///
/// Unknown categories coming from a remote catalog deserialize as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechCategory {
    Frontend,
    Backend,
    Database,
    Devops,
    Cloud,
    Mobile,
    Testing,
    Security,
    #[serde(other)]
    Other,
}

impl TechCategory {
    /// Lowercase name used in generated ids and on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TechCategory::Frontend => "frontend",
            TechCategory::Backend => "backend",
            TechCategory::Database => "database",
            TechCategory::Devops => "devops",
            TechCategory::Cloud => "cloud",
            TechCategory::Mobile => "mobile",
            TechCategory::Testing => "testing",
            TechCategory::Security => "security",
            TechCategory::Other => "other",
        }
    }
}

impl fmt::Display for TechCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas position in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Display payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    /// Display name, also the key into the compatibility table.
    pub name: String,
    /// Icon reference (URL or catalog slug).
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl NodeData {
    #[must_use]
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            description: None,
            version: None,
        }
    }
}

/// One technology placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: TechCategory,
    pub position: Position,
    pub data: NodeData,
}

impl TechNode {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: TechCategory,
        name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: NodeId::new(id),
            kind,
            position,
            data: NodeData::new(name, ""),
        }
    }

    /// The technology name of this node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// A directed connection asserting two technologies are used together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl TechEdge {
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: EdgeId::new(id),
            source: NodeId::new(source),
            target: NodeId::new(target),
        }
    }

    /// Whether the edge touches the given node.
    #[must_use]
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// A user-drawn connection request, before an edge id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
}

impl Connection {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: NodeId::new(source),
            target: NodeId::new(target),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Full copy of `{nodes, edges}` at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<TechNode>,
    pub edges: Vec<TechEdge>,
}

impl Snapshot {
    #[must_use]
    pub fn new(nodes: Vec<TechNode>, edges: Vec<TechEdge>) -> Self {
        Self { nodes, edges }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Drop edges whose endpoints are not present. Returns the dropped edges.
    pub fn prune_dangling_edges(&mut self) -> Vec<TechEdge> {
        let ids: BTreeSet<&NodeId> = self.nodes.iter().map(|n| &n.id).collect();
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| ids.contains(&e.source) && ids.contains(&e.target));
        self.edges = kept;
        dropped
    }

    /// Check that every edge references existing nodes and ids are unique.
    pub fn check_integrity(&self) -> Result<(), StackError> {
        let mut node_ids = BTreeSet::new();
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(StackError::DuplicateNode(node.id.clone()));
            }
        }
        let mut edge_ids = BTreeSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(StackError::DuplicateEdge(edge.id.clone()));
            }
            if !node_ids.contains(&edge.source) || !node_ids.contains(&edge.target) {
                return Err(StackError::DanglingEdge(edge.id.clone()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// STACK
// =============================================================================

/// A named, timestamped arrangement of technology nodes and connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: StackId,
    pub name: String,
    pub nodes: Vec<TechNode>,
    pub edges: Vec<TechEdge>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stack {
    /// Create an empty stack with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: StackId::generate(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy the node/edge content of this stack.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.nodes.clone(), self.edges.clone())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Stackwright.
///
/// Validation never errors; these cover malformed edits, imports and storage.
#[derive(Debug, Error)]
pub enum StackError {
    /// A change referenced a node that is not on the canvas.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// A change referenced an edge that is not on the canvas.
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A node with this id already exists.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// An edge with this id already exists.
    #[error("Duplicate edge id: {0}")]
    DuplicateEdge(EdgeId),

    /// The two nodes are already connected in this direction.
    #[error("Nodes already connected: {0} -> {1}")]
    DuplicateConnection(NodeId, NodeId),

    /// An edge may not connect a node to itself.
    #[error("Self-connection rejected for node {0}")]
    SelfLoop(NodeId),

    /// An edge references a node that does not exist.
    #[error("Edge {0} references a missing node")]
    DanglingEdge(EdgeId),

    /// A size limit on nodes, edges or input was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// No template is registered under this id.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// No saved stack has this id.
    #[error("Stack not found: {0}")]
    StackNotFound(StackId),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O or storage error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A configuration value is missing or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str) -> TechNode {
        TechNode::new(id, TechCategory::Other, name, Position::default())
    }

    #[test]
    fn node_serializes_category_as_type() {
        let n = TechNode::new("frontend-1", TechCategory::Frontend, "React", Position::new(10, 20));
        let json = serde_json::to_value(&n).expect("serialize");
        assert_eq!(json["type"], "frontend");
        assert_eq!(json["data"]["name"], "React");
        assert_eq!(json["position"]["x"], 10);
    }

    #[test]
    fn unknown_category_becomes_other() {
        let kind: TechCategory = serde_json::from_str("\"blockchain\"").expect("parse");
        assert_eq!(kind, TechCategory::Other);
    }

    #[test]
    fn stack_uses_camel_case_timestamps() {
        let stack = Stack::new("demo", Utc::now());
        let json = serde_json::to_value(&stack).expect("serialize");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn prune_dangling_edges_keeps_valid_ones() {
        let mut snap = Snapshot::new(
            vec![node("a", "A"), node("b", "B")],
            vec![TechEdge::new("e1", "a", "b"), TechEdge::new("e2", "a", "zzz")],
        );
        let dropped = snap.prune_dangling_edges();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, EdgeId::from("e2"));
        assert_eq!(snap.edges.len(), 1);
    }

    #[test]
    fn integrity_detects_duplicates_and_dangling() {
        let dup = Snapshot::new(vec![node("a", "A"), node("a", "B")], vec![]);
        assert!(matches!(dup.check_integrity(), Err(StackError::DuplicateNode(_))));

        let dangling = Snapshot::new(vec![node("a", "A")], vec![TechEdge::new("e", "a", "b")]);
        assert!(matches!(
            dangling.check_integrity(),
            Err(StackError::DanglingEdge(_))
        ));

        let ok = Snapshot::new(
            vec![node("a", "A"), node("b", "B")],
            vec![TechEdge::new("e", "a", "b")],
        );
        assert!(ok.check_integrity().is_ok());
    }
}
