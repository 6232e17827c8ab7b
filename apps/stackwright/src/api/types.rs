//! # API Request/Response Types
//!
//! JSON envelopes of the HTTP API. Graph payloads reuse the core types and
//! keep their camelCase wire shape.

use serde::{Deserialize, Serialize};
use stackwright_core::{
    EdgeChange, EdgeId, NodeChange, NodeId, Position, Selection, StackEditor, StackError, StackId,
    TechEdge, TechNode, Template,
};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl From<&StackError> for ErrorResponse {
    fn from(e: &StackError) -> Self {
        Self::new(e.to_string())
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// Full state of the live editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorResponse {
    pub id: StackId,
    pub name: String,
    pub nodes: Vec<TechNode>,
    pub edges: Vec<TechEdge>,
    pub selection: Selection,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Edges dropped because an endpoint was missing (load only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_edges: Vec<EdgeId>,
}

impl EditorResponse {
    pub fn from_editor(editor: &StackEditor) -> Self {
        Self {
            id: editor.id().clone(),
            name: editor.name().to_string(),
            nodes: editor.nodes().to_vec(),
            edges: editor.edges().to_vec(),
            selection: editor.selection().clone(),
            can_undo: editor.can_undo(),
            can_redo: editor.can_redo(),
            dropped_edges: Vec::new(),
        }
    }

    pub fn with_dropped(mut self, dropped: Vec<TechEdge>) -> Self {
        self.dropped_edges = dropped.into_iter().map(|e| e.id).collect();
        self
    }
}

/// Result of an undo or redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStepResponse {
    /// False when there was nothing to undo or redo.
    pub applied: bool,
    pub editor: EditorResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeChangesRequest {
    pub changes: Vec<NodeChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeChangesRequest {
    pub changes: Vec<EdgeChange>,
}

/// Drop a catalog technology on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTechnologyRequest {
    pub name: String,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTechnologyResponse {
    pub node_id: NodeId,
    pub editor: EditorResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub edge_id: EdgeId,
    pub editor: EditorResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

// =============================================================================
// TEMPLATES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub node_count: usize,
    pub edge_count: usize,
}

impl From<&Template> for TemplateSummary {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.to_string(),
            description: t.description.to_string(),
            node_count: t.node_count(),
            edge_count: t.edge_count(),
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Graph submitted for validation.
///
/// With `editor` set, the posted graph is ignored and the live editor graph
/// is validated instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub nodes: Vec<TechNode>,
    #[serde(default)]
    pub edges: Vec<TechEdge>,
    #[serde(default)]
    pub editor: bool,
}

// =============================================================================
// SAVED STACKS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStackResponse {
    pub success: bool,
    pub id: StackId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStackResponse {
    pub success: bool,
}
