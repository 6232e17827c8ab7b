//! # Stack Editor
//!
//! The graph state store: owns the live node and edge collections and
//! records every structural mutation in the [`History`].
//!
//! Batches are applied to a scratch copy and committed only on success, so a
//! malformed change leaves the editor untouched.

use crate::catalog::Technology;
use crate::changes::{self, BatchOutcome, EdgeChange, NodeChange, Selection};
use crate::history::History;
use crate::primitives::{DEFAULT_HISTORY_DEPTH, MAX_NAME_LENGTH};
use crate::rules::{self, ValidationReport};
use crate::templates::Template;
use crate::types::{
    Connection, EdgeId, NodeData, NodeId, Position, Snapshot, Stack, StackError, StackId,
    TechEdge, TechNode,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Name given to stacks created from scratch.
pub const UNTITLED: &str = "Untitled Stack";

/// The live editing session of one stack.
#[derive(Debug, Clone)]
pub struct StackEditor {
    id: StackId,
    name: String,
    created_at: DateTime<Utc>,
    current: Arc<Snapshot>,
    selection: Selection,
    history: History,
}

impl Default for StackEditor {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH, Utc::now())
    }
}

impl StackEditor {
    /// Create an editor on an empty, untitled stack.
    #[must_use]
    pub fn new(history_depth: usize, now: DateTime<Utc>) -> Self {
        let history = History::new(history_depth);
        Self {
            id: StackId::generate(),
            name: UNTITLED.to_string(),
            created_at: now,
            current: history.current(),
            selection: Selection::default(),
            history,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> &StackId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn nodes(&self) -> &[TechNode] {
        &self.current.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[TechEdge] {
        &self.current.edges
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Apply a batch of node changes atomically.
    ///
    /// A batch that alters nodes or edges records exactly one history entry;
    /// a selection-only batch records none.
    pub fn apply_node_changes(&mut self, batch: &[NodeChange]) -> Result<BatchOutcome, StackError> {
        self.apply_batch(|snapshot, selection| {
            changes::apply_node_changes(snapshot, selection, batch)
        })
    }

    /// Apply a batch of edge changes atomically.
    pub fn apply_edge_changes(&mut self, batch: &[EdgeChange]) -> Result<BatchOutcome, StackError> {
        self.apply_batch(|snapshot, selection| {
            changes::apply_edge_changes(snapshot, selection, batch)
        })
    }

    fn apply_batch<F>(&mut self, apply: F) -> Result<BatchOutcome, StackError>
    where
        F: FnOnce(&mut Snapshot, &mut Selection) -> Result<BatchOutcome, StackError>,
    {
        let mut scratch = Snapshot::clone(&self.current);
        let mut selection = self.selection.clone();
        let outcome = apply(&mut scratch, &mut selection)?;

        self.selection = selection;
        if outcome.structural {
            self.commit(scratch);
        }
        Ok(outcome)
    }

    /// Connect two nodes with a new edge and record history.
    ///
    /// Self-connections, unknown endpoints and repeated connections are
    /// rejected.
    pub fn connect(&mut self, connection: &Connection) -> Result<EdgeId, StackError> {
        let id = self.edge_id_for(&connection.source, &connection.target);
        let edge = TechEdge {
            id: id.clone(),
            source: connection.source.clone(),
            target: connection.target.clone(),
        };
        changes::check_new_edge(&self.current, &edge)?;

        let mut scratch = Snapshot::clone(&self.current);
        scratch.edges.push(edge);
        self.commit(scratch);
        Ok(id)
    }

    /// Drop a technology from the palette onto the canvas.
    pub fn add_technology(
        &mut self,
        technology: &Technology,
        position: Position,
    ) -> Result<NodeId, StackError> {
        let id = self.node_id_for(technology.category.as_str());
        let node = TechNode {
            id: id.clone(),
            kind: technology.category,
            position,
            data: NodeData::new(technology.name.clone(), technology.icon.clone()),
        };
        self.apply_node_changes(&[NodeChange::Add { node }])?;
        Ok(id)
    }

    /// Step back one history entry. Returns false when nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.adopt(snapshot);
                true
            }
            None => false,
        }
    }

    /// Step forward one history entry. Returns false when nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.adopt(snapshot);
                true
            }
            None => false,
        }
    }

    /// Replace the whole graph with a saved stack.
    ///
    /// History restarts at the loaded state. Edges with missing endpoints
    /// are dropped and returned.
    pub fn load_stack(&mut self, stack: Stack) -> Vec<TechEdge> {
        let mut snapshot = Snapshot::new(stack.nodes, stack.edges);
        let dropped = snapshot.prune_dangling_edges();
        for edge in &dropped {
            tracing::warn!(
                stack = %stack.id,
                edge = %edge.id,
                "Dropping edge with missing endpoint on load"
            );
        }

        self.id = stack.id;
        self.name = stack.name;
        self.created_at = stack.created_at;
        self.selection.clear();
        self.history.reset(snapshot);
        self.current = self.history.current();
        dropped
    }

    /// Seed a fresh stack from a template.
    pub fn load_template(&mut self, template: &Template, now: DateTime<Utc>) {
        self.load_stack(template.instantiate(now));
    }

    /// Start over on an empty, untitled stack.
    pub fn new_stack(&mut self, now: DateTime<Utc>) {
        self.id = StackId::generate();
        self.name = UNTITLED.to_string();
        self.created_at = now;
        self.selection.clear();
        self.history.clear();
        self.current = self.history.current();
    }

    /// Rename the stack. Names are trimmed; empty or overlong names are
    /// rejected.
    pub fn rename(&mut self, name: &str) -> Result<(), StackError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StackError::LimitExceeded("stack name is empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(StackError::LimitExceeded(format!(
                "stack name longer than {} characters",
                MAX_NAME_LENGTH
            )));
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Copy the editor content into a stack ready for saving.
    #[must_use]
    pub fn to_stack(&self, now: DateTime<Utc>) -> Stack {
        Stack {
            id: self.id.clone(),
            name: self.name.clone(),
            nodes: self.current.nodes.clone(),
            edges: self.current.edges.clone(),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Run the local rule engine on the current graph.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        rules::validate_stack(&self.current.nodes, &self.current.edges)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn commit(&mut self, snapshot: Snapshot) {
        self.history.push_state(snapshot);
        self.current = self.history.current();
    }

    fn adopt(&mut self, snapshot: Arc<Snapshot>) {
        self.selection.retain_existing(&snapshot);
        self.current = snapshot;
    }

    /// `<category>-<n>` with the smallest n not in use.
    fn node_id_for(&self, category: &str) -> NodeId {
        (1..)
            .map(|n| NodeId::new(format!("{category}-{n}")))
            .find(|id| !self.current.nodes.iter().any(|node| &node.id == id))
            .unwrap_or_else(|| NodeId::new(format!("{category}-{}", StackId::generate())))
    }

    /// `edge-<source>-<target>`, suffixed when the id is taken.
    fn edge_id_for(&self, source: &NodeId, target: &NodeId) -> EdgeId {
        let base = format!("edge-{source}-{target}");
        let taken = |id: &str| self.current.edges.iter().any(|e| e.id.as_str() == id);
        if !taken(&base) {
            return EdgeId::new(base);
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|id| !taken(id))
            .map(EdgeId::new)
            .unwrap_or_else(|| EdgeId::new(format!("{base}-{}", StackId::generate())))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fallback_catalog, find_technology};
    use crate::templates::template;
    use crate::types::TechCategory;

    fn tech(name: &str) -> Technology {
        let catalog = fallback_catalog();
        find_technology(&catalog, name)
            .cloned()
            .expect("technology in fallback catalog")
    }

    fn editor_with_two_nodes() -> (StackEditor, NodeId, NodeId) {
        let mut editor = StackEditor::default();
        let a = editor
            .add_technology(&tech("React"), Position::new(0, 0))
            .expect("add");
        let b = editor
            .add_technology(&tech("Express.js"), Position::new(300, 0))
            .expect("add");
        (editor, a, b)
    }

    #[test]
    fn add_technology_generates_category_ids() {
        let (editor, a, b) = editor_with_two_nodes();
        assert_eq!(a, NodeId::from("frontend-1"));
        assert_eq!(b, NodeId::from("backend-1"));
        assert_eq!(editor.nodes()[0].data.name, "React");
        assert!(!editor.nodes()[0].data.icon.is_empty());
    }

    #[test]
    fn every_structural_batch_records_one_entry() {
        let (mut editor, a, b) = editor_with_two_nodes();
        assert_eq!(editor.history().past_len(), 2);

        editor
            .apply_node_changes(&[
                NodeChange::Move {
                    id: a.clone(),
                    position: Position::new(10, 10),
                },
                NodeChange::Move {
                    id: b,
                    position: Position::new(20, 20),
                },
            ])
            .expect("move");
        assert_eq!(editor.history().past_len(), 3);

        editor
            .apply_node_changes(&[NodeChange::Select { id: a, selected: true }])
            .expect("select");
        assert_eq!(editor.history().past_len(), 3);
    }

    #[test]
    fn failed_batch_leaves_editor_untouched() {
        let (mut editor, a, _) = editor_with_two_nodes();
        let before = editor.snapshot();

        let result = editor.apply_node_changes(&[
            NodeChange::Move {
                id: a,
                position: Position::new(99, 99),
            },
            NodeChange::Remove {
                id: NodeId::from("ghost"),
            },
        ]);

        assert!(matches!(result, Err(StackError::NodeNotFound(_))));
        assert_eq!(*editor.snapshot(), *before);
        assert_eq!(editor.history().past_len(), 2);
    }

    #[test]
    fn connect_generates_edge_and_rejects_self_loops() {
        let (mut editor, a, b) = editor_with_two_nodes();

        let id = editor
            .connect(&Connection {
                source: a.clone(),
                target: b.clone(),
            })
            .expect("connect");
        assert_eq!(id, EdgeId::from("edge-frontend-1-backend-1"));
        assert_eq!(editor.edges().len(), 1);

        let looped = editor.connect(&Connection {
            source: a.clone(),
            target: a,
        });
        assert!(matches!(looped, Err(StackError::SelfLoop(_))));
        assert_eq!(editor.edges().len(), 1);
    }

    #[test]
    fn edge_ids_are_suffixed_on_collision() {
        let (mut editor, a, b) = editor_with_two_nodes();
        editor
            .apply_edge_changes(&[EdgeChange::Add {
                edge: TechEdge::new("edge-frontend-1-backend-1", "backend-1", "frontend-1"),
            }])
            .expect("manual edge");
        let id = editor
            .connect(&Connection { source: a, target: b })
            .expect("connect");
        assert_eq!(id, EdgeId::from("edge-frontend-1-backend-1-2"));
    }

    #[test]
    fn undo_redo_round_trip() {
        let (mut editor, a, b) = editor_with_two_nodes();
        let before_connect = editor.snapshot();
        editor
            .connect(&Connection { source: a, target: b })
            .expect("connect");
        let after_connect = editor.snapshot();

        assert!(editor.undo());
        assert_eq!(*editor.snapshot(), *before_connect);
        assert!(editor.redo());
        assert_eq!(*editor.snapshot(), *after_connect);
        assert!(!editor.redo());
    }

    #[test]
    fn undo_drops_selection_of_vanished_nodes() {
        let (mut editor, _, b) = editor_with_two_nodes();
        editor
            .apply_node_changes(&[NodeChange::Select {
                id: b.clone(),
                selected: true,
            }])
            .expect("select");
        assert!(editor.undo());
        assert!(!editor.selection().nodes.contains(&b));
    }

    #[test]
    fn load_stack_resets_history_and_prunes_dangling_edges() {
        let (mut editor, _, _) = editor_with_two_nodes();
        let mut stack = Stack::new("Loaded", Utc::now());
        stack.nodes = vec![TechNode::new(
            "database-1",
            TechCategory::Database,
            "MongoDB",
            Position::default(),
        )];
        stack.edges = vec![TechEdge::new("e", "database-1", "gone")];

        let dropped = editor.load_stack(stack.clone());

        assert_eq!(dropped.len(), 1);
        assert!(editor.edges().is_empty());
        assert!(!editor.can_undo());
        assert_eq!(editor.name(), "Loaded");
        assert_eq!(editor.id(), &stack.id);
    }

    #[test]
    fn load_template_seeds_graph() {
        let mut editor = StackEditor::default();
        let t = template("web-app").expect("template");
        editor.load_template(t, Utc::now());
        assert_eq!(editor.nodes().len(), t.node_count());
        assert_eq!(editor.edges().len(), t.edge_count());
        assert!(!editor.can_undo());
        assert!(editor.validate().is_valid);
    }

    #[test]
    fn new_stack_clears_everything() {
        let (mut editor, _, _) = editor_with_two_nodes();
        let old_id = editor.id().clone();
        editor.new_stack(Utc::now());
        assert!(editor.nodes().is_empty());
        assert!(!editor.can_undo());
        assert_ne!(editor.id(), &old_id);
        assert_eq!(editor.name(), UNTITLED);
    }

    #[test]
    fn to_stack_keeps_identity_and_content() {
        let (mut editor, a, b) = editor_with_two_nodes();
        editor.rename("  My Stack ").expect("rename");
        editor
            .connect(&Connection { source: a, target: b })
            .expect("connect");
        let stack = editor.to_stack(Utc::now());
        assert_eq!(stack.name, "My Stack");
        assert_eq!(&stack.id, editor.id());
        assert_eq!(stack.nodes, editor.nodes());
        assert_eq!(stack.edges, editor.edges());
    }

    #[test]
    fn rename_rejects_blank_names() {
        let mut editor = StackEditor::default();
        assert!(editor.rename("   ").is_err());
        assert_eq!(editor.name(), UNTITLED);
    }
}
