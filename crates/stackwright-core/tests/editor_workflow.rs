//! # Editor Workflow Tests
//!
//! End-to-end sessions through the public API: seed, edit, validate, save,
//! reload from disk.

use chrono::Utc;
use stackwright_core::{
    Connection, EdgeChange, MessageKind, NodeChange, NodeId, Position, RedbStore, StackEditor,
    StackError, StackLibrary, export_stack_json, fallback_catalog, find_technology,
    import_stack_json, template,
};
use tempfile::tempdir;

fn add(editor: &mut StackEditor, name: &str, x: i32) -> NodeId {
    let catalog = fallback_catalog();
    let tech = find_technology(&catalog, name).expect("technology in catalog");
    editor
        .add_technology(tech, Position::new(x, 0))
        .expect("add technology")
}

// =============================================================================
// SCENARIOS
// =============================================================================

mod scenarios {
    use super::*;

    /// React wired straight to MongoDB: warning, backend penalty, still valid.
    #[test]
    fn react_to_mongodb() {
        let mut editor = StackEditor::default();
        let react = add(&mut editor, "React", 0);
        let mongo = add(&mut editor, "MongoDB", 300);
        editor
            .connect(&Connection::new(react.as_str(), mongo.as_str()))
            .expect("connect");

        let report = editor.validate();

        assert!(report.is_valid);
        assert_eq!(report.count(MessageKind::Warning), 2);
        assert!(
            report
                .messages_of(MessageKind::Warning)
                .any(|m| m.node_ids == vec![react.clone(), mongo.clone()])
        );
        assert_eq!(report.metrics.scalability.points(), 7);
        assert_eq!(report.metrics.maintainability.points(), 0);
    }

    /// React -> Express.js -> MongoDB is fully compatible and three-tier.
    #[test]
    fn three_tier_chain() {
        let mut editor = StackEditor::default();
        let fe = add(&mut editor, "React", 0);
        let be = add(&mut editor, "Express.js", 300);
        let db = add(&mut editor, "MongoDB", 600);
        editor
            .connect(&Connection::new(fe.as_str(), be.as_str()))
            .expect("connect");
        editor
            .connect(&Connection::new(be.as_str(), db.as_str()))
            .expect("connect");

        let report = editor.validate();

        assert!(report.is_valid);
        assert_eq!(report.count(MessageKind::Error), 0);
        // Only the stack-wide security advisory, never an edge warning.
        let warnings: Vec<_> = report.messages_of(MessageKind::Warning).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("No authentication technology"));
        assert!(warnings[0].edge_ids.is_empty());
        assert!(warnings[0].node_ids.is_empty());
        assert_eq!(report.metrics.maintainability.points(), 10);
        assert!(
            report
                .messages_of(MessageKind::Info)
                .any(|m| m.message.starts_with("Three-tier architecture"))
        );
    }

    /// The same chain with Auth0 wired into the backend has no warnings.
    #[test]
    fn three_tier_chain_with_auth() {
        let mut editor = StackEditor::default();
        let fe = add(&mut editor, "React", 0);
        let be = add(&mut editor, "Express.js", 300);
        let db = add(&mut editor, "MongoDB", 600);
        let auth = add(&mut editor, "Auth0", 900);
        for (source, target) in [(&fe, &be), (&be, &db), (&auth, &be)] {
            editor
                .connect(&Connection::new(source.as_str(), target.as_str()))
                .expect("connect");
        }

        let report = editor.validate();

        assert!(report.is_valid);
        assert_eq!(report.count(MessageKind::Error), 0);
        assert_eq!(report.count(MessageKind::Warning), 0);
        assert_eq!(report.metrics.maintainability.points(), 10);
    }

    #[test]
    fn empty_canvas_scores_baseline() {
        let report = StackEditor::default().validate();
        assert!(report.is_valid);
        assert_eq!(report.overall_score, 30);
    }
}

// =============================================================================
// EDITING
// =============================================================================

mod editing {
    use super::*;

    #[test]
    fn removing_a_node_removes_its_edges_and_can_be_undone() {
        let mut editor = StackEditor::default();
        let fe = add(&mut editor, "React", 0);
        let be = add(&mut editor, "Express.js", 300);
        editor
            .connect(&Connection::new(fe.as_str(), be.as_str()))
            .expect("connect");

        editor
            .apply_node_changes(&[NodeChange::Remove { id: be.clone() }])
            .expect("remove");
        assert_eq!(editor.nodes().len(), 1);
        assert!(editor.edges().is_empty());

        assert!(editor.undo());
        assert_eq!(editor.nodes().len(), 2);
        assert_eq!(editor.edges().len(), 1);
    }

    #[test]
    fn malformed_edge_batch_is_rejected_whole() {
        let mut editor = StackEditor::default();
        let fe = add(&mut editor, "React", 0);
        let be = add(&mut editor, "Express.js", 300);
        let undo_depth = editor.history().past_len();

        let result = editor.apply_edge_changes(&[
            EdgeChange::Add {
                edge: stackwright_core::TechEdge::new("ok", fe.as_str(), be.as_str()),
            },
            EdgeChange::Add {
                edge: stackwright_core::TechEdge::new("loop", be.as_str(), be.as_str()),
            },
        ]);

        assert!(matches!(result, Err(StackError::SelfLoop(_))));
        assert!(editor.edges().is_empty());
        assert_eq!(editor.history().past_len(), undo_depth);
    }

    #[test]
    fn duplicate_connection_is_rejected() {
        let mut editor = StackEditor::default();
        let fe = add(&mut editor, "React", 0);
        let be = add(&mut editor, "Express.js", 300);
        let connection = Connection::new(fe.as_str(), be.as_str());
        editor.connect(&connection).expect("first");
        assert!(matches!(
            editor.connect(&connection),
            Err(StackError::DuplicateConnection(_, _))
        ));
    }
}

// =============================================================================
// PERSISTENCE
// =============================================================================

mod persistence {
    use super::*;

    #[test]
    fn template_edit_save_reopen_load() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("stacks.redb");

        let mut editor = StackEditor::default();
        editor.load_template(template("web-app").expect("template"), Utc::now());
        editor.rename("Portfolio").expect("rename");
        add(&mut editor, "Docker", 900);
        let saved = editor.to_stack(Utc::now());

        {
            let mut library = StackLibrary::new(RedbStore::open(&path).expect("open"));
            assert!(library.save_stack(&saved));
        }

        let library = StackLibrary::new(RedbStore::open(&path).expect("reopen"));
        let stacks = library.load_stacks();
        assert_eq!(stacks, vec![saved.clone()]);

        let mut fresh = StackEditor::default();
        let dropped = fresh.load_stack(stacks[0].clone());
        assert!(dropped.is_empty());
        assert_eq!(fresh.name(), "Portfolio");
        assert_eq!(fresh.nodes(), saved.nodes.as_slice());
        assert!(!fresh.can_undo());
    }

    #[test]
    fn export_import_feeds_the_editor() {
        let mut editor = StackEditor::default();
        editor.load_template(template("microservices").expect("template"), Utc::now());
        let json = export_stack_json(&editor.to_stack(Utc::now())).expect("export");

        let imported = import_stack_json(&json).expect("import");
        let mut other = StackEditor::default();
        other.load_stack(imported);
        assert_eq!(other.snapshot(), editor.snapshot());
    }
}
