//! # stackwright-core
//!
//! The tech-stack graph engine for Stackwright - THE LOGIC.
//!
//! A stack is a directed graph of technology nodes. This crate owns
//! everything that can be decided without a network:
//! - Editing with linear undo/redo (`editor`, `changes`, `history`)
//! - Deterministic validation against a static compatibility table
//!   (`rules`, `compat`)
//! - Seeding from templates and the palette fallback (`templates`, `catalog`)
//! - Local persistence of saved stacks (`storage`, `library`, `formats`)
//! - The schema, prompt and parser of the remote analysis path (`analysis`)
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - The rule engine is deterministic: integer fixed-point scores, ordered
//!   collections, no floating-point arithmetic
//! - Validation never fails; edits and imports fail with [`StackError`]

// =============================================================================
// MODULES
// =============================================================================

pub mod analysis;
pub mod catalog;
pub mod changes;
pub mod compat;
pub mod editor;
pub mod formats;
pub mod history;
pub mod library;
pub mod primitives;
pub mod rules;
pub mod storage;
pub mod templates;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Connection, EdgeId, NodeData, NodeId, Position, Snapshot, Stack, StackError, StackId,
    TechCategory, TechEdge, TechNode,
};

// =============================================================================
// RE-EXPORTS: Editing
// =============================================================================

pub use changes::{BatchOutcome, EdgeChange, NodeChange, Selection};
pub use editor::StackEditor;
pub use history::History;

// =============================================================================
// RE-EXPORTS: Validation
// =============================================================================

pub use analysis::{StackAnalysis, describe_stack, parse_analysis};
pub use compat::CompatibilityEntry;
pub use rules::{
    MessageKind, Score, ValidationMessage, ValidationMetrics, ValidationReport, overall_score,
    validate_stack,
};

// =============================================================================
// RE-EXPORTS: Catalog, Templates, Persistence
// =============================================================================

pub use catalog::{Technology, fallback_catalog, find_technology};
pub use formats::{export_stack_json, import_stack_json};
pub use library::StackLibrary;
pub use storage::{LocalStore, MemoryStore, RedbStore};
pub use templates::{TEMPLATES, Template, template};
