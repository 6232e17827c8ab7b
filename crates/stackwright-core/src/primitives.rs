//! # Primitives
//!
//! Hardcoded runtime constants for the Stackwright core.

/// Default maximum number of undo entries kept by the history.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Storage key under which all saved stacks live as one JSON array.
pub const STACKS_KEY: &str = "tech-stacks";

/// Fixed-point scale of validation scores: 1 point = 1000 units.
pub const SCORE_SCALE: u32 = 1000;

/// Upper bound of a validation sub-score, in points.
pub const MAX_POINTS: u32 = 10;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of nodes accepted in a single stack.
///
/// Editing and validation stay interactive well below this.
pub const MAX_STACK_NODES: usize = 500;

/// Maximum number of edges accepted in a single stack.
pub const MAX_STACK_EDGES: usize = 2000;

/// Maximum size of an imported stack JSON document (4 MB).
pub const MAX_IMPORT_SIZE: usize = 4 * 1024 * 1024;

/// Maximum length of a stack name.
pub const MAX_NAME_LENGTH: usize = 120;
