//! # Stack JSON Format
//!
//! Export and import of a single stack as a standalone JSON document, the
//! same shape as one element of the saved-stacks array.
//!
//! Imports are checked before use: size limit first, then parsing, then
//! node/edge limits and endpoint integrity.

use crate::primitives::{MAX_IMPORT_SIZE, MAX_STACK_EDGES, MAX_STACK_NODES};
use crate::types::{Stack, StackError};

/// Serialize a stack as pretty-printed JSON.
pub fn export_stack_json(stack: &Stack) -> Result<String, StackError> {
    serde_json::to_string_pretty(stack).map_err(|e| StackError::SerializationError(e.to_string()))
}

/// Parse and check a stack JSON document.
pub fn import_stack_json(json: &str) -> Result<Stack, StackError> {
    if json.len() > MAX_IMPORT_SIZE {
        return Err(StackError::LimitExceeded(format!(
            "document of {} bytes exceeds the {} byte import limit",
            json.len(),
            MAX_IMPORT_SIZE
        )));
    }

    let stack: Stack =
        serde_json::from_str(json).map_err(|e| StackError::DeserializationError(e.to_string()))?;

    if stack.nodes.len() > MAX_STACK_NODES {
        return Err(StackError::LimitExceeded(format!(
            "stack has {} nodes, maximum is {}",
            stack.nodes.len(),
            MAX_STACK_NODES
        )));
    }
    if stack.edges.len() > MAX_STACK_EDGES {
        return Err(StackError::LimitExceeded(format!(
            "stack has {} edges, maximum is {}",
            stack.edges.len(),
            MAX_STACK_EDGES
        )));
    }

    stack.snapshot().check_integrity()?;
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::template;
    use crate::types::TechEdge;
    use chrono::Utc;

    fn sample() -> Stack {
        template("jamstack").expect("template").instantiate(Utc::now())
    }

    #[test]
    fn export_then_import_is_identity() {
        let stack = sample();
        let json = export_stack_json(&stack).expect("export");
        assert!(json.contains('\n'));
        assert_eq!(import_stack_json(&json).expect("import"), stack);
    }

    #[test]
    fn import_rejects_dangling_edges() {
        let mut stack = sample();
        stack.edges.push(TechEdge::new("bad", "frontend-1", "nowhere"));
        let json = export_stack_json(&stack).expect("export");
        assert!(matches!(
            import_stack_json(&json),
            Err(StackError::DanglingEdge(_))
        ));
    }

    #[test]
    fn import_rejects_garbage() {
        assert!(matches!(
            import_stack_json("[1, 2, 3]"),
            Err(StackError::DeserializationError(_))
        ));
    }

    #[test]
    fn import_rejects_oversized_documents() {
        let big = " ".repeat(MAX_IMPORT_SIZE + 1);
        assert!(matches!(
            import_stack_json(&big),
            Err(StackError::LimitExceeded(_))
        ));
    }
}
