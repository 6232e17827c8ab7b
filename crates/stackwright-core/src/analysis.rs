//! # Remote Analysis Schema
//!
//! The report shape returned by the remote text-generation path, plus the
//! pure halves of that path: turning a graph into a prompt and turning model
//! text back into a [`StackAnalysis`].
//!
//! The network call itself lives in the app crate. Nothing here can fail:
//! any unusable model output becomes [`StackAnalysis::fallback`].
//!
//! This report is deliberately distinct from [`crate::rules::ValidationReport`]:
//! its six scores are 0–100 judgements of an external model and are not
//! comparable with the rule engine's 0–10 metrics.

use crate::types::{TechEdge, TechNode};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Message returned when validation is requested on an empty canvas.
pub const EMPTY_STACK_MESSAGE: &str = "Stack is empty. Add some technologies to validate.";

/// Message returned when the remote service is unreachable or answers badly.
pub const UNAVAILABLE_MESSAGE: &str = "Could not validate the stack. Please try again later.";

/// System instruction sent with every analysis request.
pub const RUBRIC: &str = "You are a senior software architect reviewing a technology stack. \
Assess how well the technologies work together, how the stack scales, how maintainable and \
secure it is, and how it performs. Answer with a single JSON object and nothing else, using \
exactly these keys: \
{\"isValid\": boolean, \"message\": string, \
\"scores\": {\"overall\": 0-100, \"compatibility\": 0-100, \"scalability\": 0-100, \
\"maintainability\": 0-100, \"security\": 0-100, \"performance\": 0-100}, \
\"analysis\": {\"summary\": string, \"strengths\": [string], \"weaknesses\": [string]}, \
\"compatibility\": {\"compatiblePairs\": [string], \"conflicts\": [string]}, \
\"recommendations\": {\"improvements\": [string], \"alternatives\": [string], \"additions\": [string]}}. \
A stack is invalid only when it contains technologies that cannot work together.";

// =============================================================================
// SCHEMA
// =============================================================================

/// Six 0–100 judgements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisScores {
    #[serde(deserialize_with = "percent")]
    pub overall: u8,
    #[serde(deserialize_with = "percent")]
    pub compatibility: u8,
    #[serde(deserialize_with = "percent")]
    pub scalability: u8,
    #[serde(deserialize_with = "percent")]
    pub maintainability: u8,
    #[serde(deserialize_with = "percent")]
    pub security: u8,
    #[serde(deserialize_with = "percent")]
    pub performance: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitativeAnalysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompatibilityFindings {
    pub compatible_pairs: Vec<String>,
    pub conflicts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    pub improvements: Vec<String>,
    pub alternatives: Vec<String>,
    pub additions: Vec<String>,
}

/// Report of the remote analysis path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackAnalysis {
    pub is_valid: bool,
    pub message: String,
    pub scores: AnalysisScores,
    pub analysis: QualitativeAnalysis,
    pub compatibility: CompatibilityFindings,
    pub recommendations: Recommendations,
}

impl StackAnalysis {
    /// The all-zero, invalid report used whenever the remote path cannot
    /// produce a real one.
    #[must_use]
    pub fn fallback(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Accept integers, floats or numeric strings and clamp to 0..=100.
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(0))
}

// =============================================================================
// PROMPT
// =============================================================================

/// Describe a graph in plain language: the technologies in use, then one
/// `A -> B` line per connection between known nodes.
#[must_use]
pub fn describe_stack(nodes: &[TechNode], edges: &[TechEdge]) -> String {
    let names: BTreeMap<_, _> = nodes.iter().map(|n| (&n.id, n.name())).collect();

    let mut out = String::from("Technologies: ");
    out.push_str(
        &nodes
            .iter()
            .map(|n| format!("{} ({})", n.name(), n.kind))
            .collect::<Vec<_>>()
            .join(", "),
    );
    out.push('\n');

    let relations: Vec<String> = edges
        .iter()
        .filter_map(|e| Some(format!("{} -> {}", names.get(&e.source)?, names.get(&e.target)?)))
        .collect();

    if relations.is_empty() {
        out.push_str("Relationships: none\n");
    } else {
        out.push_str("Relationships:\n");
        for relation in relations {
            out.push_str("- ");
            out.push_str(&relation);
            out.push('\n');
        }
    }
    out
}

// =============================================================================
// PARSING
// =============================================================================

/// Extract a [`StackAnalysis`] from model output.
///
/// Tolerates code fences and prose around the JSON object. Returns `None`
/// when no object can be parsed.
#[must_use]
pub fn parse_analysis(text: &str) -> Option<StackAnalysis> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<StackAnalysis>(&text[start..=end]) {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            tracing::debug!(error = %e, "Model output is not a valid analysis object");
            None
        }
    }
}
