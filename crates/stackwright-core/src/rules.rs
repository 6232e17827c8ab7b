//! # Compatibility Rule Engine
//!
//! Pure, deterministic scoring of a stack against the compatibility table.
//! No I/O, no mutation, no floating point.
//!
//! ## Scores
//!
//! Sub-scores live on a 0–10 scale stored as thousandths of a point
//! ([`Score`]). The overall score is an integer on a 0–100 scale:
//!
//! | Dimension | Weight |
//! |-----------|--------|
//! | maintainability | 25% |
//! | scalability | 25% |
//! | security | 20% |
//! | performance | 20% |
//! | 10 − complexity | 10% |
//!
//! The weighted sum is rounded to whole points and multiplied by ten.

use crate::compat::{self, AUTH_PROVIDERS, BACKENDS, CACHES, DATABASES, FRONTENDS, LOAD_BALANCERS};
use crate::primitives::{MAX_POINTS, SCORE_SCALE};
use crate::types::{EdgeId, NodeId, TechEdge, TechNode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const MAX_MILLI: u32 = MAX_POINTS * SCORE_SCALE;
const FLOOR_MILLI: u32 = SCORE_SCALE;

// =============================================================================
// SCORE
// =============================================================================

/// A sub-score on the 0–10 scale, in thousandths of a point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Score(u32);

impl Score {
    /// A score of whole points.
    #[must_use]
    pub const fn from_points(points: u32) -> Self {
        Self(points.saturating_mul(SCORE_SCALE))
    }

    /// A score from raw thousandths, capped at 10 points.
    #[must_use]
    pub const fn from_milli(milli: u32) -> Self {
        if milli > MAX_MILLI {
            Self(MAX_MILLI)
        } else {
            Self(milli)
        }
    }

    /// Raw value in thousandths of a point.
    #[must_use]
    pub const fn milli(self) -> u32 {
        self.0
    }

    /// Value rounded to the nearest whole point (halves round up).
    #[must_use]
    pub const fn points(self) -> u32 {
        (self.0 + SCORE_SCALE / 2) / SCORE_SCALE
    }
}

impl fmt::Display for Score {
    /// One decimal, truncated: `7.0`, `2.6`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / SCORE_SCALE, (self.0 % SCORE_SCALE) / 100)
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
    Info,
}

/// One finding of the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_ids: Vec<EdgeId>,
}

impl ValidationMessage {
    fn new(kind: MessageKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            node_ids: Vec::new(),
            edge_ids: Vec::new(),
        }
    }

    fn with_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.node_ids.extend(nodes);
        self
    }

    fn with_edge(mut self, edge: EdgeId) -> Self {
        self.edge_ids.push(edge);
        self
    }
}

/// The five independent sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub complexity: Score,
    pub maintainability: Score,
    pub scalability: Score,
    pub security: Score,
    pub performance: Score,
}

/// Result of a local validation. Created fresh per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff no `error` message was produced.
    pub is_valid: bool,
    pub messages: Vec<ValidationMessage>,
    pub metrics: ValidationMetrics,
    /// Weighted composite on a 0–100 scale.
    pub overall_score: u8,
}

impl ValidationReport {
    /// Messages of one severity.
    pub fn messages_of(&self, kind: MessageKind) -> impl Iterator<Item = &ValidationMessage> {
        self.messages.iter().filter(move |m| m.kind == kind)
    }

    #[must_use]
    pub fn count(&self, kind: MessageKind) -> usize {
        self.messages_of(kind).count()
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Score a graph against the compatibility table.
///
/// Edges whose endpoints are not both present are ignored.
#[must_use]
pub fn validate_stack(nodes: &[TechNode], edges: &[TechEdge]) -> ValidationReport {
    let by_id: BTreeMap<&NodeId, &TechNode> = nodes.iter().map(|n| (&n.id, n)).collect();
    let live_edges: Vec<(&TechEdge, &TechNode, &TechNode)> = edges
        .iter()
        .filter_map(|e| Some((e, *by_id.get(&e.source)?, *by_id.get(&e.target)?)))
        .collect();

    let mut messages = Vec::new();

    // 1. isolation
    let connected: BTreeSet<&NodeId> = live_edges
        .iter()
        .flat_map(|(e, _, _)| [&e.source, &e.target])
        .collect();
    for node in nodes.iter().filter(|n| !connected.contains(&n.id)) {
        messages.push(
            ValidationMessage::new(
                MessageKind::Error,
                format!("{} is not connected to any other technology", node.name()),
            )
            .with_nodes([node.id.clone()]),
        );
    }

    // 2. pairwise compatibility
    let mut compatible_edges: u32 = 0;
    for (edge, source, target) in &live_edges {
        let Some(entry) = compat::lookup(source.name()) else {
            continue;
        };
        let endpoints = [source.id.clone(), target.id.clone()];
        if entry.is_compatible_with(target.name()) {
            compatible_edges += 1;
            if !entry.best_practices.is_empty() {
                messages.push(
                    ValidationMessage::new(
                        MessageKind::Info,
                        format!(
                            "{} with {}: {}",
                            source.name(),
                            target.name(),
                            entry.best_practices.join("; ")
                        ),
                    )
                    .with_nodes(endpoints)
                    .with_edge(edge.id.clone()),
                );
            }
        } else {
            let mut text = format!(
                "{} may not be fully compatible with {}",
                source.name(),
                target.name()
            );
            if !entry.alternatives.is_empty() {
                text.push_str(&format!(
                    ". Consider alternatives: {}",
                    entry.alternatives.join(", ")
                ));
            }
            messages.push(
                ValidationMessage::new(MessageKind::Warning, text)
                    .with_nodes(endpoints)
                    .with_edge(edge.id.clone()),
            );
        }
    }

    // 3. metrics
    let names: BTreeSet<&str> = nodes.iter().map(|n| n.name()).collect();
    let has = |family: &[&str]| names.iter().any(|n| compat::in_family(family, n));
    let has_frontend = has(FRONTENDS);
    let has_backend = has(BACKENDS);
    let has_database = has(DATABASES);
    let has_auth = has(AUTH_PROVIDERS);
    let has_cache = has(CACHES);
    let has_balancer = has(LOAD_BALANCERS);
    let has_https = names.iter().any(|n| n.to_ascii_lowercase().contains("https"));
    let has_tls = names.iter().any(|n| {
        let lower = n.to_ascii_lowercase();
        lower.contains("tls") || lower.contains("ssl")
    });

    let node_count = nodes.len() as u64;
    let edge_count = live_edges.len() as u64;

    let complexity = {
        // n/5 and e/8 points, each capped at 10
        let node_term = node_count.saturating_mul(200).min(MAX_MILLI as u64);
        let edge_term = edge_count.saturating_mul(125).min(MAX_MILLI as u64);
        Score::from_milli(((node_term + edge_term) / 2) as u32)
    };

    let maintainability = if edge_count == 0 {
        Score::default()
    } else {
        Score::from_milli((u64::from(compatible_edges) * MAX_MILLI as u64 / edge_count) as u32)
    };

    let scalability = penalized(&[
        (!has_database, 3),
        (!has_backend, 3),
        (!has_frontend, 3),
    ]);

    let security = penalized(&[(!has_auth, 3), (!has_https, 2), (!has_tls, 2)]);
    if !has_auth {
        messages.push(ValidationMessage::new(
            MessageKind::Warning,
            "No authentication technology found. Consider adding Auth0, NextAuth.js, JWT or OAuth",
        ));
    }

    let needs_balancer = !has_balancer && node_count > 5;
    let performance = penalized(&[(!has_cache, 2), (needs_balancer, 2)]);
    if !has_cache {
        messages.push(ValidationMessage::new(
            MessageKind::Info,
            "Consider adding a caching layer such as Redis to improve performance",
        ));
    }
    if needs_balancer {
        messages.push(ValidationMessage::new(
            MessageKind::Info,
            "Consider adding a load balancer such as Nginx or HAProxy as the stack grows",
        ));
    }

    let metrics = ValidationMetrics {
        complexity,
        maintainability,
        scalability,
        security,
        performance,
    };

    // 5. architecture pattern
    if nodes.len() >= 3 && has_frontend && has_backend && has_database {
        messages.push(ValidationMessage::new(
            MessageKind::Info,
            "Three-tier architecture detected (frontend, backend, database). \
             Consider a caching layer between the backend and the database",
        ));
    }

    let is_valid = !messages.iter().any(|m| m.kind == MessageKind::Error);

    ValidationReport {
        is_valid,
        messages,
        overall_score: overall_score(&metrics),
        metrics,
    }
}

/// Start at 10 points, subtract each active penalty, floor at 1 point.
fn penalized(penalties: &[(bool, u32)]) -> Score {
    let lost: u32 = penalties
        .iter()
        .filter(|(active, _)| *active)
        .map(|(_, points)| points * SCORE_SCALE)
        .sum();
    Score::from_milli(MAX_MILLI.saturating_sub(lost).max(FLOOR_MILLI))
}

/// Weighted composite mapped onto 0–100. Higher complexity lowers it.
#[must_use]
pub fn overall_score(metrics: &ValidationMetrics) -> u8 {
    let simplicity = MAX_MILLI - metrics.complexity.milli().min(MAX_MILLI);
    let weighted_percent_milli = u64::from(metrics.maintainability.milli()) * 25
        + u64::from(metrics.scalability.milli()) * 25
        + u64::from(metrics.security.milli()) * 20
        + u64::from(metrics.performance.milli()) * 20
        + u64::from(simplicity) * 10;
    let weighted = Score::from_milli((weighted_percent_milli / 100) as u32);
    (weighted.points() * 10).min(100) as u8
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, TechCategory};

    fn node(id: &str, kind: TechCategory, name: &str) -> TechNode {
        TechNode::new(id, kind, name, Position::default())
    }

    fn edge(id: &str, source: &str, target: &str) -> TechEdge {
        TechEdge::new(id, source, target)
    }

    #[test]
    fn score_display_and_rounding() {
        assert_eq!(Score::from_points(7).to_string(), "7.0");
        assert_eq!(Score::from_milli(2_625).to_string(), "2.6");
        assert_eq!(Score::from_milli(2_500).points(), 3);
        assert_eq!(Score::from_milli(2_499).points(), 2);
        assert_eq!(Score::from_milli(99_999), Score::from_points(10));
    }

    #[test]
    fn empty_graph_has_defined_baseline() {
        let report = validate_stack(&[], &[]);
        assert!(report.is_valid);
        assert_eq!(report.metrics.complexity, Score::default());
        assert_eq!(report.metrics.maintainability, Score::default());
        assert_eq!(report.metrics.scalability, Score::from_points(1));
        assert_eq!(report.metrics.security, Score::from_points(3));
        assert_eq!(report.metrics.performance, Score::from_points(8));
        assert_eq!(report.overall_score, 30);
    }

    #[test]
    fn isolated_nodes_are_errors() {
        let nodes = vec![
            node("a", TechCategory::Frontend, "React"),
            node("b", TechCategory::Database, "MongoDB"),
        ];
        let report = validate_stack(&nodes, &[]);
        assert!(!report.is_valid);
        assert_eq!(report.count(MessageKind::Error), 2);
        let flagged: Vec<_> = report
            .messages_of(MessageKind::Error)
            .flat_map(|m| m.node_ids.iter().cloned())
            .collect();
        assert_eq!(flagged, vec![NodeId::from("a"), NodeId::from("b")]);
    }

    #[test]
    fn react_to_mongodb_warns_and_loses_backend_points() {
        let nodes = vec![
            node("react", TechCategory::Frontend, "React"),
            node("mongo", TechCategory::Database, "MongoDB"),
        ];
        let edges = vec![edge("e1", "react", "mongo")];
        let report = validate_stack(&nodes, &edges);

        assert!(report.is_valid);
        let warning = report
            .messages_of(MessageKind::Warning)
            .find(|m| m.edge_ids == vec![EdgeId::from("e1")])
            .expect("compatibility warning");
        assert!(warning.message.contains("React"));
        assert!(warning.message.contains("MongoDB"));
        assert!(warning.message.contains("Vue.js"));
        assert_eq!(report.metrics.scalability, Score::from_points(7));
        assert_eq!(report.metrics.maintainability, Score::default());
        // complexity (0.4 + 0.125) / 2
        assert_eq!(report.metrics.complexity, Score::from_milli(262));
        assert_eq!(report.overall_score, 50);
    }

    #[test]
    fn three_tier_chain_is_fully_maintainable() {
        let nodes = vec![
            node("fe", TechCategory::Frontend, "React"),
            node("be", TechCategory::Backend, "Express.js"),
            node("db", TechCategory::Database, "MongoDB"),
        ];
        let edges = vec![edge("e1", "fe", "be"), edge("e2", "be", "db")];
        let report = validate_stack(&nodes, &edges);

        assert!(report.is_valid);
        assert_eq!(report.metrics.maintainability, Score::from_points(10));
        assert_eq!(report.metrics.scalability, Score::from_points(10));
        assert!(
            report
                .messages_of(MessageKind::Info)
                .any(|m| m.message.starts_with("Three-tier architecture"))
        );
        // compatible edges surface best practices
        assert!(
            report
                .messages_of(MessageKind::Info)
                .any(|m| m.edge_ids == vec![EdgeId::from("e1")])
        );
    }

    #[test]
    fn unknown_source_produces_no_pair_message() {
        let nodes = vec![
            node("a", TechCategory::Other, "Mystery"),
            node("b", TechCategory::Database, "MongoDB"),
        ];
        let report = validate_stack(&nodes, &[edge("e", "a", "b")]);
        assert!(report.messages.iter().all(|m| m.edge_ids.is_empty()));
        assert_eq!(report.metrics.maintainability, Score::default());
    }

    #[test]
    fn security_counts_auth_https_and_tls() {
        let nodes = vec![
            node("a", TechCategory::Security, "Auth0"),
            node("b", TechCategory::Security, "HTTPS"),
            node("c", TechCategory::Security, "TLS/SSL"),
            node("d", TechCategory::Frontend, "React"),
        ];
        let edges = vec![edge("e1", "d", "a"), edge("e2", "b", "c"), edge("e3", "c", "d")];
        let report = validate_stack(&nodes, &edges);
        assert_eq!(report.metrics.security, Score::from_points(10));
        assert!(
            !report
                .messages_of(MessageKind::Warning)
                .any(|m| m.message.contains("authentication"))
        );
    }

    #[test]
    fn load_balancer_only_matters_above_five_nodes() {
        let small: Vec<_> = (0..5)
            .map(|i| node(&format!("n{i}"), TechCategory::Other, &format!("T{i}")))
            .collect();
        let large: Vec<_> = (0..6)
            .map(|i| node(&format!("n{i}"), TechCategory::Other, &format!("T{i}")))
            .collect();
        assert_eq!(validate_stack(&small, &[]).metrics.performance, Score::from_points(8));
        assert_eq!(validate_stack(&large, &[]).metrics.performance, Score::from_points(6));
    }

    #[test]
    fn complexity_is_capped() {
        let nodes: Vec<_> = (0..200)
            .map(|i| node(&format!("n{i}"), TechCategory::Other, &format!("T{i}")))
            .collect();
        let edges: Vec<_> = (0..199)
            .map(|i| edge(&format!("e{i}"), &format!("n{i}"), &format!("n{}", i + 1)))
            .collect();
        let report = validate_stack(&nodes, &edges);
        assert_eq!(report.metrics.complexity, Score::from_points(10));
        assert!(report.overall_score <= 100);
    }

    #[test]
    fn dangling_edges_are_ignored() {
        let nodes = vec![node("a", TechCategory::Frontend, "React")];
        let report = validate_stack(&nodes, &[edge("e", "a", "ghost")]);
        assert!(!report.is_valid);
        assert_eq!(report.metrics.maintainability, Score::default());
    }

    #[test]
    fn report_serializes_message_kind_as_type() {
        let report = validate_stack(&[node("a", TechCategory::Frontend, "React")], &[]);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["isValid"], false);
        assert_eq!(json["messages"][0]["type"], "error");
        assert_eq!(json["messages"][0]["nodeIds"][0], "a");
    }
}
