//! # Templates
//!
//! Fixed catalog of named stack skeletons with precomputed layouts, used to
//! seed a new stack in one action.

use crate::types::{Position, Stack, TechCategory, TechEdge, TechNode};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A node of a template: (id, category, technology name, x, y).
type TemplateNode = (&'static str, TechCategory, &'static str, i32, i32);

/// A named stack skeleton.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    nodes: &'static [TemplateNode],
    #[serde(skip)]
    edges: &'static [(&'static str, &'static str)],
}

impl Template {
    /// Number of nodes the template seeds.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges the template seeds.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build a fresh stack (new id, `now` timestamps) from this template.
    #[must_use]
    pub fn instantiate(&self, now: DateTime<Utc>) -> Stack {
        let mut stack = Stack::new(self.name, now);
        stack.nodes = self
            .nodes
            .iter()
            .map(|(id, kind, name, x, y)| TechNode::new(*id, *kind, *name, Position::new(*x, *y)))
            .collect();
        stack.edges = self
            .edges
            .iter()
            .map(|(source, target)| TechEdge::new(format!("edge-{source}-{target}"), *source, *target))
            .collect();
        stack
    }
}

use TechCategory::{Backend, Cloud, Database, Devops, Frontend, Security};

/// All templates, in display order.
pub static TEMPLATES: &[Template] = &[
    Template {
        id: "web-app",
        name: "Web Application",
        description: "Single-page frontend, REST API and document database with a cache",
        nodes: &[
            ("frontend-1", Frontend, "React", 100, 100),
            ("backend-1", Backend, "Express.js", 400, 100),
            ("database-1", Database, "MongoDB", 700, 50),
            ("database-2", Database, "Redis", 700, 200),
            ("security-1", Security, "Auth0", 100, 300),
        ],
        edges: &[
            ("frontend-1", "backend-1"),
            ("backend-1", "database-1"),
            ("backend-1", "database-2"),
            ("frontend-1", "security-1"),
        ],
    },
    Template {
        id: "data-pipeline",
        name: "Data Pipeline",
        description: "Stream ingestion, batch processing and an analytical store",
        nodes: &[
            ("backend-1", Backend, "Apache Kafka", 100, 150),
            ("backend-2", Backend, "Apache Spark", 400, 150),
            ("backend-3", Backend, "Apache Airflow", 400, 0),
            ("database-1", Database, "PostgreSQL", 700, 150),
        ],
        edges: &[
            ("backend-1", "backend-2"),
            ("backend-3", "backend-2"),
            ("backend-2", "database-1"),
        ],
    },
    Template {
        id: "jamstack",
        name: "JAMstack",
        description: "Server-rendered React on an edge platform with a hosted database",
        nodes: &[
            ("frontend-1", Frontend, "Next.js", 250, 100),
            ("cloud-1", Cloud, "Vercel", 550, 0),
            ("database-1", Database, "Supabase", 550, 150),
            ("security-1", Security, "NextAuth.js", 550, 300),
        ],
        edges: &[
            ("frontend-1", "cloud-1"),
            ("frontend-1", "database-1"),
            ("frontend-1", "security-1"),
        ],
    },
    Template {
        id: "microservices",
        name: "Microservices",
        description: "Reverse proxy in front of two services sharing an event bus",
        nodes: &[
            ("devops-1", Devops, "Nginx", 50, 200),
            ("backend-1", Backend, "Spring Boot", 350, 100),
            ("backend-2", Backend, "Node.js", 350, 300),
            ("database-1", Database, "PostgreSQL", 650, 50),
            ("database-2", Database, "MongoDB", 650, 350),
            ("backend-3", Backend, "Apache Kafka", 650, 200),
            ("devops-2", Devops, "Docker", 50, 450),
            ("devops-3", Devops, "Kubernetes", 350, 500),
        ],
        edges: &[
            ("devops-1", "backend-1"),
            ("devops-1", "backend-2"),
            ("backend-1", "database-1"),
            ("backend-2", "database-2"),
            ("backend-1", "backend-3"),
            ("backend-2", "backend-3"),
            ("devops-2", "devops-3"),
        ],
    },
];

/// Find a template by id.
#[must_use]
pub fn template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}
