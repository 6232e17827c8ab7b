//! # Technology Catalog
//!
//! The palette of technologies a user can drag onto the canvas.
//!
//! The app fetches a richer catalog from a remote icon source at startup;
//! this module holds the hard-coded fallback used when that fetch fails.

use crate::types::TechCategory;
use serde::{Deserialize, Serialize};

const ICON_BASE: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon/icons";

/// One entry of the palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub category: TechCategory,
    #[serde(default)]
    pub icon: String,
}

impl Technology {
    #[must_use]
    pub fn new(name: impl Into<String>, category: TechCategory, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            icon: icon.into(),
        }
    }
}

/// Build a devicon URL from an icon slug. An empty slug yields an empty icon.
#[must_use]
pub fn icon_url(slug: &str) -> String {
    if slug.is_empty() {
        return String::new();
    }
    format!("{ICON_BASE}/{slug}/{slug}-original.svg")
}

use TechCategory::{Backend, Cloud, Database, Devops, Frontend, Mobile, Security, Testing};

/// (name, category, devicon slug)
const FALLBACK: &[(&str, TechCategory, &str)] = &[
    ("React", Frontend, "react"),
    ("Next.js", Frontend, "nextjs"),
    ("Vue.js", Frontend, "vuejs"),
    ("Nuxt.js", Frontend, "nuxtjs"),
    ("Angular", Frontend, "angularjs"),
    ("Svelte", Frontend, "svelte"),
    ("Gatsby", Frontend, "gatsby"),
    ("Tailwind CSS", Frontend, "tailwindcss"),
    ("Node.js", Backend, "nodejs"),
    ("Express.js", Backend, "express"),
    ("NestJS", Backend, "nestjs"),
    ("Django", Backend, "django"),
    ("Flask", Backend, "flask"),
    ("FastAPI", Backend, "fastapi"),
    ("Spring Boot", Backend, "spring"),
    ("Ruby on Rails", Backend, "rails"),
    ("Go", Backend, "go"),
    ("ASP.NET Core", Backend, "dotnetcore"),
    ("Laravel", Backend, "laravel"),
    ("GraphQL", Backend, "graphql"),
    ("PostgreSQL", Database, "postgresql"),
    ("MySQL", Database, "mysql"),
    ("MongoDB", Database, "mongodb"),
    ("SQLite", Database, "sqlite"),
    ("DynamoDB", Database, "dynamodb"),
    ("Cassandra", Database, "cassandra"),
    ("Supabase", Database, "supabase"),
    ("Firebase", Database, "firebase"),
    ("Elasticsearch", Database, "elasticsearch"),
    ("Redis", Database, "redis"),
    ("Memcached", Database, ""),
    ("Apache Kafka", Backend, "apachekafka"),
    ("Apache Spark", Backend, "apachespark"),
    ("Apache Airflow", Backend, "apacheairflow"),
    ("RabbitMQ", Backend, "rabbitmq"),
    ("Docker", Devops, "docker"),
    ("Kubernetes", Devops, "kubernetes"),
    ("Nginx", Devops, "nginx"),
    ("HAProxy", Devops, ""),
    ("Traefik", Devops, "traefikproxy"),
    ("GitHub Actions", Devops, "githubactions"),
    ("Terraform", Devops, "terraform"),
    ("AWS", Cloud, "amazonwebservices"),
    ("Google Cloud", Cloud, "googlecloud"),
    ("Azure", Cloud, "azure"),
    ("Vercel", Cloud, "vercel"),
    ("Netlify", Cloud, "netlify"),
    ("Auth0", Security, ""),
    ("NextAuth.js", Security, ""),
    ("Clerk", Security, ""),
    ("Keycloak", Security, ""),
    ("JWT", Security, ""),
    ("OAuth", Security, "oauth"),
    ("Passport.js", Security, ""),
    ("HTTPS", Security, ""),
    ("TLS/SSL", Security, ""),
    ("React Native", Mobile, "react"),
    ("Flutter", Mobile, "flutter"),
    ("Jest", Testing, "jest"),
    ("Cypress", Testing, "cypressio"),
    ("Playwright", Testing, "playwright"),
];

/// The hard-coded catalog used when the remote catalog is unavailable.
#[must_use]
pub fn fallback_catalog() -> Vec<Technology> {
    FALLBACK
        .iter()
        .map(|(name, category, slug)| Technology::new(*name, *category, icon_url(slug)))
        .collect()
}

/// Find a technology by exact name in a catalog.
#[must_use]
pub fn find_technology<'a>(catalog: &'a [Technology], name: &str) -> Option<&'a Technology> {
    catalog.iter().find(|t| t.name == name)
}
