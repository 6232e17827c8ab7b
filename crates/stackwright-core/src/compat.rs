//! # Compatibility Table
//!
//! Static reference data listing which technologies are known to work well
//! together, plus the recognized technology families the rule engine scores
//! against.
//!
//! Lookups are by exact technology name: "MongoDB" matches, "mongodb" does
//! not. A technology without an entry has no opinion attached to it.

use serde::Serialize;

/// What the table knows about one source technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityEntry {
    pub name: &'static str,
    /// Targets this technology is known to pair with.
    pub compatible_with: &'static [&'static str],
    pub alternatives: &'static [&'static str],
    pub best_practices: &'static [&'static str],
    pub common_issues: &'static [&'static str],
}

impl CompatibilityEntry {
    /// Whether `target` is listed as a compatible technology.
    #[must_use]
    pub fn is_compatible_with(&self, target: &str) -> bool {
        self.compatible_with.contains(&target)
    }
}

/// Look up a technology by exact name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static CompatibilityEntry> {
    COMPATIBILITY_TABLE.iter().find(|e| e.name == name)
}

/// Whether an edge `source -> target` is table-compatible.
///
/// Unknown sources are never compatible.
#[must_use]
pub fn is_compatible(source: &str, target: &str) -> bool {
    lookup(source).is_some_and(|e| e.is_compatible_with(target))
}

// =============================================================================
// TECHNOLOGY FAMILIES
// =============================================================================

/// Database technologies.
pub const DATABASES: &[&str] = &[
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "SQLite",
    "DynamoDB",
    "Cassandra",
    "Supabase",
    "Firebase",
    "Elasticsearch",
    "Snowflake",
];

/// Backend runtimes and frameworks.
pub const BACKENDS: &[&str] = &[
    "Node.js",
    "Express.js",
    "NestJS",
    "Django",
    "Flask",
    "FastAPI",
    "Spring Boot",
    "Ruby on Rails",
    "Go",
    "ASP.NET Core",
    "Laravel",
];

/// Frontend frameworks.
pub const FRONTENDS: &[&str] = &[
    "React",
    "Next.js",
    "Vue.js",
    "Nuxt.js",
    "Angular",
    "Svelte",
    "Gatsby",
];

/// Authentication providers and mechanisms.
pub const AUTH_PROVIDERS: &[&str] = &[
    "Auth0",
    "NextAuth.js",
    "Firebase Auth",
    "Clerk",
    "Keycloak",
    "JWT",
    "OAuth",
    "Passport.js",
    "Okta",
    "Supabase Auth",
];

/// Caching layers.
pub const CACHES: &[&str] = &["Redis", "Memcached", "Varnish"];

/// Load balancers and reverse proxies.
pub const LOAD_BALANCERS: &[&str] = &["Nginx", "HAProxy", "Traefik", "AWS ELB", "Envoy"];

/// Whether `name` belongs to `family`.
#[must_use]
pub fn in_family(family: &[&str], name: &str) -> bool {
    family.contains(&name)
}

// =============================================================================
// TABLE
// =============================================================================

/// The compatibility table. Process-wide constant.
pub static COMPATIBILITY_TABLE: &[CompatibilityEntry] = &[
    // ---- frontend -----------------------------------------------------------
    CompatibilityEntry {
        name: "React",
        compatible_with: &[
            "Next.js",
            "Node.js",
            "Express.js",
            "NestJS",
            "GraphQL",
            "Redux",
            "Tailwind CSS",
            "TypeScript",
            "Vercel",
            "Netlify",
            "Firebase",
            "Supabase",
            "Auth0",
            "Clerk",
            "Jest",
            "Cypress",
        ],
        alternatives: &["Vue.js", "Svelte", "Angular"],
        best_practices: &[
            "Use functional components with hooks",
            "Memoize expensive subtrees with React.memo and useMemo",
            "Keep data access behind an API instead of talking to databases directly",
        ],
        common_issues: &["Prop drilling in deep component trees", "Unnecessary re-renders"],
    },
    CompatibilityEntry {
        name: "Next.js",
        compatible_with: &[
            "React",
            "Node.js",
            "Vercel",
            "PostgreSQL",
            "MongoDB",
            "Redis",
            "Supabase",
            "Prisma",
            "NextAuth.js",
            "Auth0",
            "Clerk",
            "Tailwind CSS",
            "TypeScript",
        ],
        alternatives: &["Nuxt.js", "Remix", "Gatsby"],
        best_practices: &[
            "Prefer server components for data fetching",
            "Use incremental static regeneration for content pages",
        ],
        common_issues: &["Hydration mismatches", "Large client bundles from server-only code"],
    },
    CompatibilityEntry {
        name: "Vue.js",
        compatible_with: &[
            "Nuxt.js",
            "Node.js",
            "Express.js",
            "Laravel",
            "Django",
            "FastAPI",
            "Firebase",
            "Netlify",
            "Vercel",
            "Tailwind CSS",
            "TypeScript",
        ],
        alternatives: &["React", "Svelte", "Angular"],
        best_practices: &[
            "Use the Composition API for shared logic",
            "Manage global state with Pinia",
        ],
        common_issues: &["Reactivity caveats with nested objects"],
    },
    CompatibilityEntry {
        name: "Angular",
        compatible_with: &[
            "Node.js",
            "Express.js",
            "NestJS",
            "Spring Boot",
            "ASP.NET Core",
            "Firebase",
            "TypeScript",
        ],
        alternatives: &["React", "Vue.js"],
        best_practices: &[
            "Use OnPush change detection",
            "Lazy-load feature modules",
        ],
        common_issues: &["Large initial bundle", "Steep learning curve"],
    },
    CompatibilityEntry {
        name: "Svelte",
        compatible_with: &[
            "Node.js",
            "Express.js",
            "Vercel",
            "Netlify",
            "Supabase",
            "Tailwind CSS",
            "TypeScript",
        ],
        alternatives: &["React", "Vue.js"],
        best_practices: &["Use SvelteKit for routing and server rendering"],
        common_issues: &["Smaller ecosystem of component libraries"],
    },
    // ---- backend ------------------------------------------------------------
    CompatibilityEntry {
        name: "Node.js",
        compatible_with: &[
            "Express.js",
            "NestJS",
            "MongoDB",
            "PostgreSQL",
            "MySQL",
            "Redis",
            "GraphQL",
            "RabbitMQ",
            "Apache Kafka",
            "Docker",
            "Jest",
        ],
        alternatives: &["Go", "Python", "Deno"],
        best_practices: &[
            "Never block the event loop with CPU-heavy work",
            "Use environment variables for configuration",
        ],
        common_issues: &["Callback and promise error handling gaps", "Memory leaks in long-lived processes"],
    },
    CompatibilityEntry {
        name: "Express.js",
        compatible_with: &[
            "Node.js",
            "React",
            "Vue.js",
            "MongoDB",
            "PostgreSQL",
            "MySQL",
            "Redis",
            "GraphQL",
            "Passport.js",
            "JWT",
            "Docker",
            "Nginx",
        ],
        alternatives: &["NestJS", "Fastify", "Koa"],
        best_practices: &[
            "Use helmet and rate limiting middleware",
            "Centralize error handling in one middleware",
            "Validate request bodies at the boundary",
        ],
        common_issues: &["Unstructured growth of route handlers"],
    },
    CompatibilityEntry {
        name: "NestJS",
        compatible_with: &[
            "Node.js",
            "PostgreSQL",
            "MongoDB",
            "MySQL",
            "Redis",
            "GraphQL",
            "RabbitMQ",
            "Apache Kafka",
            "JWT",
            "Docker",
        ],
        alternatives: &["Express.js", "Spring Boot"],
        best_practices: &["Keep modules small and feature-scoped", "Use DTOs with validation pipes"],
        common_issues: &["Circular module dependencies"],
    },
    CompatibilityEntry {
        name: "Django",
        compatible_with: &[
            "PostgreSQL",
            "MySQL",
            "SQLite",
            "Redis",
            "Celery",
            "React",
            "Vue.js",
            "Docker",
            "Nginx",
        ],
        alternatives: &["FastAPI", "Flask", "Ruby on Rails"],
        best_practices: &["Use select_related to avoid N+1 queries", "Keep settings per environment"],
        common_issues: &["Synchronous ORM in async views"],
    },
    CompatibilityEntry {
        name: "Flask",
        compatible_with: &["PostgreSQL", "MySQL", "SQLite", "Redis", "Docker", "Nginx"],
        alternatives: &["FastAPI", "Django"],
        best_practices: &["Use application factories and blueprints"],
        common_issues: &["No built-in structure for larger apps"],
    },
    CompatibilityEntry {
        name: "FastAPI",
        compatible_with: &[
            "PostgreSQL",
            "MongoDB",
            "Redis",
            "Apache Kafka",
            "JWT",
            "OAuth",
            "Docker",
            "Kubernetes",
            "Nginx",
        ],
        alternatives: &["Flask", "Django", "Express.js"],
        best_practices: &["Declare request and response models with Pydantic", "Use async database drivers"],
        common_issues: &["Blocking calls inside async endpoints"],
    },
    CompatibilityEntry {
        name: "Spring Boot",
        compatible_with: &[
            "PostgreSQL",
            "MySQL",
            "MongoDB",
            "Redis",
            "Apache Kafka",
            "RabbitMQ",
            "Keycloak",
            "Docker",
            "Kubernetes",
        ],
        alternatives: &["Quarkus", "Micronaut", "NestJS"],
        best_practices: &["Use constructor injection", "Externalize configuration with profiles"],
        common_issues: &["Slow startup", "High memory footprint"],
    },
    CompatibilityEntry {
        name: "Ruby on Rails",
        compatible_with: &["PostgreSQL", "MySQL", "Redis", "Docker", "Nginx"],
        alternatives: &["Django", "Laravel"],
        best_practices: &["Move background work to Sidekiq jobs"],
        common_issues: &["N+1 queries through lazy associations"],
    },
    // ---- data ---------------------------------------------------------------
    CompatibilityEntry {
        name: "PostgreSQL",
        compatible_with: &["Redis", "Docker", "Kubernetes", "AWS", "Supabase"],
        alternatives: &["MySQL", "CockroachDB"],
        best_practices: &["Index foreign keys", "Use connection pooling"],
        common_issues: &["Table bloat without regular vacuuming"],
    },
    CompatibilityEntry {
        name: "MongoDB",
        compatible_with: &["Node.js", "Express.js", "Redis", "Docker", "AWS"],
        alternatives: &["PostgreSQL", "DynamoDB", "Couchbase"],
        best_practices: &["Design schemas around query patterns", "Create indexes for frequent filters"],
        common_issues: &["Unbounded document growth", "Missing transactions across collections"],
    },
    CompatibilityEntry {
        name: "MySQL",
        compatible_with: &["Redis", "Docker", "AWS"],
        alternatives: &["PostgreSQL", "MariaDB"],
        best_practices: &["Use InnoDB and utf8mb4"],
        common_issues: &["Replication lag under heavy writes"],
    },
    CompatibilityEntry {
        name: "Redis",
        compatible_with: &["Docker", "Kubernetes", "AWS"],
        alternatives: &["Memcached", "KeyDB"],
        best_practices: &["Set TTLs on cache keys", "Configure an eviction policy"],
        common_issues: &["Data loss without persistence configured"],
    },
    CompatibilityEntry {
        name: "Apache Kafka",
        compatible_with: &[
            "Apache Spark",
            "Apache Flink",
            "PostgreSQL",
            "Elasticsearch",
            "Spring Boot",
            "Docker",
            "Kubernetes",
        ],
        alternatives: &["RabbitMQ", "Apache Pulsar", "Amazon Kinesis"],
        best_practices: &["Choose partition keys for even load", "Use a schema registry"],
        common_issues: &["Consumer lag", "Operational overhead of the cluster"],
    },
    CompatibilityEntry {
        name: "Apache Spark",
        compatible_with: &[
            "Apache Kafka",
            "Apache Airflow",
            "PostgreSQL",
            "Snowflake",
            "Amazon S3",
            "Delta Lake",
        ],
        alternatives: &["Apache Flink", "Dask"],
        best_practices: &["Avoid wide shuffles", "Cache reused DataFrames"],
        common_issues: &["Skewed partitions", "Driver out-of-memory errors"],
    },
    CompatibilityEntry {
        name: "Apache Airflow",
        compatible_with: &["Apache Spark", "PostgreSQL", "Snowflake", "Docker", "Kubernetes"],
        alternatives: &["Dagster", "Prefect"],
        best_practices: &["Keep tasks idempotent", "Keep heavy work out of the scheduler"],
        common_issues: &["Top-level code slowing DAG parsing"],
    },
    CompatibilityEntry {
        name: "GraphQL",
        compatible_with: &["React", "Node.js", "Apollo", "PostgreSQL", "MongoDB"],
        alternatives: &["REST", "gRPC", "tRPC"],
        best_practices: &["Batch resolvers with DataLoader", "Limit query depth"],
        common_issues: &["N+1 resolver queries"],
    },
    // ---- platform -----------------------------------------------------------
    CompatibilityEntry {
        name: "Docker",
        compatible_with: &[
            "Kubernetes",
            "GitHub Actions",
            "AWS",
            "Google Cloud",
            "Azure",
            "Nginx",
            "Traefik",
        ],
        alternatives: &["Podman"],
        best_practices: &["Use multi-stage builds", "Run containers as non-root"],
        common_issues: &["Bloated images"],
    },
    CompatibilityEntry {
        name: "Kubernetes",
        compatible_with: &["Docker", "AWS", "Google Cloud", "Azure", "Nginx", "Traefik", "Terraform"],
        alternatives: &["Docker Swarm", "Nomad"],
        best_practices: &["Set resource requests and limits", "Define liveness and readiness probes"],
        common_issues: &["Configuration sprawl"],
    },
    CompatibilityEntry {
        name: "Nginx",
        compatible_with: &[
            "Node.js",
            "Express.js",
            "Django",
            "Flask",
            "FastAPI",
            "Ruby on Rails",
            "Spring Boot",
            "Docker",
            "Let's Encrypt",
        ],
        alternatives: &["HAProxy", "Traefik", "Caddy"],
        best_practices: &["Terminate TLS at the proxy", "Enable gzip compression"],
        common_issues: &["Misconfigured proxy headers"],
    },
    CompatibilityEntry {
        name: "AWS",
        compatible_with: &["Docker", "Kubernetes", "Terraform", "PostgreSQL", "DynamoDB", "Redis"],
        alternatives: &["Google Cloud", "Azure"],
        best_practices: &["Apply least-privilege IAM policies", "Tag resources for cost tracking"],
        common_issues: &["Unexpected costs"],
    },
    CompatibilityEntry {
        name: "Vercel",
        compatible_with: &["Next.js", "React", "Svelte", "Vue.js"],
        alternatives: &["Netlify", "Cloudflare Pages"],
        best_practices: &["Use preview deployments for pull requests"],
        common_issues: &["Serverless function timeouts"],
    },
    CompatibilityEntry {
        name: "Firebase",
        compatible_with: &["React", "Vue.js", "Angular", "Flutter", "React Native"],
        alternatives: &["Supabase", "AWS Amplify"],
        best_practices: &["Write security rules before launch"],
        common_issues: &["Vendor lock-in", "Costly unbounded reads"],
    },
    CompatibilityEntry {
        name: "Auth0",
        compatible_with: &["React", "Next.js", "Vue.js", "Angular", "Node.js", "Express.js"],
        alternatives: &["Clerk", "Keycloak", "Firebase Auth"],
        best_practices: &["Validate tokens on the backend", "Use refresh token rotation"],
        common_issues: &["Pricing at scale"],
    },
    // ---- mobile -------------------------------------------------------------
    CompatibilityEntry {
        name: "React Native",
        compatible_with: &["Firebase", "Node.js", "Express.js", "GraphQL", "Redux"],
        alternatives: &["Flutter"],
        best_practices: &["Use FlatList for long lists"],
        common_issues: &["Native module version drift"],
    },
    CompatibilityEntry {
        name: "Flutter",
        compatible_with: &["Firebase", "Supabase", "Node.js"],
        alternatives: &["React Native"],
        best_practices: &["Keep widgets small and const where possible"],
        common_issues: &["Large app binaries"],
    },
];

// =============================================================================
// TESTS
// =============================================================================
