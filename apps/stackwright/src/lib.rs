//! # Stackwright
//!
//! HTTP API and CLI around [`stackwright_core`].
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  apps/stackwright (THE BINARY)             │
//! │                                                            │
//! │  ┌───────────┐   ┌───────────┐   ┌──────────────────────┐  │
//! │  │   CLI     │   │ HTTP API  │   │  Remote clients      │  │
//! │  │  (clap)   │   │  (axum)   │   │  LLM / catalog / GH  │  │
//! │  └─────┬─────┘   └─────┬─────┘   └──────────┬───────────┘  │
//! │        └───────────────┼────────────────────┘              │
//! │                        ▼                                   │
//! │              ┌───────────────────┐                         │
//! │              │ stackwright-core  │                         │
//! │              └───────────────────┘                         │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod github;
pub mod remote;
