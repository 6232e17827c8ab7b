//! # Stackwright CLI Module
//!
//! This module implements the CLI interface for Stackwright.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `validate` - Validate a stack JSON file (locally or remotely)
//! - `stacks` - List saved stacks
//! - `save` - Import a stack JSON file into the saved stacks
//! - `delete` - Delete a saved stack
//! - `export` - Export a saved stack to a JSON file
//! - `templates` - List built-in templates
//! - `catalog` - Show the technology palette

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use stackwright_core::StackError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Stackwright - Tech Stack Architect
///
/// Compose a technology stack as a graph, check it against compatibility
/// rules and keep the stacks worth keeping.
#[derive(Parser, Debug)]
#[command(name = "stackwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML config file (default: ./stackwright.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the saved-stacks database (overrides storage.path)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides server.host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate a stack JSON file
    Validate {
        /// Path to the stack file
        #[arg(short, long)]
        file: PathBuf,

        /// Ask the remote model instead of the local rules
        #[arg(long)]
        remote: bool,
    },

    /// List saved stacks
    Stacks,

    /// Save a stack JSON file into the library
    Save {
        /// Path to the stack file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a saved stack
    Delete {
        /// Stack id
        id: String,
    },

    /// Export a saved stack to a JSON file
    Export {
        /// Stack id
        id: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List built-in templates
    Templates,

    /// Show the technology palette
    Catalog,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), StackError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.storage.path = database;
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(&config).await
        }
        Some(Commands::Validate { file, remote }) => {
            cmd_validate(&config, json_mode, &file, remote).await
        }
        Some(Commands::Stacks) => cmd_stacks(&config, json_mode),
        Some(Commands::Save { file }) => cmd_save(&config, json_mode, &file),
        Some(Commands::Delete { id }) => cmd_delete(&config, json_mode, &id),
        Some(Commands::Export { id, output }) => cmd_export(&config, &id, &output),
        Some(Commands::Templates) => cmd_templates(json_mode),
        Some(Commands::Catalog) => cmd_catalog(&config, json_mode).await,
        None => {
            // No subcommand - list saved stacks by default
            cmd_stacks(&config, json_mode)
        }
    }
}
