//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState};
use crate::catalog::{DEFAULT_CATALOG_TIMEOUT, fetch_catalog};
use crate::config::Config;
use crate::remote::RemoteValidator;
use stackwright_core::{
    MessageKind, RedbStore, Stack, StackError, StackId, StackLibrary, TEMPLATES,
    export_stack_json, import_stack_json, primitives::MAX_IMPORT_SIZE, validate_stack,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// FILE CHECKS
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StackError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StackError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StackError::LimitExceeded(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path and make sure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StackError> {
    let canonical = path.canonicalize().map_err(|e| {
        StackError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StackError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path against its (existing) parent directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, StackError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        StackError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(StackError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| StackError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Read and check a stack JSON file.
fn read_stack_file(path: &Path) -> Result<Stack, StackError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_IMPORT_SIZE as u64)?;
    let json = std::fs::read_to_string(&path)
        .map_err(|e| StackError::IoError(format!("Cannot read '{}': {}", path.display(), e)))?;
    import_stack_json(&json)
}

fn open_library(config: &Config) -> Result<StackLibrary<RedbStore>, StackError> {
    Ok(StackLibrary::new(RedbStore::open(&config.storage.path)?))
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config) -> Result<(), StackError> {
    let store = RedbStore::open(&config.storage.path)?;
    let catalog_timeout = config
        .catalog
        .timeout_secs
        .map_or(DEFAULT_CATALOG_TIMEOUT, Duration::from_secs);
    let catalog = fetch_catalog(config.catalog.url.as_deref(), catalog_timeout).await;
    let state = AppState::new(config, Box::new(store), catalog)
        .map_err(|e| StackError::InvalidConfig(e.to_string()))?;

    println!("Stackwright Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.server.host);
    println!("  Port:     {}", config.server.port);
    println!("  Database: {:?}", config.storage.path);
    println!("  Model:    {}", config.remote.model);
    println!();
    println!("Endpoints:");
    println!("  GET  /editor            - Live editor state");
    println!("  POST /editor/...        - Edit, undo, redo, load");
    println!("  POST /validate          - Local rule engine");
    println!("  POST /validate/remote   - Remote analysis");
    println!("  GET  /stacks            - Saved stacks");
    println!("  GET  /health            - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    api::run_server(&addr, state).await
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Validate a stack file with the local rules or the remote model.
pub async fn cmd_validate(
    config: &Config,
    json_mode: bool,
    file: &Path,
    remote: bool,
) -> Result<(), StackError> {
    let stack = read_stack_file(file)?;

    if remote {
        let validator = RemoteValidator::new(config.remote.clone())
            .map_err(|e| StackError::InvalidConfig(e.to_string()))?;
        let analysis = validator.analyze(&stack.nodes, &stack.edges).await;

        if json_mode {
            print_json(&serde_json::to_value(&analysis).unwrap_or_default());
            return Ok(());
        }

        println!("Remote Analysis: {}", stack.name);
        println!("================");
        println!("Valid:   {}", analysis.is_valid);
        println!("Message: {}", analysis.message);
        println!();
        println!("Overall:         {}", analysis.scores.overall);
        println!("Compatibility:   {}", analysis.scores.compatibility);
        println!("Scalability:     {}", analysis.scores.scalability);
        println!("Maintainability: {}", analysis.scores.maintainability);
        println!("Security:        {}", analysis.scores.security);
        println!("Performance:     {}", analysis.scores.performance);
        if !analysis.analysis.summary.is_empty() {
            println!();
            println!("{}", analysis.analysis.summary);
        }
        for conflict in &analysis.compatibility.conflicts {
            println!("  conflict: {}", conflict);
        }
        for improvement in &analysis.recommendations.improvements {
            println!("  improve:  {}", improvement);
        }
        return Ok(());
    }

    let report = validate_stack(&stack.nodes, &stack.edges);

    if json_mode {
        print_json(&serde_json::to_value(&report).unwrap_or_default());
        return Ok(());
    }

    println!("Validation: {}", stack.name);
    println!("===========");
    println!("Valid:   {}", report.is_valid);
    println!("Overall: {}/100", report.overall_score);
    println!();
    println!("Complexity:      {}", report.metrics.complexity);
    println!("Maintainability: {}", report.metrics.maintainability);
    println!("Scalability:     {}", report.metrics.scalability);
    println!("Security:        {}", report.metrics.security);
    println!("Performance:     {}", report.metrics.performance);
    if !report.messages.is_empty() {
        println!();
    }
    for message in &report.messages {
        let label = match message.kind {
            MessageKind::Error => "error",
            MessageKind::Warning => "warning",
            MessageKind::Info => "info",
        };
        println!("  [{}] {}", label, message.message);
    }

    Ok(())
}

// =============================================================================
// LIBRARY COMMANDS
// =============================================================================

/// List saved stacks.
pub fn cmd_stacks(config: &Config, json_mode: bool) -> Result<(), StackError> {
    let library = open_library(config)?;
    let stacks = library.load_stacks();

    if json_mode {
        print_json(&serde_json::to_value(&stacks).unwrap_or_default());
        return Ok(());
    }

    if stacks.is_empty() {
        println!("No saved stacks in {:?}", config.storage.path);
        return Ok(());
    }

    println!("Saved Stacks");
    println!("============");
    for stack in &stacks {
        println!(
            "{}  {}  ({} nodes, {} edges, updated {})",
            stack.id,
            stack.name,
            stack.nodes.len(),
            stack.edges.len(),
            stack.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Import a stack file into the library.
pub fn cmd_save(config: &Config, json_mode: bool, file: &Path) -> Result<(), StackError> {
    let stack = read_stack_file(file)?;
    let mut library = open_library(config)?;
    if !library.save_stack(&stack) {
        return Err(StackError::IoError(format!(
            "Could not save stack {}",
            stack.id
        )));
    }

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "id": stack.id }));
    } else {
        println!("Saved stack '{}' ({})", stack.name, stack.id);
    }
    Ok(())
}

/// Delete a saved stack.
pub fn cmd_delete(config: &Config, json_mode: bool, id: &str) -> Result<(), StackError> {
    let mut library = open_library(config)?;
    let id = StackId::new(id);
    let existed = library.get_stack(&id).is_some();
    if !library.delete_stack(&id) {
        return Err(StackError::IoError(format!("Could not delete stack {}", id)));
    }

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "existed": existed }));
    } else if existed {
        println!("Deleted stack {}", id);
    } else {
        println!("No saved stack {}", id);
    }
    Ok(())
}

/// Export a saved stack as a JSON file.
pub fn cmd_export(config: &Config, id: &str, output: &Path) -> Result<(), StackError> {
    let library = open_library(config)?;
    let id = StackId::new(id);
    let stack = library
        .get_stack(&id)
        .ok_or(StackError::StackNotFound(id))?;

    let output = validate_output_path(output)?;
    let json = export_stack_json(&stack)?;
    std::fs::write(&output, json)
        .map_err(|e| StackError::IoError(format!("Cannot write '{}': {}", output.display(), e)))?;

    println!("Exported '{}' to {:?}", stack.name, output);
    Ok(())
}

// =============================================================================
// TEMPLATES / CATALOG COMMANDS
// =============================================================================

pub fn cmd_templates(json_mode: bool) -> Result<(), StackError> {
    if json_mode {
        let templates: Vec<_> = TEMPLATES
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "name": t.name,
                    "description": t.description,
                    "node_count": t.node_count(),
                    "edge_count": t.edge_count(),
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(templates));
        return Ok(());
    }

    println!("Templates");
    println!("=========");
    for t in TEMPLATES {
        println!("{:<12} {} - {}", t.id, t.name, t.description);
    }
    Ok(())
}

/// Show the palette, fetched the same way the server does.
pub async fn cmd_catalog(config: &Config, json_mode: bool) -> Result<(), StackError> {
    let timeout = config
        .catalog
        .timeout_secs
        .map_or(DEFAULT_CATALOG_TIMEOUT, Duration::from_secs);
    let catalog = fetch_catalog(config.catalog.url.as_deref(), timeout).await;

    if json_mode {
        print_json(&serde_json::to_value(&catalog).unwrap_or_default());
        return Ok(());
    }

    println!("Technology Catalog");
    println!("==================");
    for tech in &catalog {
        println!("{:<12} {}", tech.category.as_str(), tech.name);
    }
    Ok(())
}
