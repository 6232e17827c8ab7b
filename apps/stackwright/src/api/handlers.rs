//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every mutating editor endpoint answers with the full [`EditorResponse`]
//! so a client can redraw without a second round-trip.

use super::{
    AppState, SharedStore,
    types::{
        AddTechnologyRequest, AddTechnologyResponse, ConnectResponse, DeleteStackResponse,
        EdgeChangesRequest, EditorResponse, ErrorResponse, HealthResponse, HistoryStepResponse,
        NodeChangesRequest, RenameRequest, SaveStackResponse, TemplateRequest, TemplateSummary,
        ValidateRequest,
    },
};
use crate::remote::RemoteError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use stackwright_core::{
    Connection, Stack, StackError, StackId, StackLibrary, TEMPLATES, TechEdge, TechNode,
    find_technology,
    primitives::{MAX_STACK_EDGES, MAX_STACK_NODES},
    template, validate_stack,
};
use std::sync::Arc;

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Status code for a core error.
fn stack_error_status(e: &StackError) -> StatusCode {
    match e {
        StackError::NodeNotFound(_)
        | StackError::EdgeNotFound(_)
        | StackError::TemplateNotFound(_)
        | StackError::StackNotFound(_) => StatusCode::NOT_FOUND,
        StackError::DuplicateNode(_)
        | StackError::DuplicateEdge(_)
        | StackError::DuplicateConnection(_, _) => StatusCode::CONFLICT,
        StackError::SelfLoop(_)
        | StackError::DanglingEdge(_)
        | StackError::LimitExceeded(_)
        | StackError::DeserializationError(_) => StatusCode::BAD_REQUEST,
        StackError::SerializationError(_)
        | StackError::IoError(_)
        | StackError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn stack_error_response(e: &StackError) -> Response {
    (stack_error_status(e), Json(ErrorResponse::from(e))).into_response()
}

fn remote_error_response(e: &RemoteError) -> Response {
    let status = match e {
        RemoteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(ErrorResponse::new(e.to_string()))).into_response()
}

/// Run a library operation on the blocking pool.
///
/// redb reads and writes are synchronous file I/O; the library mutex is
/// taken on the blocking thread, never on an async worker.
async fn with_library<R, F>(state: &AppState, op: F) -> Result<R, StackError>
where
    R: Send + 'static,
    F: FnOnce(&mut StackLibrary<SharedStore>) -> R + Send + 'static,
{
    let library = Arc::clone(&state.library);
    tokio::task::spawn_blocking(move || {
        let mut guard = library.blocking_lock();
        op(&mut *guard)
    })
    .await
    .map_err(|e| StackError::IoError(format!("storage task failed: {e}")))
}

/// The graph a validation request targets: the posted one, or the live
/// editor graph when `editor` is set.
async fn validation_target(
    state: &AppState,
    request: ValidateRequest,
) -> (Vec<TechNode>, Vec<TechEdge>) {
    if request.editor {
        let snapshot = state.editor.read().await.snapshot();
        return (snapshot.nodes.clone(), snapshot.edges.clone());
    }
    (request.nodes, request.edges)
}

/// Reject graphs above the node/edge limits.
fn check_graph_size(nodes: usize, edges: usize) -> Result<(), StackError> {
    if nodes > MAX_STACK_NODES {
        return Err(StackError::LimitExceeded(format!(
            "{} nodes, maximum is {}",
            nodes, MAX_STACK_NODES
        )));
    }
    if edges > MAX_STACK_EDGES {
        return Err(StackError::LimitExceeded(format!(
            "{} edges, maximum is {}",
            edges, MAX_STACK_EDGES
        )));
    }
    Ok(())
}

// =============================================================================
// HEALTH / CATALOG / TEMPLATES
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// The technology palette.
pub async fn catalog_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.as_ref().clone())
}

pub async fn templates_handler() -> impl IntoResponse {
    let summaries: Vec<TemplateSummary> = TEMPLATES.iter().map(TemplateSummary::from).collect();
    Json(summaries)
}

// =============================================================================
// EDITOR HANDLERS
// =============================================================================

/// Current editor state.
pub async fn editor_handler(State(state): State<AppState>) -> impl IntoResponse {
    let editor = state.editor.read().await;
    Json(EditorResponse::from_editor(&editor))
}

/// Apply a batch of node changes.
pub async fn node_changes_handler(
    State(state): State<AppState>,
    Json(request): Json<NodeChangesRequest>,
) -> Response {
    let mut editor = state.editor.write().await;
    match editor.apply_node_changes(&request.changes) {
        Ok(_) => Json(EditorResponse::from_editor(&editor)).into_response(),
        Err(e) => stack_error_response(&e),
    }
}

/// Apply a batch of edge changes.
pub async fn edge_changes_handler(
    State(state): State<AppState>,
    Json(request): Json<EdgeChangesRequest>,
) -> Response {
    let mut editor = state.editor.write().await;
    match editor.apply_edge_changes(&request.changes) {
        Ok(_) => Json(EditorResponse::from_editor(&editor)).into_response(),
        Err(e) => stack_error_response(&e),
    }
}

/// Draw an edge between two nodes.
pub async fn connect_handler(
    State(state): State<AppState>,
    Json(connection): Json<Connection>,
) -> Response {
    let mut editor = state.editor.write().await;
    match editor.connect(&connection) {
        Ok(edge_id) => Json(ConnectResponse {
            edge_id,
            editor: EditorResponse::from_editor(&editor),
        })
        .into_response(),
        Err(e) => stack_error_response(&e),
    }
}

/// Drop a palette technology onto the canvas.
pub async fn add_technology_handler(
    State(state): State<AppState>,
    Json(request): Json<AddTechnologyRequest>,
) -> Response {
    let Some(technology) = find_technology(&state.catalog, &request.name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "Technology not in catalog: {}",
                request.name
            ))),
        )
            .into_response();
    };

    let mut editor = state.editor.write().await;
    match editor.add_technology(technology, request.position) {
        Ok(node_id) => Json(AddTechnologyResponse {
            node_id,
            editor: EditorResponse::from_editor(&editor),
        })
        .into_response(),
        Err(e) => stack_error_response(&e),
    }
}

pub async fn undo_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut editor = state.editor.write().await;
    let applied = editor.undo();
    Json(HistoryStepResponse {
        applied,
        editor: EditorResponse::from_editor(&editor),
    })
}

pub async fn redo_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut editor = state.editor.write().await;
    let applied = editor.redo();
    Json(HistoryStepResponse {
        applied,
        editor: EditorResponse::from_editor(&editor),
    })
}

/// Replace the editor content with a posted stack.
///
/// Edges with a missing endpoint are dropped and listed in `dropped_edges`.
pub async fn load_stack_handler(
    State(state): State<AppState>,
    Json(stack): Json<Stack>,
) -> Response {
    if let Err(e) = check_graph_size(stack.nodes.len(), stack.edges.len()) {
        return stack_error_response(&e);
    }
    let mut editor = state.editor.write().await;
    let dropped = editor.load_stack(stack);
    Json(EditorResponse::from_editor(&editor).with_dropped(dropped)).into_response()
}

pub async fn load_template_handler(
    State(state): State<AppState>,
    Json(request): Json<TemplateRequest>,
) -> Response {
    let Some(template) = template(&request.id) else {
        return stack_error_response(&StackError::TemplateNotFound(request.id));
    };
    let mut editor = state.editor.write().await;
    editor.load_template(template, Utc::now());
    tracing::info!(template = template.id, "Loaded template");
    Json(EditorResponse::from_editor(&editor)).into_response()
}

pub async fn new_stack_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut editor = state.editor.write().await;
    editor.new_stack(Utc::now());
    Json(EditorResponse::from_editor(&editor))
}

pub async fn rename_handler(
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> Response {
    let mut editor = state.editor.write().await;
    match editor.rename(&request.name) {
        Ok(()) => Json(EditorResponse::from_editor(&editor)).into_response(),
        Err(e) => stack_error_response(&e),
    }
}

// =============================================================================
// VALIDATION HANDLERS
// =============================================================================

/// Run the local rules on a posted graph.
///
/// An empty graph is validated as posted. `{"editor": true}` validates the
/// live editor graph.
pub async fn validate_handler(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    let (nodes, edges) = validation_target(&state, request).await;
    if let Err(e) = check_graph_size(nodes.len(), edges.len()) {
        return stack_error_response(&e);
    }
    Json(validate_stack(&nodes, &edges)).into_response()
}

/// Ask the remote model for an analysis.
///
/// Never fails: an unreachable or confused model yields the fallback report.
pub async fn validate_remote_handler(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    let (nodes, edges) = validation_target(&state, request).await;
    if let Err(e) = check_graph_size(nodes.len(), edges.len()) {
        return stack_error_response(&e);
    }
    let analysis = state.validator.analyze(&nodes, &edges).await;
    Json(analysis).into_response()
}

// =============================================================================
// SAVED STACK HANDLERS
// =============================================================================

pub async fn list_stacks_handler(State(state): State<AppState>) -> Response {
    match with_library(&state, |library| library.load_stacks()).await {
        Ok(stacks) => Json(stacks).into_response(),
        Err(e) => stack_error_response(&e),
    }
}

/// Save the live editor content under its id.
pub async fn save_stack_handler(State(state): State<AppState>) -> Response {
    let stack = state.editor.read().await.to_stack(Utc::now());
    let id = stack.id.clone();
    let success = match with_library(&state, move |library| library.save_stack(&stack)).await {
        Ok(success) => success,
        Err(e) => return stack_error_response(&e),
    };
    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(SaveStackResponse { success, id })).into_response()
}

/// Delete a saved stack. Deleting an unknown id succeeds.
pub async fn delete_stack_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = StackId::new(id);
    let success = match with_library(&state, move |library| library.delete_stack(&id)).await {
        Ok(success) => success,
        Err(e) => return stack_error_response(&e),
    };
    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(DeleteStackResponse { success })).into_response()
}

/// Open a saved stack in the editor.
pub async fn load_saved_stack_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = StackId::new(id);
    let lookup = id.clone();
    let stack = match with_library(&state, move |library| library.get_stack(&lookup)).await {
        Ok(Some(stack)) => stack,
        Ok(None) => return stack_error_response(&StackError::StackNotFound(id)),
        Err(e) => return stack_error_response(&e),
    };
    let mut editor = state.editor.write().await;
    let dropped = editor.load_stack(stack);
    Json(EditorResponse::from_editor(&editor).with_dropped(dropped)).into_response()
}

// =============================================================================
// GITHUB HANDLER
// =============================================================================

/// Public repositories of a GitHub user, most recently updated first.
pub async fn github_repos_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Response {
    match state.github.user_repos(&user).await {
        Ok(repos) => Json(repos).into_response(),
        Err(e) => {
            tracing::warn!(user = %user, error = %e, "GitHub request failed");
            remote_error_response(&e)
        }
    }
}
