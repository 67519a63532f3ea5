//! Handlers for the `/documents` resource.
//!
//! Document create/delete are concordance triggers: both re-roll the
//! owning project's scores.

use annolab_core::error::CoreError;
use annolab_core::types::DbId;
use annolab_db::models::document::{CreateDocument, Document};
use annolab_db::repositories::DocumentRepo;
use annolab_events::DomainEvent;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{log_recompute_failure, project::ensure_project_exists};
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a document or fail with 404.
pub async fn fetch_document(pool: &annolab_db::DbPool, id: DbId) -> AppResult<Document> {
    DocumentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "document",
            id,
        }))
}

/// GET /projects/{project_id}/documents
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let documents = DocumentRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// POST /projects/{project_id}/documents
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;

    let document = DocumentRepo::create(&state.pool, project_id, &input).await?;

    log_recompute_failure(
        state.concord.on_document_changed(project_id).await,
        "document.created",
    );

    tracing::info!(project_id, document_id = document.id, "Document created");
    state.event_bus.publish(
        DomainEvent::new("document.created")
            .with_entity("document", document.id)
            .with_payload(json!({ "project_id": project_id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /documents/{document_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = fetch_document(&state.pool, document_id).await?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /documents/{document_id}
pub async fn delete(
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Resolve the owning project before the row disappears.
    let document = fetch_document(&state.pool, document_id).await?;

    DocumentRepo::delete(&state.pool, document_id).await?;

    log_recompute_failure(
        state.concord.on_document_changed(document.project_id).await,
        "document.deleted",
    );

    tracing::info!(
        project_id = document.project_id,
        document_id,
        "Document deleted"
    );
    state.event_bus.publish(
        DomainEvent::new("document.deleted")
            .with_entity("document", document_id)
            .with_payload(json!({ "project_id": document.project_id })),
    );

    Ok(StatusCode::NO_CONTENT)
}
