//! Handlers for connections (relation instances).
//!
//! Creates and deletes are concordance triggers: the document's
//! relation score is rebuilt inline, and the project rollup follows in
//! the same pass.

use annolab_core::error::CoreError;
use annolab_core::types::DbId;
use annolab_db::models::connection::CreateConnection;
use annolab_db::models::span_annotation::SpanAnnotation;
use annolab_db::repositories::{ConnectionRepo, RelationTypeRepo, SpanAnnotationRepo};
use annolab_events::DomainEvent;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{document::fetch_document, log_recompute_failure};
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch an endpoint span and check it belongs to the document.
async fn fetch_endpoint(
    pool: &annolab_db::DbPool,
    document_id: DbId,
    span_id: DbId,
    role: &str,
) -> AppResult<SpanAnnotation> {
    let span = SpanAnnotationRepo::find_by_id(pool, span_id).await?;
    match span {
        None => Err(AppError::Core(CoreError::Validation(format!(
            "{role} span {span_id} does not exist"
        )))),
        Some(span) if span.document_id != document_id => {
            Err(AppError::Core(CoreError::Validation(format!(
                "{role} span {span_id} belongs to a different document"
            ))))
        }
        Some(span) => Ok(span),
    }
}

/// GET /documents/{document_id}/connections
pub async fn list_by_document(
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    fetch_document(&state.pool, document_id).await?;
    let connections = ConnectionRepo::list_by_document(&state.pool, document_id).await?;
    Ok(Json(DataResponse { data: connections }))
}

/// POST /documents/{document_id}/connections
pub async fn create(
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<CreateConnection>,
) -> AppResult<impl IntoResponse> {
    let document = fetch_document(&state.pool, document_id).await?;

    let source = fetch_endpoint(&state.pool, document_id, input.source_id, "source").await?;
    fetch_endpoint(&state.pool, document_id, input.target_id, "target").await?;

    if let Some(relation_type_id) = input.relation_type_id {
        let relation_type = RelationTypeRepo::find_by_id(&state.pool, relation_type_id).await?;
        if relation_type
            .filter(|r| r.project_id == document.project_id)
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Relation type {relation_type_id} does not exist in this project"
            ))));
        }
    }

    let connection = ConnectionRepo::create(&state.pool, document_id, &input).await?;

    log_recompute_failure(
        state.concord.on_connection_changed(document_id).await,
        "connection.created",
    );

    tracing::info!(
        document_id,
        connection_id = connection.id,
        source_id = connection.source_id,
        target_id = connection.target_id,
        "Connection created"
    );
    state.event_bus.publish(
        DomainEvent::new("connection.created")
            .with_entity("connection", connection.id)
            // The connection's annotator is the source span's annotator.
            .with_actor(source.annotator_id)
            .with_payload(json!({ "document_id": document_id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: connection })))
}

/// DELETE /documents/{document_id}/connections/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((document_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let connection = ConnectionRepo::find_by_id(&state.pool, id).await?;
    if connection.filter(|c| c.document_id == document_id).is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "connection",
            id,
        }));
    }

    ConnectionRepo::delete(&state.pool, id).await?;

    log_recompute_failure(
        state.concord.on_connection_changed(document_id).await,
        "connection.deleted",
    );

    tracing::info!(document_id, connection_id = id, "Connection deleted");
    state.event_bus.publish(
        DomainEvent::new("connection.deleted")
            .with_entity("connection", id)
            .with_payload(json!({ "document_id": document_id })),
    );

    Ok(StatusCode::NO_CONTENT)
}
