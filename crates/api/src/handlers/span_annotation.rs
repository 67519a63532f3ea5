//! Handlers for span annotations.
//!
//! Creates and deletes are concordance triggers: the document's entity
//! score is rebuilt inline, and the project rollup follows in the same
//! pass.

use annolab_core::annotation::validate_span_offsets;
use annolab_core::error::CoreError;
use annolab_core::types::DbId;
use annolab_db::models::span_annotation::CreateSpanAnnotation;
use annolab_db::repositories::{LabelRepo, SpanAnnotationRepo};
use annolab_events::DomainEvent;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{document::fetch_document, log_recompute_failure};
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional query filters for listing annotations.
#[derive(Debug, Deserialize)]
pub struct AnnotationListFilters {
    pub annotator_id: Option<DbId>,
}

/// GET /documents/{document_id}/annotations
pub async fn list_by_document(
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Query(filters): Query<AnnotationListFilters>,
) -> AppResult<impl IntoResponse> {
    fetch_document(&state.pool, document_id).await?;

    let annotations = match filters.annotator_id {
        Some(annotator_id) => {
            SpanAnnotationRepo::list_by_document_and_annotator(
                &state.pool,
                document_id,
                annotator_id,
            )
            .await?
        }
        None => SpanAnnotationRepo::list_by_document(&state.pool, document_id).await?,
    };
    Ok(Json(DataResponse { data: annotations }))
}

/// POST /documents/{document_id}/annotations
pub async fn create(
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<CreateSpanAnnotation>,
) -> AppResult<impl IntoResponse> {
    let document = fetch_document(&state.pool, document_id).await?;

    validate_span_offsets(input.start_offset, input.end_offset).map_err(AppError::Core)?;

    let label = LabelRepo::find_by_id(&state.pool, input.label_id).await?;
    match label {
        None => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Label {} does not exist",
                input.label_id
            ))))
        }
        Some(label) if label.project_id != document.project_id => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Label {} belongs to a different project",
                input.label_id
            ))))
        }
        Some(_) => {}
    }

    let annotation = SpanAnnotationRepo::create(&state.pool, document_id, &input).await?;

    log_recompute_failure(
        state.concord.on_span_annotation_changed(document_id).await,
        "span_annotation.created",
    );

    tracing::info!(
        document_id,
        annotation_id = annotation.id,
        annotator_id = annotation.annotator_id,
        label_id = annotation.label_id,
        "Span annotation created"
    );
    state.event_bus.publish(
        DomainEvent::new("span_annotation.created")
            .with_entity("span_annotation", annotation.id)
            .with_actor(annotation.annotator_id)
            .with_payload(json!({ "document_id": document_id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: annotation })))
}

/// DELETE /documents/{document_id}/annotations/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((document_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let annotation = SpanAnnotationRepo::find_by_id(&state.pool, id).await?;
    let Some(annotation) = annotation.filter(|a| a.document_id == document_id) else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "span annotation",
            id,
        }));
    };

    SpanAnnotationRepo::delete(&state.pool, id).await?;

    // The span's connections were cascade-deleted with it, so both the
    // entity and the relation score move.
    log_recompute_failure(
        state.concord.on_span_annotation_changed(document_id).await,
        "span_annotation.deleted",
    );
    log_recompute_failure(
        state.concord.on_connection_changed(document_id).await,
        "span_annotation.deleted",
    );

    tracing::info!(
        document_id,
        annotation_id = id,
        annotator_id = annotation.annotator_id,
        "Span annotation deleted"
    );
    state.event_bus.publish(
        DomainEvent::new("span_annotation.deleted")
            .with_entity("span_annotation", id)
            .with_actor(annotation.annotator_id)
            .with_payload(json!({ "document_id": document_id })),
    );

    Ok(StatusCode::NO_CONTENT)
}
