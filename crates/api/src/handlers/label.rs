//! Handlers for project labels.

use annolab_core::error::CoreError;
use annolab_core::label::{validate_color_hex, validate_shortcut};
use annolab_core::types::DbId;
use annolab_db::models::label::CreateLabel;
use annolab_db::repositories::{LabelRepo, SpanAnnotationRepo};
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

/// GET /projects/{project_id}/labels
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let labels = LabelRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: labels }))
}

/// POST /projects/{project_id}/labels
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateLabel>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;

    validate_shortcut(input.prefix_key.as_deref(), input.suffix_key.as_deref())
        .map_err(AppError::Core)?;
    if let Some(color) = &input.background_color {
        validate_color_hex(color).map_err(AppError::Core)?;
    }
    if let Some(color) = &input.text_color {
        validate_color_hex(color).map_err(AppError::Core)?;
    }

    // Each shortcut can only be assigned to one label per project.
    if input.prefix_key.is_some() || input.suffix_key.is_some() {
        let taken = LabelRepo::shortcut_exists(
            &state.pool,
            project_id,
            input.prefix_key.as_deref(),
            input.suffix_key.as_deref(),
        )
        .await?;
        if taken {
            return Err(AppError::Core(CoreError::Conflict(
                "A label with this shortcut already exists in the project".to_string(),
            )));
        }
    }

    let label = LabelRepo::create(&state.pool, project_id, &input).await?;

    tracing::info!(project_id, label_id = label.id, text = %label.text, "Label created");
    state.event_bus.publish(
        DomainEvent::new("label.created")
            .with_entity("label", label.id)
            .with_payload(json!({ "project_id": project_id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: label })))
}

/// DELETE /projects/{project_id}/labels/{id}
///
/// Deleting a label cascades to every span annotation using it (and
/// through them, their connections), so the concordance of each
/// affected document is recomputed afterwards.
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let label = LabelRepo::find_by_id(&state.pool, id).await?;
    let Some(label) = label.filter(|l| l.project_id == project_id) else {
        return Err(AppError::Core(CoreError::NotFound { entity: "label", id }));
    };

    // Snapshot the affected documents before the cascade erases the link.
    let affected = SpanAnnotationRepo::document_ids_by_label(&state.pool, id).await?;

    LabelRepo::delete(&state.pool, id).await?;

    for document_id in affected {
        log_recompute_failure(
            state.concord.on_span_annotation_changed(document_id).await,
            "label.deleted",
        );
        log_recompute_failure(
            state.concord.on_connection_changed(document_id).await,
            "label.deleted",
        );
    }

    tracing::info!(project_id, label_id = id, text = %label.text, "Label deleted");
    state.event_bus.publish(
        DomainEvent::new("label.deleted")
            .with_entity("label", id)
            .with_payload(json!({ "project_id": project_id })),
    );

    Ok(StatusCode::NO_CONTENT)
}
