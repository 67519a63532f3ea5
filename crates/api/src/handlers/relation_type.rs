//! Handlers for project relation types.

use annolab_core::error::CoreError;
use annolab_core::label::validate_color_hex;
use annolab_core::types::DbId;
use annolab_db::models::relation_type::CreateRelationType;
use annolab_db::repositories::{ConnectionRepo, RelationTypeRepo};
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

/// GET /projects/{project_id}/relation-types
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let relation_types = RelationTypeRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse {
        data: relation_types,
    }))
}

/// POST /projects/{project_id}/relation-types
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRelationType>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;

    if let Some(color) = &input.color {
        validate_color_hex(color).map_err(AppError::Core)?;
    }

    let relation_type = RelationTypeRepo::create(&state.pool, project_id, &input).await?;

    tracing::info!(
        project_id,
        relation_type_id = relation_type.id,
        text = %relation_type.text,
        "Relation type created"
    );
    state.event_bus.publish(
        DomainEvent::new("relation_type.created")
            .with_entity("relation_type", relation_type.id)
            .with_payload(json!({ "project_id": project_id })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: relation_type,
        }),
    ))
}

/// DELETE /projects/{project_id}/relation-types/{id}
///
/// Connections of this type survive as untyped, which changes their
/// rating category, so the concordance of each affected document is
/// recomputed afterwards.
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let relation_type = RelationTypeRepo::find_by_id(&state.pool, id).await?;
    if relation_type.filter(|r| r.project_id == project_id).is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "relation type",
            id,
        }));
    }

    // Snapshot the affected documents before the type column is nulled.
    let affected = ConnectionRepo::document_ids_by_relation_type(&state.pool, id).await?;

    RelationTypeRepo::delete(&state.pool, id).await?;

    for document_id in affected {
        log_recompute_failure(
            state.concord.on_connection_changed(document_id).await,
            "relation_type.deleted",
        );
    }

    tracing::info!(project_id, relation_type_id = id, "Relation type deleted");
    state.event_bus.publish(
        DomainEvent::new("relation_type.deleted")
            .with_entity("relation_type", id)
            .with_payload(json!({ "project_id": project_id })),
    );

    Ok(StatusCode::NO_CONTENT)
}
