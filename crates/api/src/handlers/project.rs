//! Handlers for the `/projects` resource.

use annolab_core::error::CoreError;
use annolab_core::types::DbId;
use annolab_db::models::project::{CreateProject, UpdateProject};
use annolab_db::repositories::ProjectRepo;
use annolab_events::DomainEvent;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Return an error unless the project exists.
pub async fn ensure_project_exists(pool: &annolab_db::DbPool, id: DbId) -> AppResult<()> {
    if ProjectRepo::find_by_id(pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "project",
            id,
        }));
    }
    Ok(())
}

/// GET /projects
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".to_string(),
        )));
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;

    tracing::info!(project_id = project.id, name = %project.name, "Project created");
    state
        .event_bus
        .publish(DomainEvent::new("project.created").with_entity("project", project.id));

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /projects/{project_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id: project_id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /projects/{project_id}
pub async fn update(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::update(&state.pool, project_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id: project_id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /projects/{project_id}
pub async fn delete(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ProjectRepo::delete(&state.pool, project_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "project",
            id: project_id,
        }));
    }

    tracing::info!(project_id, "Project deleted");
    state
        .event_bus
        .publish(DomainEvent::new("project.deleted").with_entity("project", project_id));

    Ok(StatusCode::NO_CONTENT)
}
