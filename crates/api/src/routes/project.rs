//! Route definitions for the `/projects` resource.
//!
//! Also nests document, label, and relation type collection routes
//! under `/projects/{project_id}/...`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{document, label, project, relation_type};
use crate::state::AppState;

/// Routes mounted at `/projects`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{project_id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route(
            "/{project_id}/documents",
            get(document::list_by_project).post(document::create),
        )
        .route(
            "/{project_id}/labels",
            get(label::list_by_project).post(label::create),
        )
        .route("/{project_id}/labels/{id}", delete(label::delete))
        .route(
            "/{project_id}/relation-types",
            get(relation_type::list_by_project).post(relation_type::create),
        )
        .route(
            "/{project_id}/relation-types/{id}",
            delete(relation_type::delete),
        )
}
