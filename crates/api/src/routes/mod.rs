//! Route definitions for the `/api/v1` tree.

pub mod document;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                                        list, create
/// /projects/{project_id}                           get, update, delete
/// /projects/{project_id}/documents                 list, create
/// /projects/{project_id}/labels                    list, create
/// /projects/{project_id}/labels/{id}               delete
/// /projects/{project_id}/relation-types            list, create
/// /projects/{project_id}/relation-types/{id}       delete
///
/// /documents/{document_id}                         get, delete
/// /documents/{document_id}/annotations             list, create
/// /documents/{document_id}/annotations/{id}        delete
/// /documents/{document_id}/connections             list, create
/// /documents/{document_id}/connections/{id}        delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/documents", document::router())
}
