//! Route definitions for the `/documents` resource.
//!
//! Span annotation and connection collection routes are nested under
//! `/documents/{document_id}/...`; their mutations drive the
//! concordance recomputation cascade.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{connection, document, span_annotation};
use crate::state::AppState;

/// Routes mounted at `/documents`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{document_id}",
            get(document::get_by_id).delete(document::delete),
        )
        .route(
            "/{document_id}/annotations",
            get(span_annotation::list_by_document).post(span_annotation::create),
        )
        .route(
            "/{document_id}/annotations/{id}",
            delete(span_annotation::delete),
        )
        .route(
            "/{document_id}/connections",
            get(connection::list_by_document).post(connection::create),
        )
        .route(
            "/{document_id}/connections/{id}",
            delete(connection::delete),
        )
}
