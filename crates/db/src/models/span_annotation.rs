//! Span annotation model and DTOs.

use annolab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `span_annotations` table.
///
/// Uniqueness over (document_id, annotator_id, label_id, start_offset,
/// end_offset) is enforced by the schema, so one annotator cannot submit
/// the same labeled span twice.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SpanAnnotation {
    pub id: DbId,
    pub document_id: DbId,
    pub annotator_id: DbId,
    pub label_id: DbId,
    pub start_offset: i32,
    pub end_offset: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new span annotation.
#[derive(Debug, Deserialize)]
pub struct CreateSpanAnnotation {
    pub annotator_id: DbId,
    pub label_id: DbId,
    pub start_offset: i32,
    pub end_offset: i32,
}
