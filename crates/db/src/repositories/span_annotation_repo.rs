//! Repository for the `span_annotations` table.

use annolab_core::types::DbId;
use sqlx::PgPool;

use crate::models::span_annotation::{CreateSpanAnnotation, SpanAnnotation};

/// Column list for span_annotations queries.
const COLUMNS: &str = "id, document_id, annotator_id, label_id, \
    start_offset, end_offset, created_at, updated_at";

/// Provides CRUD operations for span annotations.
pub struct SpanAnnotationRepo;

impl SpanAnnotationRepo {
    /// Insert a new span annotation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        document_id: DbId,
        input: &CreateSpanAnnotation,
    ) -> Result<SpanAnnotation, sqlx::Error> {
        let query = format!(
            "INSERT INTO span_annotations
                (document_id, annotator_id, label_id, start_offset, end_offset)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SpanAnnotation>(&query)
            .bind(document_id)
            .bind(input.annotator_id)
            .bind(input.label_id)
            .bind(input.start_offset)
            .bind(input.end_offset)
            .fetch_one(pool)
            .await
    }

    /// Find a span annotation by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SpanAnnotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM span_annotations WHERE id = $1");
        sqlx::query_as::<_, SpanAnnotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all annotations of a document, ordered by offset then
    /// annotator for stable output.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<SpanAnnotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM span_annotations
             WHERE document_id = $1
             ORDER BY start_offset ASC, end_offset ASC, annotator_id ASC"
        );
        sqlx::query_as::<_, SpanAnnotation>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// List one annotator's annotations on a document.
    pub async fn list_by_document_and_annotator(
        pool: &PgPool,
        document_id: DbId,
        annotator_id: DbId,
    ) -> Result<Vec<SpanAnnotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM span_annotations
             WHERE document_id = $1 AND annotator_id = $2
             ORDER BY start_offset ASC, end_offset ASC"
        );
        sqlx::query_as::<_, SpanAnnotation>(&query)
            .bind(document_id)
            .bind(annotator_id)
            .fetch_all(pool)
            .await
    }

    /// Distinct document IDs that have at least one annotation using
    /// `label_id`. Used to recompute affected documents before a label
    /// is deleted.
    pub async fn document_ids_by_label(
        pool: &PgPool,
        label_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT DISTINCT document_id
             FROM span_annotations
             WHERE label_id = $1
             ORDER BY document_id",
        )
        .bind(label_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Delete a span annotation by its ID, cascading to connections
    /// that use it as an endpoint. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM span_annotations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
