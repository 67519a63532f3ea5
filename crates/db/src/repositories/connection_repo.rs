//! Repository for the `connections` table.

use annolab_core::types::DbId;
use sqlx::PgPool;

use crate::models::connection::{Connection, ConnectionEndpoints, CreateConnection};

/// Column list for connections queries.
const COLUMNS: &str =
    "id, document_id, source_id, target_id, relation_type_id, created_at, updated_at";

/// Provides CRUD operations for connections.
pub struct ConnectionRepo;

impl ConnectionRepo {
    /// Insert a new connection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        document_id: DbId,
        input: &CreateConnection,
    ) -> Result<Connection, sqlx::Error> {
        let query = format!(
            "INSERT INTO connections (document_id, source_id, target_id, relation_type_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(document_id)
            .bind(input.source_id)
            .bind(input.target_id)
            .bind(input.relation_type_id)
            .fetch_one(pool)
            .await
    }

    /// Find a connection by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Connection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM connections WHERE id = $1");
        sqlx::query_as::<_, Connection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all connections of a document.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<Connection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM connections
             WHERE document_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// List a document's connections joined with their endpoint spans,
    /// for the concordance engine. The acting annotator is the source
    /// span's annotator.
    pub async fn endpoints_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<ConnectionEndpoints>, sqlx::Error> {
        sqlx::query_as(
            "SELECT
                s.annotator_id,
                s.start_offset AS source_start,
                s.end_offset   AS source_end,
                t.start_offset AS target_start,
                t.end_offset   AS target_end,
                c.relation_type_id
             FROM connections c
             JOIN span_annotations s ON s.id = c.source_id
             JOIN span_annotations t ON t.id = c.target_id
             WHERE c.document_id = $1
             ORDER BY c.id ASC",
        )
        .bind(document_id)
        .fetch_all(pool)
        .await
    }

    /// Distinct document IDs that have at least one connection of the
    /// given relation type. Used to recompute affected documents when a
    /// relation type is deleted.
    pub async fn document_ids_by_relation_type(
        pool: &PgPool,
        relation_type_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT DISTINCT document_id
             FROM connections
             WHERE relation_type_id = $1
             ORDER BY document_id",
        )
        .bind(relation_type_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Delete a connection by its ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM connections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
