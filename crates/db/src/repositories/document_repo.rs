//! Repository for the `documents` table.

use annolab_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document};

/// Column list for documents queries.
const COLUMNS: &str = "id, project_id, text, meta, \
    entity_concordance, relation_concordance, created_at, updated_at";

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a new document into a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (project_id, text, meta)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .bind(&input.text)
            .bind(&input.meta)
            .fetch_one(pool)
            .await
    }

    /// Find a document by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all documents in a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE project_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch only the cached concordance scores of a project's
    /// documents, for the project rollup.
    pub async fn scores_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<(DbId, f64, f64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, entity_concordance, relation_concordance
             FROM documents
             WHERE project_id = $1
             ORDER BY id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a document by ID, cascading to its annotations and
    /// connections. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist the document's concordance scores in a single row write.
    pub async fn save_concordance(
        pool: &PgPool,
        id: DbId,
        entity_concordance: f64,
        relation_concordance: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE documents SET
                entity_concordance = $2,
                relation_concordance = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(entity_concordance)
        .bind(relation_concordance)
        .execute(pool)
        .await?;
        Ok(())
    }
}
