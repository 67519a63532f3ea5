//! Repository for the `relation_types` table.

use annolab_core::types::DbId;
use sqlx::PgPool;

use crate::models::relation_type::{CreateRelationType, RelationType};

/// Column list for relation_types queries.
const COLUMNS: &str = "id, project_id, text, color, created_at, updated_at";

/// Default display color for relation types.
const DEFAULT_COLOR: &str = "#7c4dff";

/// Provides CRUD operations for relation types.
pub struct RelationTypeRepo;

impl RelationTypeRepo {
    /// Insert a new relation type, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateRelationType,
    ) -> Result<RelationType, sqlx::Error> {
        let query = format!(
            "INSERT INTO relation_types (project_id, text, color)
             VALUES ($1, $2, COALESCE($3, $4))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RelationType>(&query)
            .bind(project_id)
            .bind(&input.text)
            .bind(&input.color)
            .bind(DEFAULT_COLOR)
            .fetch_one(pool)
            .await
    }

    /// Find a relation type by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RelationType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM relation_types WHERE id = $1");
        sqlx::query_as::<_, RelationType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all relation types of a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<RelationType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relation_types
             WHERE project_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, RelationType>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a relation type by ID. Connections using it are kept and
    /// degrade to untyped (`relation_type_id` is set to NULL by the
    /// schema). Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM relation_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
