//! Repository for the `projects` table.

use annolab_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, guideline, \
    entity_concordance, relation_concordance, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row. Concordance
    /// scores start at their schema default of 1.0.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, guideline)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.guideline)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                guideline = COALESCE($4, guideline),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.guideline)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project by ID, cascading to its documents, labels, and
    /// relation types. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist the project's concordance scores in a single row write.
    pub async fn save_concordance(
        pool: &PgPool,
        id: DbId,
        entity_concordance: f64,
        relation_concordance: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE projects SET
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
