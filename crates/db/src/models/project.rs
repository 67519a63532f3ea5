//! Project model and DTOs.

use annolab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
///
/// The concordance scores are cached aggregates owned by the concordance
/// engine; they default to 1.0 and are never set through the API.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub guideline: String,
    pub entity_concordance: f64,
    pub relation_concordance: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub guideline: String,
}

/// DTO for updating an existing project.
#[derive(Debug, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub guideline: Option<String>,
}
