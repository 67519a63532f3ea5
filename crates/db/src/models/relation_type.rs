//! Relation type model and DTOs.

use annolab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `relation_types` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RelationType {
    pub id: DbId,
    pub project_id: DbId,
    pub text: String,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new relation type.
#[derive(Debug, Deserialize)]
pub struct CreateRelationType {
    pub text: String,
    pub color: Option<String>,
}
