//! Document model and DTOs.

use annolab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table.
///
/// Like projects, the concordance scores are engine-owned caches.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    pub id: DbId,
    pub project_id: DbId,
    pub text: String,
    pub meta: serde_json::Value,
    pub entity_concordance: f64,
    pub relation_concordance: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new document.
#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub text: String,
    #[serde(default = "empty_meta")]
    pub meta: serde_json::Value,
}

fn empty_meta() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
