//! Label model and DTOs.

use annolab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `labels` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Label {
    pub id: DbId,
    pub project_id: DbId,
    pub text: String,
    pub prefix_key: Option<String>,
    pub suffix_key: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new label. Colors fall back to the project-wide
/// defaults when omitted.
#[derive(Debug, Deserialize)]
pub struct CreateLabel {
    pub text: String,
    pub prefix_key: Option<String>,
    pub suffix_key: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}
