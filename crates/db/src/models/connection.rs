//! Connection (relation instance) model and DTOs.

use annolab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `connections` table: a directed, optionally typed link
/// between two span annotations of the same document.
///
/// Connections carry no annotator column; the acting annotator is the
/// source span's annotator. Deleting either endpoint span cascades to
/// the connection.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Connection {
    pub id: DbId,
    pub document_id: DbId,
    pub source_id: DbId,
    pub target_id: DbId,
    pub relation_type_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new connection.
#[derive(Debug, Deserialize)]
pub struct CreateConnection {
    pub source_id: DbId,
    pub target_id: DbId,
    pub relation_type_id: Option<DbId>,
}

/// A connection joined with its endpoint spans, as consumed by the
/// concordance engine.
#[derive(Debug, Clone, FromRow)]
pub struct ConnectionEndpoints {
    /// The source span's annotator.
    pub annotator_id: DbId,
    pub source_start: i32,
    pub source_end: i32,
    pub target_start: i32,
    pub target_end: i32,
    pub relation_type_id: Option<DbId>,
}
