//! Stored platform event model.

use annolab_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `events` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: DbId,
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for appending an event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
