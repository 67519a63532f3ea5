//! Repository for the append-only `events` table.

use sqlx::PgPool;

use crate::models::event::{Event, NewEvent};

/// Column list for events queries.
const COLUMNS: &str = "id, event_type, source_entity_type, source_entity_id, \
    actor_user_id, payload, created_at";

/// Provides append and read operations for stored events.
pub struct EventRepo;

impl EventRepo {
    /// Append an event, returning the stored row.
    pub async fn insert(pool: &PgPool, input: &NewEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (event_type, source_entity_type, source_entity_id, actor_user_id, payload, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.event_type)
            .bind(&input.source_entity_type)
            .bind(input.source_entity_id)
            .bind(input.actor_user_id)
            .bind(&input.payload)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }
}
