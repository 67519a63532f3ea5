//! Storage interface consumed by the concordance engine.

use annolab_core::concordance::{ConnectionObservation, SpanObservation};
use annolab_core::types::DbId;
use async_trait::async_trait;

/// Error from the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A document's identity and cached concordance scores.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentScores {
    pub id: DbId,
    pub project_id: DbId,
    pub entity_concordance: f64,
    pub relation_concordance: f64,
}

/// A project's cached concordance scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectScores {
    pub id: DbId,
    pub entity_concordance: f64,
    pub relation_concordance: f64,
}

/// The slice of storage the concordance engine reads and writes.
///
/// Implemented by [`PgStore`](crate::pg::PgStore) in production; tests
/// substitute an in-memory store. Score writes must be single atomic
/// row updates — concurrent recomputations of one document resolve by
/// last-write-wins, never by torn writes.
#[async_trait]
pub trait ConcordanceStore: Send + Sync {
    /// All span annotations of a document.
    async fn span_annotations(
        &self,
        document_id: DbId,
    ) -> Result<Vec<SpanObservation>, StoreError>;

    /// All connections of a document, joined with their endpoint spans.
    async fn connections(
        &self,
        document_id: DbId,
    ) -> Result<Vec<ConnectionObservation>, StoreError>;

    /// Look up a document; `None` if it no longer exists.
    async fn document(&self, id: DbId) -> Result<Option<DocumentScores>, StoreError>;

    /// Look up a project; `None` if it no longer exists.
    async fn project(&self, id: DbId) -> Result<Option<ProjectScores>, StoreError>;

    /// All documents currently in a project.
    async fn documents_in_project(
        &self,
        project_id: DbId,
    ) -> Result<Vec<DocumentScores>, StoreError>;

    /// Persist a document's scores as one atomic row write.
    async fn save_document_scores(
        &self,
        id: DbId,
        entity_concordance: f64,
        relation_concordance: f64,
    ) -> Result<(), StoreError>;

    /// Persist a project's scores as one atomic row write.
    async fn save_project_scores(
        &self,
        id: DbId,
        entity_concordance: f64,
        relation_concordance: f64,
    ) -> Result<(), StoreError>;
}
