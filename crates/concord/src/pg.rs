//! Postgres-backed [`ConcordanceStore`].

use annolab_core::concordance::{ConnectionObservation, SpanObservation};
use annolab_core::types::DbId;
use annolab_db::repositories::{ConnectionRepo, DocumentRepo, ProjectRepo, SpanAnnotationRepo};
use annolab_db::DbPool;
use async_trait::async_trait;

use crate::store::{ConcordanceStore, DocumentScores, ProjectScores, StoreError};

/// [`ConcordanceStore`] over the shared sqlx connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConcordanceStore for PgStore {
    async fn span_annotations(
        &self,
        document_id: DbId,
    ) -> Result<Vec<SpanObservation>, StoreError> {
        let rows = SpanAnnotationRepo::list_by_document(&self.pool, document_id).await?;
        Ok(rows
            .into_iter()
            .map(|a| SpanObservation {
                annotator_id: a.annotator_id,
                label_id: a.label_id,
                start_offset: a.start_offset,
                end_offset: a.end_offset,
            })
            .collect())
    }

    async fn connections(
        &self,
        document_id: DbId,
    ) -> Result<Vec<ConnectionObservation>, StoreError> {
        let rows = ConnectionRepo::endpoints_by_document(&self.pool, document_id).await?;
        Ok(rows
            .into_iter()
            .map(|c| ConnectionObservation {
                annotator_id: c.annotator_id,
                source_start: c.source_start,
                source_end: c.source_end,
                target_start: c.target_start,
                target_end: c.target_end,
                relation_type_id: c.relation_type_id,
            })
            .collect())
    }

    async fn document(&self, id: DbId) -> Result<Option<DocumentScores>, StoreError> {
        let document = DocumentRepo::find_by_id(&self.pool, id).await?;
        Ok(document.map(|d| DocumentScores {
            id: d.id,
            project_id: d.project_id,
            entity_concordance: d.entity_concordance,
            relation_concordance: d.relation_concordance,
        }))
    }

    async fn project(&self, id: DbId) -> Result<Option<ProjectScores>, StoreError> {
        let project = ProjectRepo::find_by_id(&self.pool, id).await?;
        Ok(project.map(|p| ProjectScores {
            id: p.id,
            entity_concordance: p.entity_concordance,
            relation_concordance: p.relation_concordance,
        }))
    }

    async fn documents_in_project(
        &self,
        project_id: DbId,
    ) -> Result<Vec<DocumentScores>, StoreError> {
        let rows = DocumentRepo::scores_by_project(&self.pool, project_id).await?;
        Ok(rows
            .into_iter()
            .map(|(id, entity_concordance, relation_concordance)| DocumentScores {
                id,
                project_id,
                entity_concordance,
                relation_concordance,
            })
            .collect())
    }

    async fn save_document_scores(
        &self,
        id: DbId,
        entity_concordance: f64,
        relation_concordance: f64,
    ) -> Result<(), StoreError> {
        DocumentRepo::save_concordance(&self.pool, id, entity_concordance, relation_concordance)
            .await?;
        Ok(())
    }

    async fn save_project_scores(
        &self,
        id: DbId,
        entity_concordance: f64,
        relation_concordance: f64,
    ) -> Result<(), StoreError> {
        ProjectRepo::save_concordance(&self.pool, id, entity_concordance, relation_concordance)
            .await?;
        Ok(())
    }
}
