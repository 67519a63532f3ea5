//! Concordance recomputation engine and trigger cascade.
//!
//! The mutation layer calls one hook per mutation type, synchronously,
//! inside the same request that performed the write:
//!
//! | trigger                            | hook                           |
//! |------------------------------------|--------------------------------|
//! | span annotation created or deleted | [`on_span_annotation_changed`] |
//! | connection created or deleted      | [`on_connection_changed`]      |
//! | document created or deleted        | [`on_document_changed`]        |
//!
//! Persisting a document's score is itself a document change, so the
//! document-level hooks chain into [`on_document_changed`] for the
//! owning project. That two-level cascade is what keeps project scores
//! from going stale after any mutation.
//!
//! A missing document or project is not an error: the triggering row may
//! have been deleted between the mutation and the recompute, and the
//! hook must not fail the mutation over it.
//!
//! [`on_span_annotation_changed`]: ConcordanceEngine::on_span_annotation_changed
//! [`on_connection_changed`]: ConcordanceEngine::on_connection_changed
//! [`on_document_changed`]: ConcordanceEngine::on_document_changed

use annolab_core::concordance::{entity_concordance, relation_concordance, rollup_mean};
use annolab_core::types::DbId;

use crate::store::{ConcordanceStore, StoreError};

/// Recomputes and persists concordance scores in response to annotation
/// state changes.
pub struct ConcordanceEngine<S> {
    store: S,
}

impl<S: ConcordanceStore> ConcordanceEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// A span annotation of `document_id` was created or deleted:
    /// rebuild the document's entity concordance from its current
    /// annotations, persist it, and roll the project up.
    pub async fn on_span_annotation_changed(&self, document_id: DbId) -> Result<(), StoreError> {
        let Some(document) = self.store.document(document_id).await? else {
            tracing::debug!(document_id, "document gone before entity concordance recompute");
            return Ok(());
        };

        let spans = self.store.span_annotations(document_id).await?;
        let entity = entity_concordance(&spans);
        self.store
            .save_document_scores(document_id, entity, document.relation_concordance)
            .await?;
        tracing::debug!(
            document_id,
            entity_concordance = entity,
            annotations = spans.len(),
            "entity concordance recomputed"
        );

        self.on_document_changed(document.project_id).await
    }

    /// A connection of `document_id` was created or deleted: rebuild
    /// the document's relation concordance from its current
    /// connections, persist it, and roll the project up.
    pub async fn on_connection_changed(&self, document_id: DbId) -> Result<(), StoreError> {
        let Some(document) = self.store.document(document_id).await? else {
            tracing::debug!(document_id, "document gone before relation concordance recompute");
            return Ok(());
        };

        let connections = self.store.connections(document_id).await?;
        let relation = relation_concordance(&connections);
        self.store
            .save_document_scores(document_id, document.entity_concordance, relation)
            .await?;
        tracing::debug!(
            document_id,
            relation_concordance = relation,
            connections = connections.len(),
            "relation concordance recomputed"
        );

        self.on_document_changed(document.project_id).await
    }

    /// A document of `project_id` was created, deleted, or had a score
    /// persisted: recompute the project rollup as the arithmetic mean
    /// over its current documents.
    pub async fn on_document_changed(&self, project_id: DbId) -> Result<(), StoreError> {
        if self.store.project(project_id).await?.is_none() {
            tracing::debug!(project_id, "project gone before concordance rollup");
            return Ok(());
        }

        let documents = self.store.documents_in_project(project_id).await?;
        let entity_scores: Vec<f64> = documents.iter().map(|d| d.entity_concordance).collect();
        let relation_scores: Vec<f64> = documents.iter().map(|d| d.relation_concordance).collect();
        let entity = rollup_mean(&entity_scores);
        let relation = rollup_mean(&relation_scores);

        self.store
            .save_project_scores(project_id, entity, relation)
            .await?;
        tracing::debug!(
            project_id,
            entity_concordance = entity,
            relation_concordance = relation,
            documents = documents.len(),
            "project concordance rolled up"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use annolab_core::concordance::{ConnectionObservation, SpanObservation};
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::store::{DocumentScores, ProjectScores};

    #[derive(Default)]
    struct MemState {
        projects: BTreeMap<DbId, ProjectScores>,
        documents: BTreeMap<DbId, DocumentScores>,
        spans: BTreeMap<DbId, Vec<SpanObservation>>,
        connections: BTreeMap<DbId, Vec<ConnectionObservation>>,
    }

    /// In-memory [`ConcordanceStore`]; clones share the same state so
    /// tests can seed and inspect around the engine.
    #[derive(Clone, Default)]
    struct MemStore {
        state: Arc<Mutex<MemState>>,
    }

    impl MemStore {
        fn add_project(&self, id: DbId) {
            self.state.lock().unwrap().projects.insert(
                id,
                ProjectScores {
                    id,
                    entity_concordance: 1.0,
                    relation_concordance: 1.0,
                },
            );
        }

        fn add_document(&self, id: DbId, project_id: DbId) {
            self.state.lock().unwrap().documents.insert(
                id,
                DocumentScores {
                    id,
                    project_id,
                    entity_concordance: 1.0,
                    relation_concordance: 1.0,
                },
            );
        }

        fn set_document_scores(&self, id: DbId, entity: f64, relation: f64) {
            let mut state = self.state.lock().unwrap();
            let document = state.documents.get_mut(&id).unwrap();
            document.entity_concordance = entity;
            document.relation_concordance = relation;
        }

        fn add_span(&self, document_id: DbId, annotator_id: DbId, label_id: DbId, start: i32, end: i32) {
            self.state
                .lock()
                .unwrap()
                .spans
                .entry(document_id)
                .or_default()
                .push(SpanObservation {
                    annotator_id,
                    label_id,
                    start_offset: start,
                    end_offset: end,
                });
        }

        fn remove_spans_by_annotator(&self, document_id: DbId, annotator_id: DbId) {
            if let Some(spans) = self.state.lock().unwrap().spans.get_mut(&document_id) {
                spans.retain(|s| s.annotator_id != annotator_id);
            }
        }

        fn add_connection(
            &self,
            document_id: DbId,
            annotator_id: DbId,
            source: (i32, i32),
            target: (i32, i32),
            relation_type_id: Option<DbId>,
        ) {
            self.state
                .lock()
                .unwrap()
                .connections
                .entry(document_id)
                .or_default()
                .push(ConnectionObservation {
                    annotator_id,
                    source_start: source.0,
                    source_end: source.1,
                    target_start: target.0,
                    target_end: target.1,
                    relation_type_id,
                });
        }

        fn document_scores(&self, id: DbId) -> DocumentScores {
            self.state.lock().unwrap().documents[&id].clone()
        }

        fn project_scores(&self, id: DbId) -> ProjectScores {
            self.state.lock().unwrap().projects[&id].clone()
        }
    }

    #[async_trait]
    impl ConcordanceStore for MemStore {
        async fn span_annotations(
            &self,
            document_id: DbId,
        ) -> Result<Vec<SpanObservation>, StoreError> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .spans
                .get(&document_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn connections(
            &self,
            document_id: DbId,
        ) -> Result<Vec<ConnectionObservation>, StoreError> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .connections
                .get(&document_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn document(&self, id: DbId) -> Result<Option<DocumentScores>, StoreError> {
            Ok(self.state.lock().unwrap().documents.get(&id).cloned())
        }

        async fn project(&self, id: DbId) -> Result<Option<ProjectScores>, StoreError> {
            Ok(self.state.lock().unwrap().projects.get(&id).cloned())
        }

        async fn documents_in_project(
            &self,
            project_id: DbId,
        ) -> Result<Vec<DocumentScores>, StoreError> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .documents
                .values()
                .filter(|d| d.project_id == project_id)
                .cloned()
                .collect())
        }

        async fn save_document_scores(
            &self,
            id: DbId,
            entity_concordance: f64,
            relation_concordance: f64,
        ) -> Result<(), StoreError> {
            let mut state = self.state.lock().unwrap();
            if let Some(document) = state.documents.get_mut(&id) {
                document.entity_concordance = entity_concordance;
                document.relation_concordance = relation_concordance;
            }
            Ok(())
        }

        async fn save_project_scores(
            &self,
            id: DbId,
            entity_concordance: f64,
            relation_concordance: f64,
        ) -> Result<(), StoreError> {
            let mut state = self.state.lock().unwrap();
            if let Some(project) = state.projects.get_mut(&id) {
                project.entity_concordance = entity_concordance;
                project.relation_concordance = relation_concordance;
            }
            Ok(())
        }
    }

    fn engine_with_store() -> (ConcordanceEngine<MemStore>, MemStore) {
        let store = MemStore::default();
        let engine = ConcordanceEngine::new(store.clone());
        (engine, store)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    // -- degenerate annotator counts ---------------------------------------

    #[tokio::test]
    async fn single_annotator_document_scores_default() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_span(10, 7, 100, 0, 5);
        store.add_span(10, 7, 101, 6, 9);

        engine.on_span_annotation_changed(10).await.unwrap();

        assert_close(store.document_scores(10).entity_concordance, 1.0);
    }

    // -- entity recomputation ----------------------------------------------

    #[tokio::test]
    async fn two_annotators_full_agreement_scores_one() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_span(10, 7, 100, 0, 5);
        store.add_span(10, 8, 100, 0, 5);

        engine.on_span_annotation_changed(10).await.unwrap();

        assert_close(store.document_scores(10).entity_concordance, 1.0);
    }

    #[tokio::test]
    async fn two_annotators_full_disagreement_scores_minus_one() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_span(10, 7, 100, 0, 5);
        store.add_span(10, 8, 101, 0, 5);

        engine.on_span_annotation_changed(10).await.unwrap();

        assert_close(store.document_scores(10).entity_concordance, -1.0);
        // The project holds this single document, so the rollup follows.
        assert_close(store.project_scores(1).entity_concordance, -1.0);
    }

    #[tokio::test]
    async fn deleting_second_annotators_spans_resets_to_default() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_span(10, 7, 100, 0, 5);
        store.add_span(10, 8, 101, 0, 5);

        engine.on_span_annotation_changed(10).await.unwrap();
        assert_close(store.document_scores(10).entity_concordance, -1.0);

        store.remove_spans_by_annotator(10, 8);
        engine.on_span_annotation_changed(10).await.unwrap();

        assert_close(store.document_scores(10).entity_concordance, 1.0);
        assert_close(store.project_scores(1).entity_concordance, 1.0);
    }

    #[tokio::test]
    async fn recomputation_is_idempotent() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_span(10, 7, 100, 0, 5);
        store.add_span(10, 8, 100, 0, 5);
        store.add_span(10, 7, 101, 6, 9);
        store.add_span(10, 8, 102, 6, 9);

        engine.on_span_annotation_changed(10).await.unwrap();
        let first = store.document_scores(10).entity_concordance;

        engine.on_span_annotation_changed(10).await.unwrap();
        let second = store.document_scores(10).entity_concordance;

        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[tokio::test]
    async fn span_hook_preserves_relation_score() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.set_document_scores(10, 1.0, 0.4);
        store.add_span(10, 7, 100, 0, 5);

        engine.on_span_annotation_changed(10).await.unwrap();

        assert_close(store.document_scores(10).relation_concordance, 0.4);
    }

    // -- relation recomputation --------------------------------------------

    #[tokio::test]
    async fn conflicting_relation_types_score_minus_one() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_connection(10, 7, (0, 5), (10, 15), Some(3));
        store.add_connection(10, 8, (0, 5), (10, 15), Some(4));

        engine.on_connection_changed(10).await.unwrap();

        assert_close(store.document_scores(10).relation_concordance, -1.0);
        assert_close(store.project_scores(1).relation_concordance, -1.0);
    }

    #[tokio::test]
    async fn matching_untyped_connections_score_one() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_connection(10, 7, (0, 5), (10, 15), None);
        store.add_connection(10, 8, (0, 5), (10, 15), None);

        engine.on_connection_changed(10).await.unwrap();

        assert_close(store.document_scores(10).relation_concordance, 1.0);
    }

    #[tokio::test]
    async fn connection_hook_preserves_entity_score() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.set_document_scores(10, -0.2, 1.0);
        store.add_connection(10, 7, (0, 5), (10, 15), None);

        engine.on_connection_changed(10).await.unwrap();

        assert_close(store.document_scores(10).entity_concordance, -0.2);
    }

    // -- project rollup ----------------------------------------------------

    #[tokio::test]
    async fn rollup_averages_document_scores() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_document(10, 1);
        store.add_document(11, 1);
        store.add_document(12, 1);
        store.set_document_scores(10, 0.5, 0.0);
        store.set_document_scores(11, 1.0, 0.6);
        store.set_document_scores(12, 0.75, 0.9);

        engine.on_document_changed(1).await.unwrap();

        assert_close(store.project_scores(1).entity_concordance, 0.75);
        assert_close(store.project_scores(1).relation_concordance, 0.5);
    }

    #[tokio::test]
    async fn empty_project_rolls_up_to_default() {
        let (engine, store) = engine_with_store();
        store.add_project(1);

        engine.on_document_changed(1).await.unwrap();

        assert_close(store.project_scores(1).entity_concordance, 1.0);
        assert_close(store.project_scores(1).relation_concordance, 1.0);
    }

    #[tokio::test]
    async fn rollup_ignores_other_projects_documents() {
        let (engine, store) = engine_with_store();
        store.add_project(1);
        store.add_project(2);
        store.add_document(10, 1);
        store.add_document(20, 2);
        store.set_document_scores(10, 0.5, 0.5);
        store.set_document_scores(20, -1.0, -1.0);

        engine.on_document_changed(1).await.unwrap();

        assert_close(store.project_scores(1).entity_concordance, 0.5);
        assert_close(store.project_scores(2).entity_concordance, 1.0);
    }

    // -- vanished rows are no-ops ------------------------------------------

    #[tokio::test]
    async fn missing_document_is_a_silent_noop() {
        let (engine, store) = engine_with_store();
        store.add_project(1);

        assert_matches!(engine.on_span_annotation_changed(999).await, Ok(()));
        assert_matches!(engine.on_connection_changed(999).await, Ok(()));
        // The project was never touched.
        assert_close(store.project_scores(1).entity_concordance, 1.0);
    }

    #[tokio::test]
    async fn missing_project_is_a_silent_noop() {
        let (engine, _store) = engine_with_store();

        assert_matches!(engine.on_document_changed(999).await, Ok(()));
    }
}
