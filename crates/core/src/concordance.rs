//! Concordance (inter-annotator agreement) table builders.
//!
//! Translates a document's live annotation data into ratings tables for
//! the [`agreement`](crate::agreement) statistic:
//!
//! - entity concordance groups span annotations by exact
//!   (start_offset, end_offset) pair, with one category per label
//!   observed anywhere in the document;
//! - relation concordance groups connections by their order-sensitive
//!   path key (source offsets, then target offsets), with one category
//!   per relation type observed (untyped connections share the
//!   [`UNTYPED_RELATION`] sentinel).
//!
//! Both builders implement the degenerate-input policy: with fewer than
//! two distinct annotators there is no one to disagree with, and the
//! score is [`DEFAULT_CONCORDANCE`] without consulting the statistic.
//! Category sets are derived fresh from the input on every call.

use std::collections::{BTreeMap, BTreeSet};

use crate::agreement::{fleiss_kappa, RatingsTable};
use crate::types::DbId;

/// Score assigned when agreement is undefined: a single annotator, an
/// empty document, or an empty project.
pub const DEFAULT_CONCORDANCE: f64 = 1.0;

/// Sentinel category for connections without a relation type.
pub const UNTYPED_RELATION: DbId = 0;

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// One span annotation as seen by the concordance engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanObservation {
    pub annotator_id: DbId,
    pub label_id: DbId,
    pub start_offset: i32,
    pub end_offset: i32,
}

/// One connection as seen by the concordance engine. The annotator is
/// inherited from the source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionObservation {
    pub annotator_id: DbId,
    pub source_start: i32,
    pub source_end: i32,
    pub target_start: i32,
    pub target_end: i32,
    pub relation_type_id: Option<DbId>,
}

impl ConnectionObservation {
    /// The connection's rating category: its relation type, or the
    /// untyped sentinel.
    fn category(&self) -> DbId {
        self.relation_type_id.unwrap_or(UNTYPED_RELATION)
    }
}

// ---------------------------------------------------------------------------
// Entity concordance
// ---------------------------------------------------------------------------

/// Compute a document's entity concordance from its span annotations.
///
/// Subjects are exact (start_offset, end_offset) pairs; near-miss spans
/// at different offsets are distinct subjects, never merged by overlap.
pub fn entity_concordance(spans: &[SpanObservation]) -> f64 {
    let annotators: BTreeSet<DbId> = spans.iter().map(|s| s.annotator_id).collect();
    if annotators.len() < 2 {
        return DEFAULT_CONCORDANCE;
    }

    // Category columns: the union of labels across the whole document,
    // not per annotator.
    let labels: BTreeSet<DbId> = spans.iter().map(|s| s.label_id).collect();
    let column: BTreeMap<DbId, usize> = labels.iter().enumerate().map(|(i, &l)| (l, i)).collect();

    let mut table = RatingsTable::new(column.len());
    let mut subjects: BTreeMap<(i32, i32), usize> = BTreeMap::new();
    for span in spans {
        let key = (span.start_offset, span.end_offset);
        let row = *subjects
            .entry(key)
            .or_insert_with(|| table.push_subject());
        table.record(row, column[&span.label_id]);
    }

    fleiss_kappa(&table, annotators.len() as u32)
}

// ---------------------------------------------------------------------------
// Relation concordance
// ---------------------------------------------------------------------------

/// Compute a document's relation concordance from its connections.
///
/// Subjects are order-sensitive path keys (source offsets, then target
/// offsets). Category columns are the relation types actually observed
/// in the document; a type with zero occurrences is never a column.
pub fn relation_concordance(connections: &[ConnectionObservation]) -> f64 {
    let annotators: BTreeSet<DbId> = connections.iter().map(|c| c.annotator_id).collect();
    if annotators.len() < 2 {
        return DEFAULT_CONCORDANCE;
    }

    let categories: BTreeSet<DbId> = connections.iter().map(|c| c.category()).collect();
    let column: BTreeMap<DbId, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i))
        .collect();

    let mut table = RatingsTable::new(column.len());
    let mut subjects: BTreeMap<(i32, i32, i32, i32), usize> = BTreeMap::new();
    for conn in connections {
        let key = (
            conn.source_start,
            conn.source_end,
            conn.target_start,
            conn.target_end,
        );
        let row = *subjects
            .entry(key)
            .or_insert_with(|| table.push_subject());
        table.record(row, column[&conn.category()]);
    }

    fleiss_kappa(&table, annotators.len() as u32)
}

// ---------------------------------------------------------------------------
// Project rollup
// ---------------------------------------------------------------------------

/// Arithmetic mean of per-document scores for the project rollup.
///
/// An empty project scores [`DEFAULT_CONCORDANCE`]. Documents still at
/// their default participate in the mean without special-casing.
pub fn rollup_mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return DEFAULT_CONCORDANCE;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn span(annotator_id: DbId, label_id: DbId, start: i32, end: i32) -> SpanObservation {
        SpanObservation {
            annotator_id,
            label_id,
            start_offset: start,
            end_offset: end,
        }
    }

    fn connection(
        annotator_id: DbId,
        source: (i32, i32),
        target: (i32, i32),
        relation_type_id: Option<DbId>,
    ) -> ConnectionObservation {
        ConnectionObservation {
            annotator_id,
            source_start: source.0,
            source_end: source.1,
            target_start: target.0,
            target_end: target.1,
            relation_type_id,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    // -- entity concordance ------------------------------------------------

    #[test]
    fn no_spans_scores_default() {
        assert_close(entity_concordance(&[]), 1.0);
    }

    #[test]
    fn single_annotator_scores_default() {
        let spans = [span(1, 10, 0, 5), span(1, 11, 6, 9)];
        assert_close(entity_concordance(&spans), 1.0);
    }

    #[test]
    fn two_annotators_full_agreement() {
        let spans = [span(1, 10, 0, 5), span(2, 10, 0, 5)];
        assert_close(entity_concordance(&spans), 1.0);
    }

    #[test]
    fn two_annotators_full_disagreement() {
        // Same offset key, different labels: one subject, two columns,
        // counts 1/1 - the exact formula value is -1.
        let spans = [span(1, 10, 0, 5), span(2, 11, 0, 5)];
        assert_close(entity_concordance(&spans), -1.0);
    }

    #[test]
    fn near_miss_offsets_are_distinct_subjects() {
        // Same label but offsets differ by one character: two subjects,
        // each rated by one of two annotators. The implicit "not rated"
        // pad yields kappa -1, not agreement.
        let spans = [span(1, 10, 0, 5), span(2, 10, 0, 6)];
        assert_close(entity_concordance(&spans), -1.0);
    }

    #[test]
    fn label_union_spans_annotators() {
        // Annotator 2 never uses label 11, but it is still a column of
        // annotator 2's rows. Mixed agreement across three subjects:
        // rows [2,0], [2,0], [1,1] -> kappa -0.2.
        let spans = [
            span(1, 10, 0, 5),
            span(2, 10, 0, 5),
            span(1, 10, 6, 9),
            span(2, 10, 6, 9),
            span(1, 10, 12, 20),
            span(2, 11, 12, 20),
        ];
        assert_close(entity_concordance(&spans), -0.2);
    }

    // -- relation concordance ----------------------------------------------

    #[test]
    fn no_connections_scores_default() {
        assert_close(relation_concordance(&[]), 1.0);
    }

    #[test]
    fn single_connection_annotator_scores_default() {
        let connections = [
            connection(1, (0, 5), (10, 15), Some(7)),
            connection(1, (10, 15), (20, 25), None),
        ];
        assert_close(relation_concordance(&connections), 1.0);
    }

    #[test]
    fn matching_untyped_connections_agree() {
        // Both annotators drew the same untyped path: one subject, one
        // sentinel category, p_e == 1.
        let connections = [
            connection(1, (0, 5), (10, 15), None),
            connection(2, (0, 5), (10, 15), None),
        ];
        assert_close(relation_concordance(&connections), 1.0);
    }

    #[test]
    fn conflicting_relation_types_disagree() {
        let connections = [
            connection(1, (0, 5), (10, 15), Some(7)),
            connection(2, (0, 5), (10, 15), Some(8)),
        ];
        assert_close(relation_concordance(&connections), -1.0);
    }

    #[test]
    fn typed_vs_untyped_is_disagreement() {
        // The untyped sentinel is its own category, distinct from any
        // assigned relation type.
        let connections = [
            connection(1, (0, 5), (10, 15), Some(7)),
            connection(2, (0, 5), (10, 15), None),
        ];
        assert_close(relation_concordance(&connections), -1.0);
    }

    #[test]
    fn path_key_is_order_sensitive() {
        // A -> B and B -> A are different subjects; each annotator rated
        // only one of them, so the pad column dominates.
        let connections = [
            connection(1, (0, 5), (10, 15), Some(7)),
            connection(2, (10, 15), (0, 5), Some(7)),
        ];
        assert_close(relation_concordance(&connections), -1.0);
    }

    // -- project rollup ----------------------------------------------------

    #[test]
    fn rollup_of_empty_project_is_default() {
        assert_close(rollup_mean(&[]), 1.0);
    }

    #[test]
    fn rollup_is_arithmetic_mean() {
        assert_close(rollup_mean(&[0.5, 1.0, 0.75]), 0.75);
    }

    #[test]
    fn rollup_of_defaults_stays_default() {
        assert_close(rollup_mean(&[1.0, 1.0]), 1.0);
    }
}
