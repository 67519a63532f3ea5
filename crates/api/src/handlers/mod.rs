//! Request handlers.
//!
//! Each submodule provides async handler functions for a single entity
//! type. Handlers validate input via `annolab-core`, delegate writes to
//! the repositories in `annolab-db`, invoke the matching concordance
//! hook, and publish a [`DomainEvent`](annolab_events::DomainEvent) for
//! the audit feed.

pub mod connection;
pub mod document;
pub mod label;
pub mod project;
pub mod relation_type;
pub mod span_annotation;

use annolab_concord::StoreError;

/// Log a failed concordance recomputation without failing the mutation
/// that triggered it.
///
/// Score recomputation is advisory relative to the primary annotation
/// data: a failure here leaves the cached score stale, never the
/// mutation rolled back.
pub(crate) fn log_recompute_failure(result: Result<(), StoreError>, trigger: &'static str) {
    if let Err(error) = result {
        tracing::warn!(
            %error,
            trigger,
            "Concordance recomputation failed; cached scores may be stale"
        );
    }
}
