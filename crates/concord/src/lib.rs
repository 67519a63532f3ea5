//! Inter-annotator concordance engine.
//!
//! Keeps the cached per-document and per-project agreement scores
//! consistent with live annotation state. The mutation layer invokes the
//! [`ConcordanceEngine`] hooks synchronously after every span
//! annotation, connection, or document create/delete; the engine reloads
//! the affected document's data through a [`ConcordanceStore`],
//! recomputes the score with the pure math in `annolab-core`, persists
//! it, and rolls the project average up in the same pass.

pub mod engine;
pub mod pg;
pub mod store;

pub use engine::ConcordanceEngine;
pub use pg::PgStore;
pub use store::{ConcordanceStore, DocumentScores, ProjectScores, StoreError};
