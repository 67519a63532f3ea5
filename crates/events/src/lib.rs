//! Annolab event bus and audit infrastructure.
//!
//! Building blocks for the platform-wide event feed:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical domain event envelope.
//! - [`EventPersistence`] — background service that durably writes every
//!   event to the `events` table.
//!
//! The bus is advisory: annotation mutations publish here for the audit
//! trail, but the concordance recomputation cascade is invoked directly
//! and synchronously by the mutation layer, never through the bus.

pub mod bus;
pub mod persistence;

pub use bus::{DomainEvent, EventBus};
pub use persistence::EventPersistence;
