//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where the entity
//!   supports patches

pub mod connection;
pub mod document;
pub mod event;
pub mod label;
pub mod project;
pub mod relation_type;
pub mod span_annotation;
