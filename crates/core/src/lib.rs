//! Pure domain logic for the annolab annotation platform.
//!
//! This crate has no I/O. It holds the shared id/timestamp aliases, the
//! domain error type, validation rules for labels and span annotations,
//! and the inter-annotator agreement (concordance) mathematics consumed
//! by the storage and API layers.

pub mod agreement;
pub mod annotation;
pub mod concordance;
pub mod error;
pub mod label;
pub mod types;
