//! Annolab API server library.
//!
//! Exposes the building blocks (config, state, error handling, router,
//! handlers) so the binary entrypoint and any embedding test harness can
//! both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
