//! Server module for building the HTTP application
//!
//! `ServerBuilder` wires one store handle into both resources and adds:
//! - `GET /health`
//! - a JSON 404 for unmatched routes
//! - per-request tracing

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
