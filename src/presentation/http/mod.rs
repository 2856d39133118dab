//! HTTP API
//!
//! Routes and handlers of the REST API.

pub mod handlers;
pub mod routes;
