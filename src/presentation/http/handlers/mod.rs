//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod health;
pub mod post;
pub mod service;
pub mod taxonomy;
