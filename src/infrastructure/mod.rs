//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - PostgreSQL unit of work and transaction adapter
//! - In-memory content store implementing the same ports
//! - Translation service client
//! - Prometheus metrics

pub mod database;
pub mod memory;
pub mod metrics;
pub mod translation;
