//! # Content Server Library
//!
//! A content-management backend for locale-aware Services and Posts with:
//! - A transactional write engine for entities and their nested collections
//! - Manual cleanup of dependent rows before deletes (no cascading keys)
//! - Locale sibling synchronization inside a `slug_group`
//! - Media propagation across locale siblings
//! - A thin RESTful HTTP API over PostgreSQL
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Content entities, the relationship table, storage ports
//! - **Application Layer**: The write engine, services and DTOs
//! - **Infrastructure Layer**: PostgreSQL and in-memory stores, translation, metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! content_server/
//! +-- config/         Configuration management
//! +-- domain/         Entities, relationship table, ports
//! +-- application/    Write engine, services and DTOs
//! +-- infrastructure/ Stores, translation client, metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
