//! # Domain Layer
//!
//! The domain layer describes the content schema the write engine works on.
//! It is independent of any storage engine or HTTP framework.
//!
//! ## Structure
//!
//! - **entities**: Content rows (Service, Post), taxonomy terms and nested
//!   child collections
//! - **value_objects**: The relationship table of the schema
//! - **services**: Slug and translation collaborators
//! - **repositories**: Unit-of-work and transaction ports
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Storage ports define data access contracts
//! - Child tables are declared once and everything else is derived

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use repositories::{ContentTransaction, UnitOfWork};
pub use value_objects::*;
