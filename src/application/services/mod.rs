//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ContentService**: Service and Post writes, reads, deletes, locale sync
//!   and media propagation
//! - **TaxonomyService**: Tag and category management
//!
//! ## Write Engine
//!
//! - **collection_replacer**: replace-all writes of one nested collection
//! - **entity_writer**: parent row plus every collection present in a write
//! - **janitor**: removal of rows referencing a parent before it is deleted
//! - **locale_sync**: find-or-create of locale siblings
//! - **image_propagator**: media references copied across a slug group

pub mod collection_replacer;
pub mod content_service;
pub mod entity_writer;
pub mod image_propagator;
pub mod janitor;
pub mod locale_sync;
pub mod taxonomy_service;

// Re-export content service types
pub use content_service::{ContentDetail, ContentService, ContentServiceImpl};

// Re-export taxonomy service types
pub use taxonomy_service::{TaxonomyService, TaxonomyServiceImpl};

// Re-export write engine types
pub use entity_writer::{EntityWrite, WriteTarget};
pub use locale_sync::{LocaleSynchronizer, SyncMode, SyncOutcome, SyncRequest};
