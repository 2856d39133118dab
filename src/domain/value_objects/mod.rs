//! # Domain Value Objects
//!
//! - **Relations**: the declared child/join tables and the delete plan derived
//!   from them

mod relations;

pub use relations::*;
