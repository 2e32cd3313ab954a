//! bozor/crates/bozor-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the bozor
//! marketplace data layer: entities, field validation, and storage ports.

pub mod error;
pub mod models;
pub mod paths;
pub mod traits;
pub mod validate;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
