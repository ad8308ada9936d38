//! Application layer for taskdeck.
//!
//! Defines the async store contract consumed by frontends and the
//! [`TaskController`] that caches one user's tasks, derives filtered views,
//! and tracks loading/error state for a presentation layer.

pub mod controller;
pub mod store;

// Re-exports for convenience
pub use controller::{TaskController, ViewFilterPatch, ViewFilters};
pub use store::TaskStore;
