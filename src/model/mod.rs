//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `Candidate` - normalized book records and their raw wire shape
//! - `Catalog` - the searchable book collection
//! - `Route` - navigation targets
//! - `ModalStack` - Modal overlay management

pub mod candidate;
pub mod catalog;
pub mod modal;
pub mod route;

// Re-export commonly used types
pub use candidate::{Availability, BookId, Candidate};
pub use catalog::{Catalog, CatalogStats};
pub use route::Route;
