//! Background services
//!
//! Work that must not run on the UI loop: catalog lookups for the search box.

pub mod search_worker;

pub use search_worker::SearchWorker;
