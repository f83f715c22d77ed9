//! Catalog: song search and song metadata persistence.
//!
//! Three layers like the rest of the crate: domain types, repository
//! abstraction (sea-orm + in-memory), and the service holding the rules.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::CatalogService;
