//! Service layer for the media catalog.
//! - Repository traits with sea-orm and in-memory implementations.
//! - Catalog and favorites services holding the business rules.
//! - File transfer for uploads and audio streaming.

pub mod errors;
pub mod runtime;
pub mod catalog;
pub mod favorites;
pub mod files;
#[cfg(test)]
pub mod test_support;
