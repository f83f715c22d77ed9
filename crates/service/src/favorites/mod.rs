//! Favorites: per-user favorite-song-sets and the user records that own them.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::FavoritesService;
