/// Store-level tests for the catalog, users and the favorite-song-set
pub mod store_tests;
