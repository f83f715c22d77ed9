use std::sync::Arc;

use sea_orm::DatabaseConnection;

use configs::StorageConfig;
use service::catalog::{repository::SeaOrmCatalogRepository, CatalogService};
use service::favorites::{repository::SeaOrmFavoritesRepository, FavoritesService};
use service::files::SongFiles;

/// Shared handler state. Cloned per request; everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub favorites: FavoritesService,
    pub files: Arc<SongFiles>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        catalog: CatalogService,
        favorites: FavoritesService,
        files: SongFiles,
        max_upload_bytes: usize,
    ) -> Self {
        Self { catalog, favorites, files: Arc::new(files), max_upload_bytes }
    }

    /// Wire the sea-orm repositories over one connection.
    pub fn from_db(db: DatabaseConnection, storage: &StorageConfig) -> Self {
        let catalog = CatalogService::new(Arc::new(SeaOrmCatalogRepository { db: db.clone() }));
        let favorites = FavoritesService::new(Arc::new(SeaOrmFavoritesRepository { db }));
        let files = SongFiles::new(&storage.upload_dir, &storage.songs_dir);
        Self::new(catalog, favorites, files, storage.max_upload_bytes)
    }
}
