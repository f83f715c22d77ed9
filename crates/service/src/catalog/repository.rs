use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::ids::SongId;

use super::domain::Song;
use crate::errors::ServiceError;

/// Repository abstraction over the song store.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Songs whose title or artist contains `query` case-insensitively.
    async fn search(&self, query: &str) -> Result<Vec<Song>, ServiceError>;
    /// Insert a new song; `None` lets the store assign the id.
    async fn save(&self, id: Option<SongId>, title: &str, artist: &str) -> Result<Song, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCatalogRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn search(&self, query: &str) -> Result<Vec<Song>, ServiceError> {
        let rows = models::song::search(&self.db, query).await?;
        Ok(rows.into_iter().map(Song::from).collect())
    }

    async fn save(&self, id: Option<SongId>, title: &str, artist: &str) -> Result<Song, ServiceError> {
        let row = models::song::insert(&self.db, id, title, artist).await?;
        Ok(row.into())
    }
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryCatalogRepository {
        songs: Mutex<Vec<Song>>,
        fail_with: Option<String>,
    }

    impl InMemoryCatalogRepository {
        /// Every call fails with `ServiceError::Db(msg)`.
        pub fn failing(msg: &str) -> Self {
            Self { songs: Mutex::new(Vec::new()), fail_with: Some(msg.to_string()) }
        }

        fn check(&self) -> Result<(), ServiceError> {
            match &self.fail_with {
                Some(msg) => Err(ServiceError::Db(msg.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CatalogRepository for InMemoryCatalogRepository {
        async fn search(&self, query: &str) -> Result<Vec<Song>, ServiceError> {
            self.check()?;
            let needle = query.to_lowercase();
            let songs = self.songs.lock().unwrap();
            Ok(songs
                .iter()
                .filter(|s| s.title.to_lowercase().contains(&needle) || s.artist.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn save(&self, id: Option<SongId>, title: &str, artist: &str) -> Result<Song, ServiceError> {
            self.check()?;
            let mut songs = self.songs.lock().unwrap();
            let id = id.unwrap_or_else(SongId::generate);
            if songs.iter().any(|s| s.id == id.as_str()) {
                return Err(ServiceError::Db(format!("duplicate key: {id}")));
            }
            let song = Song { id: id.into_inner(), title: title.to_string(), artist: artist.to_string() };
            songs.push(song.clone());
            Ok(song)
        }
    }
}
