use std::sync::Arc;

use tracing::{debug, info, instrument};

use models::ids::SongId;

use super::domain::Song;
use super::repository::CatalogRepository;
use crate::errors::ServiceError;

/// Catalog business service independent of web framework
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self { Self { repo } }

    /// Case-insensitive substring search over title and artist.
    ///
    /// # Examples
    /// ```
    /// use service::catalog::{CatalogService, domain::Song, repository::mock::InMemoryCatalogRepository};
    /// use std::sync::Arc;
    /// let svc = CatalogService::new(Arc::new(InMemoryCatalogRepository::default()));
    /// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// rt.block_on(svc.save(Song { id: String::new(), title: "Yesterday".into(), artist: "The Beatles".into() })).unwrap();
    /// assert_eq!(rt.block_on(svc.search("beatles")).unwrap().len(), 1);
    /// assert!(rt.block_on(svc.search("xyz")).unwrap().is_empty());
    /// ```
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Song>, ServiceError> {
        let songs = self.repo.search(query).await?;
        debug!(hits = songs.len(), "catalog_search");
        Ok(songs)
    }

    /// Persist a new song. An empty id is assigned by the store; a non-empty
    /// one must be a valid [`SongId`].
    #[instrument(skip_all, fields(title = %song.title, artist = %song.artist))]
    pub async fn save(&self, song: Song) -> Result<Song, ServiceError> {
        let id = if song.id.is_empty() { None } else { Some(SongId::parse(&song.id)?) };
        let saved = self.repo.save(id, &song.title, &song.artist).await?;
        info!(song_id = %saved.id, "song_saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repository::{mock::InMemoryCatalogRepository, SeaOrmCatalogRepository};
    use crate::test_support::get_db;

    fn song(title: &str, artist: &str) -> Song {
        Song { id: String::new(), title: title.into(), artist: artist.into() }
    }

    async fn seaorm_service() -> anyhow::Result<CatalogService> {
        let db = get_db().await?;
        Ok(CatalogService::new(Arc::new(SeaOrmCatalogRepository { db })))
    }

    #[tokio::test]
    async fn beatles_scenario() -> anyhow::Result<()> {
        let svc = seaorm_service().await?;
        let saved = svc.save(song("Yesterday", "The Beatles")).await?;
        assert!(!saved.id.is_empty());

        let hits = svc.search("beatles").await?;
        assert_eq!(hits, vec![saved]);
        assert!(svc.search("xyz").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn search_results_all_contain_query() -> anyhow::Result<()> {
        let svc = seaorm_service().await?;
        for (t, a) in [("Let It Be", "The Beatles"), ("Beat It", "Michael Jackson"), ("Hey Jude", "The Beatles"), ("Imagine", "John Lennon")] {
            svc.save(song(t, a)).await?;
        }
        for q in ["beat", "IT", "the", "j", "lennon", "zzz"] {
            let lower = q.to_lowercase();
            for s in svc.search(q).await? {
                assert!(
                    s.title.to_lowercase().contains(&lower) || s.artist.to_lowercase().contains(&lower),
                    "{q:?} matched {s:?}"
                );
            }
        }
        assert_eq!(svc.search("beat").await?.len(), 3);
        assert_eq!(svc.search("").await?.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn save_with_caller_id_keeps_it() -> anyhow::Result<()> {
        let svc = seaorm_service().await?;
        let saved = svc.save(Song { id: "song-1".into(), title: "Help!".into(), artist: "The Beatles".into() }).await?;
        assert_eq!(saved.id, "song-1");
        let dup = svc.save(Song { id: "song-1".into(), title: "Help!".into(), artist: "The Beatles".into() }).await;
        assert!(matches!(dup, Err(ServiceError::Db(_))));
        Ok(())
    }

    #[tokio::test]
    async fn save_rejects_malformed_id() {
        let svc = CatalogService::new(Arc::new(InMemoryCatalogRepository::default()));
        let res = svc.save(Song { id: "../x".into(), title: "t".into(), artist: "a".into() }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn store_failure_is_surfaced() {
        let svc = CatalogService::new(Arc::new(InMemoryCatalogRepository::failing("connection refused")));
        let err = svc.search("x").await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(ref m) if m == "connection refused"));
    }
}
