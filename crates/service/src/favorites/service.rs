use std::sync::Arc;

use tracing::{info, instrument, warn};

use models::ids::{SongId, UserId};

use super::domain::{NewUser, User};
use super::repository::FavoritesRepository;
use crate::errors::ServiceError;

/// Favorites business service.
///
/// Unknown users are reported as `NotFound` rather than letting the store
/// match zero rows and acknowledge the write.
#[derive(Clone)]
pub struct FavoritesService {
    repo: Arc<dyn FavoritesRepository>,
}

impl FavoritesService {
    pub fn new(repo: Arc<dyn FavoritesRepository>) -> Self { Self { repo } }

    async fn require_user(&self, user_id: &UserId) -> Result<(), ServiceError> {
        if !self.repo.user_exists(user_id).await? {
            warn!(%user_id, "favorites_unknown_user");
            return Err(ServiceError::not_found(&format!("user {user_id}")));
        }
        Ok(())
    }

    /// Add `song_id` to the user's favorite-song-set. Idempotent.
    #[instrument(skip_all, fields(user_id = %user_id, song_id = %song_id))]
    pub async fn add_favorite(&self, user_id: &UserId, song_id: &SongId) -> Result<(), ServiceError> {
        self.require_user(user_id).await?;
        let added = self.repo.add_favorite(user_id, song_id).await?;
        info!(added, "favorite_saved");
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn list_favorites(&self, user_id: &UserId) -> Result<Vec<String>, ServiceError> {
        self.require_user(user_id).await?;
        self.repo.list_favorites(user_id).await
    }

    #[instrument(skip_all, fields(username = %input.username))]
    pub async fn create_user(&self, input: NewUser) -> Result<User, ServiceError> {
        let id = match input.id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(UserId::parse(raw)?),
        };
        let user = self.repo.create_user(id, &input.username).await?;
        info!(user_id = %user.id, "user_created");
        Ok(user)
    }
}
