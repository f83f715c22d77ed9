use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::ids::{SongId, UserId};

use super::domain::User;
use crate::errors::ServiceError;

/// Repository abstraction for users and their favorite-song-sets.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, ServiceError>;
    /// Add-if-absent; returns whether the set changed.
    async fn add_favorite(&self, user_id: &UserId, song_id: &SongId) -> Result<bool, ServiceError>;
    async fn list_favorites(&self, user_id: &UserId) -> Result<Vec<String>, ServiceError>;
    async fn create_user(&self, id: Option<UserId>, username: &str) -> Result<User, ServiceError>;
}

pub struct SeaOrmFavoritesRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl FavoritesRepository for SeaOrmFavoritesRepository {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, ServiceError> {
        Ok(models::user::exists(&self.db, user_id).await?)
    }

    async fn add_favorite(&self, user_id: &UserId, song_id: &SongId) -> Result<bool, ServiceError> {
        Ok(models::favorite::add(&self.db, user_id, song_id).await?)
    }

    async fn list_favorites(&self, user_id: &UserId) -> Result<Vec<String>, ServiceError> {
        Ok(models::favorite::list_for_user(&self.db, user_id).await?)
    }

    async fn create_user(&self, id: Option<UserId>, username: &str) -> Result<User, ServiceError> {
        let row = models::user::create(&self.db, id, username).await?;
        Ok(User { id: row.id, username: row.username, favorite_songs: Vec::new() })
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryFavoritesRepository {
        users: Mutex<HashMap<UserId, (String, BTreeSet<String>)>>, // id -> (username, favorites)
    }

    #[async_trait]
    impl FavoritesRepository for InMemoryFavoritesRepository {
        async fn user_exists(&self, user_id: &UserId) -> Result<bool, ServiceError> {
            Ok(self.users.lock().unwrap().contains_key(user_id))
        }

        async fn add_favorite(&self, user_id: &UserId, song_id: &SongId) -> Result<bool, ServiceError> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(user_id) {
                Some((_, favs)) => Ok(favs.insert(song_id.as_str().to_string())),
                // mirrors an update that matches zero documents
                None => Ok(false),
            }
        }

        async fn list_favorites(&self, user_id: &UserId) -> Result<Vec<String>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(user_id).map(|(_, favs)| favs.iter().cloned().collect()).unwrap_or_default())
        }

        async fn create_user(&self, id: Option<UserId>, username: &str) -> Result<User, ServiceError> {
            models::user::validate_username(username)?;
            let id = id.unwrap_or_else(UserId::generate);
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&id) {
                return Err(ServiceError::Db(format!("duplicate key: {id}")));
            }
            users.insert(id.clone(), (username.trim().to_string(), BTreeSet::new()));
            Ok(User { id: id.into_inner(), username: username.trim().to_string(), favorite_songs: Vec::new() })
        }
    }
}
