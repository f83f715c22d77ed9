//! Per-user favorite-song-set.
//!
//! One row per `(user_id, song_id)`; the composite primary key makes the set
//! idempotent. `song_id` is not a foreign key.

use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use sea_orm::sea_query::OnConflict;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::ids::{SongId, UserId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_favorite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub song_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Add-if-absent. Returns whether a new row was written.
pub async fn add(db: &DatabaseConnection, user_id: &UserId, song_id: &SongId) -> Result<bool, errors::ModelError> {
    let am = ActiveModel {
        user_id: Set(user_id.as_str().to_string()),
        song_id: Set(song_id.as_str().to_string()),
    };
    let affected = Entity::insert(am)
        .on_conflict(
            OnConflict::columns([Column::UserId, Column::SongId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(affected > 0)
}

pub async fn list_for_user(db: &DatabaseConnection, user_id: &UserId) -> Result<Vec<String>, errors::ModelError> {
    let rows = Entity::find()
        .filter(Column::UserId.eq(user_id.as_str()))
        .order_by_asc(Column::SongId)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.song_id).collect())
}
