use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::ids::UserId;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("username required".into()));
    }
    if name.chars().count() > 128 {
        return Err(errors::ModelError::Validation("username longer than 128 characters".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, id: Option<UserId>, username: &str) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    let id = id.unwrap_or_else(UserId::generate);
    let am = ActiveModel {
        id: Set(id.into_inner()),
        username: Set(username.trim().to_string()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: &UserId) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id.as_str().to_string()).one(db).await?)
}

pub async fn exists(db: &DatabaseConnection, id: &UserId) -> Result<bool, errors::ModelError> {
    Ok(find(db, id).await?.is_some())
}
