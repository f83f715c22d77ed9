use sea_orm::{entity::prelude::*, Condition, ConnectionTrait, DatabaseConnection, DbBackend, QueryFilter, Set};
use sea_orm::sea_query::{BinOper, Expr, Func, SimpleExpr};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::ids::SongId;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "song")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub artist: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

const LIKE_ESCAPE: char = '\\';

/// Escape LIKE metacharacters so the query is matched literally.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// `LOWER(col) LIKE LOWER('%<query>%')`: both sides folded by the same
/// function. Backslash is the default LIKE escape on Postgres.
fn contains_ci(col: Column, query: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(query));
    Expr::expr(Func::lower(Expr::col((Entity, col))))
        .binary(BinOper::Like, Func::lower(Expr::val(pattern)))
}

fn matches_ci(song: &Model, needle: &str) -> bool {
    song.title.to_lowercase().contains(needle) || song.artist.to_lowercase().contains(needle)
}

/// Songs whose title or artist contains `query`, case-insensitively.
/// An empty query matches every song.
pub async fn search(db: &DatabaseConnection, query: &str) -> Result<Vec<Model>, errors::ModelError> {
    if db.get_database_backend() == DbBackend::Sqlite {
        // SQLite 的 LOWER 只折叠 ASCII，在进程内按 Unicode 比较
        let needle = query.to_lowercase();
        let rows = Entity::find().all(db).await?;
        return Ok(rows.into_iter().filter(|m| matches_ci(m, &needle)).collect());
    }
    let rows = Entity::find()
        .filter(
            Condition::any()
                .add(contains_ci(Column::Title, query))
                .add(contains_ci(Column::Artist, query)),
        )
        .all(db)
        .await?;
    Ok(rows)
}

/// Insert a new song. A missing id is assigned here; an explicit id that
/// already exists is a primary-key conflict reported as `ModelError::Db`.
pub async fn insert(db: &DatabaseConnection, id: Option<SongId>, title: &str, artist: &str) -> Result<Model, errors::ModelError> {
    let id = id.unwrap_or_else(SongId::generate);
    let am = ActiveModel {
        id: Set(id.into_inner()),
        title: Set(title.to_string()),
        artist: Set(artist.to_string()),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    #[test]
    fn escape_like_quotes_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn postgres_search_folds_both_sides() {
        let sql = Entity::find()
            .filter(contains_ci(Column::Title, "100%"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LOWER("song"."title") LIKE LOWER("#), "{sql}");
    }
}
