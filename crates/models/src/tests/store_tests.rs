use anyhow::Result;
use sea_orm::EntityTrait;

use crate::db::{connect_memory, ensure_schema};
use crate::ids::{SongId, UserId};
use crate::{favorite, song, user};

#[tokio::test]
async fn ensure_schema_is_idempotent() -> Result<()> {
    let db = connect_memory().await?;
    ensure_schema(&db).await?;
    ensure_schema(&db).await?;
    Ok(())
}

#[tokio::test]
async fn search_matches_title_or_artist_case_insensitively() -> Result<()> {
    let db = connect_memory().await?;
    let yesterday = song::insert(&db, None, "Yesterday", "The Beatles").await?;
    song::insert(&db, None, "Bohemian Rhapsody", "Queen").await?;

    let hits = song::search(&db, "beatles").await?;
    assert_eq!(hits, vec![yesterday.clone()]);

    let hits = song::search(&db, "YESTER").await?;
    assert_eq!(hits, vec![yesterday]);

    assert!(song::search(&db, "xyz").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn search_folds_non_ascii_case() -> Result<()> {
    let db = connect_memory().await?;
    let ete = song::insert(&db, None, "ÉTÉ INDIEN", "Joe Dassin").await?;
    let arstid = song::insert(&db, None, "Straße", "ÅRSTID").await?;

    assert_eq!(song::search(&db, "été").await?, vec![ete.clone()]);
    assert_eq!(song::search(&db, "ÉTÉ").await?, vec![ete]);
    assert_eq!(song::search(&db, "årstid").await?, vec![arstid.clone()]);
    assert_eq!(song::search(&db, "straße").await?, vec![arstid]);
    Ok(())
}

#[tokio::test]
async fn empty_query_matches_everything() -> Result<()> {
    let db = connect_memory().await?;
    song::insert(&db, None, "One", "Metallica").await?;
    song::insert(&db, None, "Two", "Someone").await?;
    song::insert(&db, None, "Three", "Else").await?;
    assert_eq!(song::search(&db, "").await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn like_wildcards_are_literal() -> Result<()> {
    let db = connect_memory().await?;
    let pct = song::insert(&db, None, "100% Pure", "Anon").await?;
    song::insert(&db, None, "1000 Pure", "Anon").await?;
    song::insert(&db, None, "a_b", "x").await?;
    song::insert(&db, None, "acb", "x").await?;

    assert_eq!(song::search(&db, "100%").await?, vec![pct]);
    let underscore = song::search(&db, "a_b").await?;
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].title, "a_b");
    Ok(())
}

#[tokio::test]
async fn insert_assigns_id_and_keeps_duplicates() -> Result<()> {
    let db = connect_memory().await?;
    let a = song::insert(&db, None, "Yesterday", "The Beatles").await?;
    let b = song::insert(&db, None, "Yesterday", "The Beatles").await?;
    assert!(SongId::parse(&a.id).is_ok());
    assert_ne!(a.id, b.id);
    assert_eq!(song::Entity::find().all(&db).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn insert_with_existing_id_conflicts() -> Result<()> {
    let db = connect_memory().await?;
    let id = SongId::parse("fixed-id")?;
    let saved = song::insert(&db, Some(id.clone()), "Help!", "The Beatles").await?;
    assert_eq!(saved.id, "fixed-id");
    let dup = song::insert(&db, Some(id.clone()), "Help!", "The Beatles").await;
    assert!(matches!(dup, Err(crate::errors::ModelError::Db(_))));
    assert!(song::Entity::find_by_id("fixed-id").one(&db).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn user_create_and_lookup() -> Result<()> {
    let db = connect_memory().await?;
    let u = user::create(&db, Some(UserId::parse("u1")?), " alice ").await?;
    assert_eq!(u.username, "alice");
    assert!(user::exists(&db, &UserId::parse("u1")?).await?);
    assert!(!user::exists(&db, &UserId::parse("u2")?).await?);
    assert!(user::create(&db, None, "   ").await.is_err());
    Ok(())
}

#[tokio::test]
async fn favorites_are_a_set() -> Result<()> {
    let db = connect_memory().await?;
    let uid = UserId::parse("u1")?;
    user::create(&db, Some(uid.clone()), "alice").await?;
    let s1 = SongId::parse("s1")?;
    let s2 = SongId::parse("s2")?;

    assert!(favorite::add(&db, &uid, &s1).await?);
    assert!(!favorite::add(&db, &uid, &s1).await?);
    assert!(favorite::add(&db, &uid, &s2).await?);

    assert_eq!(favorite::list_for_user(&db, &uid).await?, vec!["s1".to_string(), "s2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn favorites_do_not_require_song_rows() -> Result<()> {
    let db = connect_memory().await?;
    let uid = UserId::parse("u1")?;
    user::create(&db, Some(uid.clone()), "alice").await?;
    // no referential integrity between favorites and the catalog
    assert!(favorite::add(&db, &uid, &SongId::parse("not-in-catalog")?).await?);
    Ok(())
}
