use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use service::catalog::domain::Song;

use crate::errors::ApiError;
use crate::metrics::SEARCHES_TOTAL;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring matched against title and artist, case-insensitive. Missing means match all.
    #[serde(default)]
    pub query: String,
}

#[utoipa::path(get, path = "/search", tag = "catalog", params(SearchQuery),
    responses(
        (status = 200, description = "Songs whose title or artist contains the query", body = [crate::openapi::SongDoc]),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<Song>>, ApiError> {
    SEARCHES_TOTAL.inc();
    let songs = state.catalog.search(&q.query).await?;
    Ok(Json(songs))
}

#[utoipa::path(post, path = "/songs", tag = "catalog",
    request_body = crate::openapi::SongDoc,
    responses(
        (status = 200, description = "Stored song with its id", body = crate::openapi::SongDoc),
        (status = 400, description = "Malformed song", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn save_song(
    State(state): State<AppState>,
    body: Result<Json<Song>, JsonRejection>,
) -> Result<Json<Song>, ApiError> {
    let Json(song) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let saved = state.catalog.save(song).await?;
    Ok(Json(saved))
}
