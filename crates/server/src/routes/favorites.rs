use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, Path, State},
    Form, Json,
};
use serde::Deserialize;

use models::ids::{SongId, UserId};
use service::favorites::domain::{NewUser, User};

use crate::errors::ApiError;
use crate::metrics::FAVORITES_ADDED_TOTAL;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FavoriteForm {
    #[serde(rename = "songID", default)]
    pub song_id: Option<String>,
}

#[utoipa::path(post, path = "/user/{user_id}/favorites", tag = "favorites",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body(content = crate::openapi::FavoriteFormDoc, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Song saved to favorites", body = String),
        (status = 400, description = "Malformed user or song id", body = String),
        (status = 404, description = "Unknown user", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn save_favorite(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    form: Result<Form<FavoriteForm>, FormRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    let user_id = UserId::parse(&user_id).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let raw_song = form.song_id.unwrap_or_default();
    let song_id = SongId::parse(&raw_song).map_err(|e| ApiError::bad_request(e.to_string()))?;

    state.favorites.add_favorite(&user_id, &song_id).await?;
    FAVORITES_ADDED_TOTAL.inc();
    Ok(Json("Song saved to favorites"))
}

#[utoipa::path(get, path = "/user/{user_id}/favorites", tag = "favorites",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Song ids in the user's favorite set", body = [String]),
        (status = 400, description = "Malformed user id", body = String),
        (status = 404, description = "Unknown user", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let user_id = UserId::parse(&user_id).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let songs = state.favorites.list_favorites(&user_id).await?;
    Ok(Json(songs))
}

#[utoipa::path(post, path = "/users", tag = "favorites",
    request_body = crate::openapi::NewUserDoc,
    responses(
        (status = 200, description = "Created user", body = crate::openapi::UserDoc),
        (status = 400, description = "Malformed user", body = String),
        (status = 500, description = "Store failure", body = String)
    ))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(input) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let user = state.favorites.create_user(input).await?;
    Ok(Json(user))
}
