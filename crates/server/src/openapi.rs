use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct SongDoc {
    /// Empty or absent on input: assigned by the store.
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
}

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: String,
    pub username: String,
    pub favorite_songs: Vec<String>,
}

#[derive(ToSchema)]
pub struct NewUserDoc {
    pub id: Option<String>,
    pub username: String,
}

#[derive(ToSchema)]
pub struct FavoriteFormDoc {
    #[schema(rename = "songID")]
    pub song_id: String,
}

#[derive(ToSchema)]
pub struct UploadDoc {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::catalog::search,
        crate::routes::catalog::save_song,
        crate::routes::favorites::save_favorite,
        crate::routes::favorites::list_favorites,
        crate::routes::favorites::create_user,
        crate::routes::files::upload_song,
        crate::routes::files::stream_song,
    ),
    components(
        schemas(
            HealthResponse,
            SongDoc,
            UserDoc,
            NewUserDoc,
            FavoriteFormDoc,
            UploadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "catalog"),
        (name = "favorites"),
        (name = "files")
    )
)]
pub struct ApiDoc;
