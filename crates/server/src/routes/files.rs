use axum::{
    body::Body,
    extract::{
        multipart::{Multipart, MultipartRejection},
        Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use models::ids::SongId;
use service::errors::ServiceError;
use service::files::SongFile;

use crate::errors::ApiError;
use crate::metrics::{HANDLER_ERRORS_TOTAL, STREAMS_TOTAL, UPLOADS_TOTAL, UPLOAD_BYTES_TOTAL};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

/// Store the multipart `file` field under `<upload_dir>/<file name>`.
/// Other fields are skipped; only the first `file` field is stored.
#[utoipa::path(post, path = "/upload", tag = "files",
    request_body(content = crate::openapi::UploadDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = String),
        (status = 400, description = "No file field or unusable file name", body = String),
        (status = 413, description = "Body exceeds the upload limit", body = String),
        (status = 500, description = "I/O failure", body = String)
    ))]
pub async fn upload_song(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::new(e.status(), e.body_text()))?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::bad_request("file field has no file name"))?;

        let mut upload = state.files.begin_upload(&file_name).await?;
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = upload.write_chunk(&chunk).await {
                        upload.abort().await;
                        return Err(e.into());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(file_name = %file_name, written = upload.written(), error = %e, "upload_interrupted");
                    upload.abort().await;
                    return Err(ApiError::new(e.status(), e.body_text()));
                }
            }
        }
        let bytes = upload.commit().await?;
        UPLOADS_TOTAL.inc();
        UPLOAD_BYTES_TOTAL.inc_by(bytes);
        info!(file_name = %file_name, bytes, "upload_stored");
        return Ok(Json("File uploaded successfully"));
    }

    Err(ApiError::bad_request("missing multipart field \"file\""))
}

/// Stream `<songs_dir>/<song_id>.mp3` as `audio/mpeg`. Errors are plain text.
#[utoipa::path(get, path = "/stream/{song_id}", tag = "files",
    params(("song_id" = String, Path, description = "Song identifier")),
    responses(
        (status = 200, description = "Audio bytes served as audio/mpeg"),
        (status = 404, description = "Song not found", body = String),
        (status = 500, description = "I/O failure", body = String)
    ))]
pub async fn stream_song(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    // 非法 id 不可能对应任何文件
    let Ok(song_id) = SongId::parse(&song_id) else {
        return Err(not_found());
    };
    match state.files.open_song(&song_id).await {
        Ok(SongFile { file, len }) => {
            STREAMS_TOTAL.inc();
            let body = Body::from_stream(ReaderStream::new(file));
            let headers = [
                (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
                (header::CONTENT_LENGTH, HeaderValue::from(len)),
            ];
            Ok((StatusCode::OK, headers, body).into_response())
        }
        Err(ServiceError::NotFound(_)) => {
            warn!(%song_id, "stream_missing");
            Err(not_found())
        }
        Err(e) => {
            HANDLER_ERRORS_TOTAL.inc();
            error!(%song_id, error = %e, "stream_open_failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn not_found() -> (StatusCode, String) {
    HANDLER_ERRORS_TOTAL.inc();
    (StatusCode::NOT_FOUND, "Song not found".to_string())
}
