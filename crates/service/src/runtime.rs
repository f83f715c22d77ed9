//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure upload/songs directories exist; warn on a missing static directory.
pub async fn ensure_env(static_dir: &str, upload_dir: &str, songs_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(static_dir, &[upload_dir, songs_dir]).await
}
