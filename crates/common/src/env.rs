//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the writable data directories exist; warn when the optional static
/// assets directory is missing.
pub async fn ensure_env(static_dir: &str, data_dirs: &[&str]) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static assets directory not found; static assets may 404");
    }
    for dir in data_dirs {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_env_creates_data_dirs() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        let uploads = root.join("uploads");
        let songs = root.join("songs");
        let uploads_s = uploads.to_string_lossy().to_string();
        let songs_s = songs.to_string_lossy().to_string();

        ensure_env("/nonexistent-static-dir", &[&uploads_s, &songs_s]).await?;
        assert!(uploads.is_dir());
        assert!(songs.is_dir());

        // idempotent
        ensure_env("/nonexistent-static-dir", &[&uploads_s]).await?;

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
