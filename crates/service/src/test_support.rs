#![cfg(test)]
use sea_orm::DatabaseConnection;

/// Fresh in-memory store per test; no shared state between tests.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_memory().await
}

/// Unique scratch directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{}_{}", prefix, uuid::Uuid::new_v4()))
}
