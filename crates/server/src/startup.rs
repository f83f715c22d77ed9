use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use configs::AppConfig;
use service::runtime;

use crate::errors::StartupError;
use crate::metrics;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        // 无法监听信号时保持运行
        Err(e) => {
            error!(error = %e, "failed to listen for ctrl_c");
            std::future::pending::<()>().await
        }
    }
}

/// Load configuration from `config.toml` or the environment.
pub fn load_config() -> Result<AppConfig, StartupError> {
    dotenv().ok();
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Public entry: serve with `cfg` until Ctrl-C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_with_config(cfg, shutdown_signal()).await
}

/// Connect the store, build the router, and serve until `shutdown` resolves.
/// The database connection is closed after the server drains.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let storage = &cfg.storage;
    runtime::ensure_env(&storage.static_dir, &storage.upload_dir, &storage.songs_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::ensure_schema(&db)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    metrics::register_all();
    let state = AppState::from_db(db.clone(), storage);
    let app: Router = routes::build_router(state, build_cors(), &storage.static_dir);

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, upload_dir = %storage.upload_dir, songs_dir = %storage.songs_dir, "media catalog listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    info!("server stopped, closing database");
    models::db::close(db).await?;
    Ok(())
}
