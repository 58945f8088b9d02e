use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use todo_api::application::{auth_service::AuthService, task_service::TaskServiceImpl};
use todo_api::config::Config;
use todo_api::domain::{identity::{CredentialProvider, DemoCredentials}, repository::TaskRepository};
use todo_api::http::{cors, routes::{auth, health::HealthInfo, tasks}, routing};
use todo_api::infrastructure::sqlite_repo::SqliteTaskRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    prepare_sqlite_file(&config.database_url)?;
    let repo = SqliteTaskRepository::connect(&config.database_url).await?;
    repo.init().await?;

    let credentials: Arc<dyn CredentialProvider> = Arc::new(DemoCredentials::default());
    let service = TaskServiceImpl::new(repo, Arc::clone(&credentials));
    let auth_service = AuthService::new(config.jwt_secret.as_bytes(), credentials);

    let api = tasks::router(tasks::AppState { service }).merge(auth::router(auth_service));
    let router = routing::app(api, HealthInfo::new(config.environment.clone()), cors::layer(&config.allowed_origins)?);

    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, environment = %config.environment, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}

/// Creates the SQLite file and its parent directories for `sqlite://` URLs.
fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let raw = rest.split('?').next().unwrap_or(rest);
    if raw.is_empty() {
        return Ok(());
    }
    let path = windows_drive_path(raw).map_or_else(|| PathBuf::from(raw), PathBuf::from);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(())
}

/// `sqlite:///C:/data/tasks.db` carries a leading slash before the drive letter.
fn windows_drive_path(raw: &str) -> Option<&str> {
    if !cfg!(windows) {
        return None;
    }
    let bytes = raw.as_bytes();
    (bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':').then(|| &raw[1..])
}
