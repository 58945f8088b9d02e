use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Local;
use serde::Serialize;

pub const SERVICE_NAME: &str = "todo-api";

#[derive(Debug, Clone)]
pub struct HealthInfo {
    pub environment: String,
    pub version: String,
}

impl HealthInfo {
    pub fn new(environment: impl Into<String>) -> Self {
        Self { environment: environment.into(), version: env!("CARGO_PKG_VERSION").to_string() }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
    pub environment: String,
    pub version: String,
}

pub fn router(info: HealthInfo) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .with_state(info)
}

async fn home(State(info): State<HealthInfo>) -> String {
    format!("Todo API is running! Version {}", info.version)
}

async fn health(State(info): State<HealthInfo>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "UP",
        timestamp: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        service: SERVICE_NAME,
        environment: info.environment,
        version: info.version,
    })
}
