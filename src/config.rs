use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_ENVIRONMENT: &str = "production";
const DEMO_JWT_SECRET: &str = "demo-secret-change-me-demo-secret-change-me";

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://task-gke.nadunwansooriya.online",
    "https://www.task-gke.nadunwansooriya.online",
    "http://task-gke.nadunwansooriya.online",
    "http://www.task-gke.nadunwansooriya.online",
    "http://localhost:3000",
    "http://localhost:8080",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub environment: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Reads the process environment; call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse::<SocketAddr>().with_context(|| format!("invalid BIND_ADDR {bind:?}"))?;

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using the built-in demo secret");
            DEMO_JWT_SECRET.to_string()
        });

        let allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
            Some(list) => list.split(',').map(str::trim).filter(|o| !o.is_empty()).map(String::from).collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr,
            jwt_secret,
            environment: var("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            allowed_origins,
        })
    }
}
