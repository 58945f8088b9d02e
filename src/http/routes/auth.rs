use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{routing::post, Json, Router};
use serde::Deserialize;

use crate::application::auth_service::{AuthService, Registration};
use crate::http::types::ApiError;

pub fn router(auth: AuthService) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .with_state(auth)
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Responds with the bare token as `text/plain`.
async fn login(State(auth): State<AuthService>, payload: Result<Json<LoginBody>, JsonRejection>) -> Result<String, ApiError> {
    let Json(body) = payload?;
    Ok(auth.login(&body.username, &body.password)?)
}

#[derive(Deserialize)]
struct RegisterBody {
    username: Option<String>,
    email: Option<String>,
}

async fn register(State(auth): State<AuthService>, payload: Result<Json<RegisterBody>, JsonRejection>) -> Result<Json<Registration>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(auth.register(body.username.as_deref(), body.email.as_deref())?))
}
