use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Task not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Invalid credentials")]
    Authentication,
    #[error("Invalid token")]
    InvalidToken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
