pub mod auth_service;
pub mod error;
pub mod task_service;
