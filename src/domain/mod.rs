pub mod identity;
pub mod repository;
pub mod task;
