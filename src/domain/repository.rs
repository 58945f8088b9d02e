use async_trait::async_trait;
use chrono::NaiveDate;
use super::task::{Task, TaskDraft, TaskId};

#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, draft: TaskDraft) -> anyhow::Result<Task>;
    async fn get(&self, id: TaskId) -> anyhow::Result<Option<Task>>;
    async fn list_by_date(&self, date: NaiveDate) -> anyhow::Result<Vec<Task>>;
    /// Overwrites every mutable column of an existing row.
    async fn save(&self, task: &Task) -> anyhow::Result<()>;
    async fn delete(&self, id: TaskId) -> anyhow::Result<bool>;
    async fn count_by_date(&self, date: NaiveDate) -> anyhow::Result<i64>;
    async fn count_completed_by_date(&self, date: NaiveDate) -> anyhow::Result<i64>;
    /// Distinct dates with at least one incomplete task, ascending.
    async fn pending_dates(&self) -> anyhow::Result<Vec<NaiveDate>>;
}
