use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};

use crate::application::error::{AppError, AppResult};
use crate::domain::identity::CredentialProvider;
use crate::domain::repository::TaskRepository;
use crate::domain::task::{description_too_long, NewTask, Task, TaskAnalytics, TaskId, TaskPatch, MAX_DESCRIPTION_LEN};

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<Task>>;
    async fn create(&self, input: NewTask) -> AppResult<Task>;
    async fn update(&self, id: TaskId, patch: TaskPatch) -> AppResult<Task>;
    /// Deleting an unknown id is a no-op.
    async fn delete(&self, id: TaskId) -> AppResult<()>;
    async fn count_by_date(&self, date: NaiveDate) -> AppResult<i64>;
    async fn count_completed_by_date(&self, date: NaiveDate) -> AppResult<i64>;
    async fn analytics(&self, date: NaiveDate) -> AppResult<TaskAnalytics>;
    async fn list_pending_dates(&self) -> AppResult<Vec<NaiveDate>>;
}

pub struct TaskServiceImpl<R: TaskRepository> {
    repo: R,
    identity: Arc<dyn CredentialProvider>,
}

impl<R: TaskRepository + Clone> Clone for TaskServiceImpl<R> {
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(), identity: Arc::clone(&self.identity) }
    }
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R, identity: Arc<dyn CredentialProvider>) -> Self { Self { repo, identity } }
}

fn today() -> NaiveDate { Local::now().date_naive() }

fn check_description(description: Option<&str>) -> AppResult<()> {
    if description_too_long(description) {
        return Err(AppError::Validation(format!("Description must be at most {MAX_DESCRIPTION_LEN} characters")));
    }
    Ok(())
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<Task>> {
        tracing::debug!(%date, "listing tasks");
        Ok(self.repo.list_by_date(date).await?)
    }

    async fn create(&self, input: NewTask) -> AppResult<Task> {
        check_description(input.description.as_deref())?;
        let draft = input.into_draft(self.identity.owner_id(), today());
        let task = self.repo.create(draft).await?;
        tracing::info!(id = task.id.0, date = %task.task_date, "task created");
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> AppResult<Task> {
        let Some(mut task) = self.repo.get(id).await? else { return Err(AppError::NotFound) };
        patch.apply(&mut task);
        check_description(task.description.as_deref())?;
        self.repo.save(&task).await?;
        tracing::info!(id = id.0, completed = task.completed, "task updated");
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> AppResult<()> {
        let removed = self.repo.delete(id).await?;
        tracing::info!(id = id.0, removed, "task deleted");
        Ok(())
    }

    async fn count_by_date(&self, date: NaiveDate) -> AppResult<i64> { Ok(self.repo.count_by_date(date).await?) }

    async fn count_completed_by_date(&self, date: NaiveDate) -> AppResult<i64> { Ok(self.repo.count_completed_by_date(date).await?) }

    async fn analytics(&self, date: NaiveDate) -> AppResult<TaskAnalytics> {
        let total = self.count_by_date(date).await?;
        let completed = self.count_completed_by_date(date).await?;
        Ok(TaskAnalytics::new(total, completed))
    }

    async fn list_pending_dates(&self) -> AppResult<Vec<NaiveDate>> { Ok(self.repo.pending_dates().await?) }
}
