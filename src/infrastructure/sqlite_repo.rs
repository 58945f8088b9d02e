use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TaskRepository,
    task::{Task, TaskDraft, TaskId},
};

const TASK_COLUMNS: &str = "id, title, description, completed, user_id, task_date, priority, category";

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTaskRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // Each connection to `sqlite::memory:` is a separate database.
        let max_connections = if database_url.starts_with("sqlite::memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("connecting to {database_url}"))?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT CHECK (description IS NULL OR length(description) <= 500),
                completed INTEGER NOT NULL DEFAULT 0,
                user_id TEXT NOT NULL,
                task_date TEXT NOT NULL,
                priority TEXT,
                category TEXT
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_task_date ON tasks (task_date)")
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task> {
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, completed, user_id, task_date, priority, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.completed)
        .bind(&draft.user_id)
        .bind(draft.task_date)
        .bind(&draft.priority)
        .bind(&draft.category)
        .execute(&*self.pool)
        .await?;
        Ok(Task {
            id: TaskId(result.last_insert_rowid()),
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            user_id: draft.user_id,
            task_date: draft.task_date,
            priority: draft.priority,
            category: draft.category,
        })
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_task).transpose()
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_date = ?1 ORDER BY id"))
            .bind(date)
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_task).collect()
    }

    async fn save(&self, task: &Task) -> Result<()> {
        sqlx::query(
            "UPDATE tasks SET title = ?2, description = ?3, completed = ?4, task_date = ?5, priority = ?6, category = ?7
             WHERE id = ?1",
        )
        .bind(task.id.0)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.task_date)
        .bind(&task.priority)
        .bind(&task.category)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_date(&self, date: NaiveDate) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE task_date = ?1")
            .bind(date)
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }

    async fn count_completed_by_date(&self, date: NaiveDate) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE task_date = ?1 AND completed = 1")
            .bind(date)
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }

    async fn pending_dates(&self) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar("SELECT DISTINCT task_date FROM tasks WHERE completed = 0 ORDER BY task_date ASC")
            .fetch_all(&*self.pool)
            .await?;
        Ok(dates)
    }
}

fn row_to_task(row: SqliteRow) -> Result<Task> {
    Ok(Task {
        id: TaskId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        user_id: row.try_get("user_id")?,
        task_date: row.try_get("task_date")?,
        priority: row.try_get("priority")?,
        category: row.try_get("category")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteTaskRepository {
        let repo = SqliteTaskRepository::connect("sqlite::memory:").await.unwrap();
        repo.init().await.unwrap();
        repo
    }

    fn draft(title: &str, date: NaiveDate, completed: bool) -> TaskDraft {
        TaskDraft { title: title.into(), description: Some("d".into()), completed, user_id: "admin".into(), task_date: date, priority: Some("low".into()), category: None }
    }

    fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, d).unwrap() }

    #[tokio::test]
    async fn create_get_save_delete() {
        let repo = repo().await;
        let mut task = repo.create(draft("a", day(1), false)).await.unwrap();
        assert_eq!(repo.get(task.id).await.unwrap(), Some(task.clone()));

        task.completed = true;
        task.category = Some("Work".into());
        repo.save(&task).await.unwrap();
        assert_eq!(repo.get(task.id).await.unwrap(), Some(task.clone()));

        assert!(repo.delete(task.id).await.unwrap());
        assert!(!repo.delete(task.id).await.unwrap());
        assert_eq!(repo.get(task.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn date_queries() {
        let repo = repo().await;
        repo.create(draft("a", day(2), false)).await.unwrap();
        repo.create(draft("b", day(2), true)).await.unwrap();
        repo.create(draft("c", day(1), false)).await.unwrap();
        repo.create(draft("d", day(3), true)).await.unwrap();
        repo.create(draft("e", day(1), false)).await.unwrap();

        assert_eq!(repo.list_by_date(day(2)).await.unwrap().len(), 2);
        assert!(repo.list_by_date(day(9)).await.unwrap().is_empty());
        assert_eq!(repo.count_by_date(day(2)).await.unwrap(), 2);
        assert_eq!(repo.count_completed_by_date(day(2)).await.unwrap(), 1);
        assert_eq!(repo.pending_dates().await.unwrap(), vec![day(1), day(2)]);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let repo = repo().await;
        let a = repo.create(draft("a", day(1), false)).await.unwrap();
        let b = repo.create(draft("b", day(1), false)).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
