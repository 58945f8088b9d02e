use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on `Task::description`, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TaskId(pub i64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub user_id: String,
    pub task_date: NaiveDate,
    pub priority: Option<String>,
    pub category: Option<String>,
}

/// Body of a create request. `userId` and `id` may be present on the wire but are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    pub task_date: Option<NaiveDate>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

/// Reads `completed` like a primitive boolean: `null` and absent both mean `false`.
fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A task ready to be inserted: owner and date already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub user_id: String,
    pub task_date: NaiveDate,
    pub priority: Option<String>,
    pub category: Option<String>,
}

impl NewTask {
    pub fn into_draft(self, owner: &str, today: NaiveDate) -> TaskDraft {
        TaskDraft {
            title: self.title,
            description: self.description,
            completed: self.completed,
            user_id: owner.to_string(),
            task_date: self.task_date.unwrap_or(today),
            priority: self.priority,
            category: self.category,
        }
    }
}

/// Partial update. `completed` has no "unset" state: when omitted it reads as `false`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    pub task_date: Option<NaiveDate>,
}

impl TaskPatch {
    /// Merges the patch into `task`.
    ///
    /// Title is trimmed and ignored when blank. Description is trimmed but may
    /// become empty. Priority and category are taken as-is when non-empty.
    /// `completed` is always overwritten.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            let title = title.trim();
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = self.description {
            task.description = Some(description.trim().to_string());
        }
        if let Some(priority) = self.priority.filter(|p| !p.is_empty()) {
            task.priority = Some(priority);
        }
        if let Some(category) = self.category.filter(|c| !c.is_empty()) {
            task.category = Some(category);
        }
        task.completed = self.completed;
        if let Some(date) = self.task_date {
            task.task_date = date;
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskAnalytics {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
}

impl TaskAnalytics {
    pub fn new(total: i64, completed: i64) -> Self {
        Self { total, completed, pending: total - completed }
    }
}

pub fn description_too_long(description: Option<&str>) -> bool {
    description.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Task {
        Task {
            id: TaskId(7),
            title: "Old".into(),
            description: Some("old desc".into()),
            completed: true,
            user_id: "admin".into(),
            task_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            priority: Some("low".into()),
            category: Some("Work".into()),
        }
    }

    #[test]
    fn blank_title_keeps_previous() {
        let mut task = existing();
        TaskPatch { title: Some("   ".into()), completed: true, ..Default::default() }.apply(&mut task);
        assert_eq!(task.title, "Old");
    }

    #[test]
    fn title_is_trimmed() {
        let mut task = existing();
        TaskPatch { title: Some("  New  ".into()), ..Default::default() }.apply(&mut task);
        assert_eq!(task.title, "New");
    }

    #[test]
    fn description_trimmed_and_may_be_emptied() {
        let mut task = existing();
        TaskPatch { description: Some("   ".into()), ..Default::default() }.apply(&mut task);
        assert_eq!(task.description.as_deref(), Some(""));

        let mut task = existing();
        TaskPatch { description: Some(" x ".into()), ..Default::default() }.apply(&mut task);
        assert_eq!(task.description.as_deref(), Some("x"));
    }

    #[test]
    fn empty_priority_and_category_are_ignored_but_not_trimmed() {
        let mut task = existing();
        TaskPatch { priority: Some(String::new()), category: Some(" Home ".into()), ..Default::default() }.apply(&mut task);
        assert_eq!(task.priority.as_deref(), Some("low"));
        assert_eq!(task.category.as_deref(), Some(" Home "));
    }

    #[test]
    fn completed_always_overwritten() {
        let mut task = existing();
        TaskPatch::default().apply(&mut task);
        assert!(!task.completed);
        assert_eq!(task.title, "Old");
        assert_eq!(task.description.as_deref(), Some("old desc"));
        assert_eq!(task.task_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn task_date_replaced_when_given() {
        let mut task = existing();
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        TaskPatch { task_date: Some(date), ..Default::default() }.apply(&mut task);
        assert_eq!(task.task_date, date);
    }

    #[test]
    fn patch_wire_format_defaults_completed_to_false() {
        let patch: TaskPatch = serde_json::from_str(r#"{"title":"a","taskDate":"2024-01-02"}"#).unwrap();
        assert!(!patch.completed);
        assert_eq!(patch.task_date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn null_completed_reads_as_false() {
        let patch: TaskPatch = serde_json::from_str(r#"{"title":"b","completed":null}"#).unwrap();
        assert!(!patch.completed);
        let patch: TaskPatch = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(patch.completed);

        let input: NewTask = serde_json::from_str(r#"{"title":"a","completed":null}"#).unwrap();
        assert!(!input.completed);
        let input: NewTask = serde_json::from_str(r#"{"title":"a"}"#).unwrap();
        assert!(!input.completed);
    }

    #[test]
    fn task_serializes_camel_case() {
        let value = serde_json::to_value(existing()).unwrap();
        assert_eq!(value["userId"], "admin");
        assert_eq!(value["taskDate"], "2024-05-01");
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn description_limit_counts_chars() {
        assert!(!description_too_long(None));
        assert!(!description_too_long(Some(&"é".repeat(500))));
        assert!(description_too_long(Some(&"a".repeat(501))));
    }

    #[test]
    fn analytics_pending_is_difference() {
        assert_eq!(TaskAnalytics::new(5, 2).pending, 3);
    }
}
