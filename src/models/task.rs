use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a task.
/// Corresponds to the `task_status` SQL enum; wire form is SCREAMING_SNAKE_CASE.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "IN_PROGRESS")]
    InProgress,
    #[sqlx(rename = "COMPLETED")]
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            other => Err(format!("Unknown task status: {}", other)),
        }
    }
}

/// Input payload for creating or fully updating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Between 3 and 100 characters.
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,

    /// At most 500 characters when present.
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    pub status: TaskStatus,
}

/// Payload for the status-only update endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

/// A task record as stored and as returned by the API.
///
/// Every task has exactly one owner (`user_id`); only that user may read,
/// mutate, or delete it. `created_at` is set once; `updated_at` is refreshed
/// by the service on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
}

impl Task {
    /// Builds a new task owned by `user_id`. Both timestamps start equal.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            status: input.status,
            created_at: now,
            updated_at: now,
            user_id,
        }
    }
}

/// Search/filter parameters for the task listing endpoint.
///
/// Resolution is first-match-wins: a non-empty `search_term` wins over
/// `status`, which wins over a complete `from_date`/`to_date` pair; with
/// nothing set, all of the caller's tasks are returned. `page` and `size`
/// are accepted for wire compatibility but not consulted by the query layer.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskSearchQuery {
    pub search_term: Option<String>,
    pub status: Option<TaskStatus>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub page: u32,
    pub size: u32,
}

impl Default for TaskSearchQuery {
    fn default() -> Self {
        Self {
            search_term: None,
            status: None,
            from_date: None,
            to_date: None,
            page: 0,
            size: 10,
        }
    }
}

/// Required date pair for the dedicated due-date range endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueDateRangeQuery {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
}
