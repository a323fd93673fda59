use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};
use crate::store::{TaskStore, UserStore};

const TASK_COLUMNS: &str =
    "id, title, description, due_date, status, created_at, updated_at, user_id";

pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn save(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, due_date, status, created_at, updated_at, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET \
                 title = EXCLUDED.title, \
                 description = EXCLUDED.description, \
                 due_date = EXCLUDED.due_date, \
                 status = EXCLUDED.status, \
                 updated_at = EXCLUDED.updated_at \
             RETURNING {}",
            TASK_COLUMNS
        );
        let saved = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.status)
            .bind(task.created_at)
            .bind(task.updated_at)
            .bind(task.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_by_owner_and_status(
        &self,
        owner_id: Uuid,
        status: TaskStatus,
    ) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 AND status = $2 ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_by_owner_and_text(
        &self,
        owner_id: Uuid,
        term: &str,
    ) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE user_id = $1 AND (title ILIKE $2 OR description ILIKE $2) \
             ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let pattern = format!("%{}%", term);
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_by_owner_and_due_range(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE user_id = $1 AND due_date >= $2 AND due_date <= $3 \
             ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn delete(&self, task: &Task) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, roles, enabled, created_at";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash, roles, enabled, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET \
                 password_hash = EXCLUDED.password_hash, \
                 roles = EXCLUDED.roles, \
                 enabled = EXCLUDED.enabled \
             RETURNING {}",
            USER_COLUMNS
        );
        let saved = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.roles)
            .bind(user.enabled)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }
}
