//!
//! # Persistence abstractions
//!
//! `TaskStore` and `UserStore` are the seams between the service layer and
//! the backing database. The binary wires in the Postgres implementations;
//! the test suites run against the in-memory ones, which honor the same
//! contracts (case-insensitive text match, inclusive due-date range,
//! owner scoping).
//!
//! Single-record atomicity is the store's responsibility: the Postgres
//! implementations use single-row statements, the memory implementations
//! take a write lock over the whole map.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

/// Persistence for task records, keyed by owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts the task, or replaces the record with the same id.
    async fn save(&self, task: &Task) -> Result<Task, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError>;

    async fn find_by_owner_and_status(
        &self,
        owner_id: Uuid,
        status: TaskStatus,
    ) -> Result<Vec<Task>, AppError>;

    /// Case-insensitive substring match against title or description.
    async fn find_by_owner_and_text(
        &self,
        owner_id: Uuid,
        term: &str,
    ) -> Result<Vec<Task>, AppError>;

    /// Due date within `[from, to]`, both ends inclusive.
    async fn find_by_owner_and_due_range(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, AppError>;

    async fn delete(&self, task: &Task) -> Result<(), AppError>;
}

/// Persistence for user credentials and roles.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;

    async fn save(&self, user: &User) -> Result<User, AppError>;
}
