use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};
use crate::store::{TaskStore, UserStore};

/// In-memory `TaskStore`. Backs the test suites and lets the server run
/// without a database; a write lock over the map stands in for the
/// single-record atomicity Postgres provides.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tasks
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn save(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(newest_first(
            tasks
                .values()
                .filter(|t| t.user_id == owner_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_owner_and_status(
        &self,
        owner_id: Uuid,
        status: TaskStatus,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(newest_first(
            tasks
                .values()
                .filter(|t| t.user_id == owner_id && t.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_owner_and_text(
        &self,
        owner_id: Uuid,
        term: &str,
    ) -> Result<Vec<Task>, AppError> {
        let needle = term.to_lowercase();
        let tasks = self.tasks.read().await;
        Ok(newest_first(
            tasks
                .values()
                .filter(|t| {
                    t.user_id == owner_id
                        && (t.title.to_lowercase().contains(&needle)
                            || t.description
                                .as_ref()
                                .map(|d| d.to_lowercase().contains(&needle))
                                .unwrap_or(false))
                })
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_owner_and_due_range(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(newest_first(
            tasks
                .values()
                .filter(|t| {
                    t.user_id == owner_id
                        && t.due_date.map(|d| d >= from && d <= to).unwrap_or(false)
                })
                .cloned()
                .collect(),
        ))
    }

    async fn delete(&self, task: &Task) -> Result<(), AppError> {
        let mut tasks = self.tasks.write().await;
        tasks.remove(&task.id);
        Ok(())
    }
}

/// In-memory `UserStore`.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn save(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskInput;
    use chrono::Duration;

    fn task(owner: Uuid, title: &str, description: Option<&str>, status: TaskStatus) -> Task {
        Task::new(
            TaskInput {
                title: title.to_string(),
                description: description.map(|d| d.to_string()),
                due_date: None,
                status,
            },
            owner,
        )
    }

    #[actix_rt::test]
    async fn test_text_match_is_case_insensitive_over_title_and_description() {
        let store = MemoryTaskStore::new();
        let owner = Uuid::new_v4();

        let by_title = task(owner, "Buy MILK today", None, TaskStatus::Pending);
        let by_desc = task(owner, "Errands", Some("pick up milk"), TaskStatus::Pending);
        let neither = task(owner, "Taxes", Some("paperwork"), TaskStatus::Pending);
        store.save(&by_title).await.unwrap();
        store.save(&by_desc).await.unwrap();
        store.save(&neither).await.unwrap();

        let found = store.find_by_owner_and_text(owner, "milk").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| t.id != neither.id));
    }

    #[actix_rt::test]
    async fn test_due_range_is_inclusive_and_skips_undated() {
        let store = MemoryTaskStore::new();
        let owner = Uuid::new_v4();
        let from = Utc::now();
        let to = from + Duration::days(7);

        let mut on_from = task(owner, "At start", None, TaskStatus::Pending);
        on_from.due_date = Some(from);
        let mut on_to = task(owner, "At end", None, TaskStatus::Pending);
        on_to.due_date = Some(to);
        let mut outside = task(owner, "Later", None, TaskStatus::Pending);
        outside.due_date = Some(to + Duration::seconds(1));
        let undated = task(owner, "No due date", None, TaskStatus::Pending);

        for t in [&on_from, &on_to, &outside, &undated] {
            store.save(t).await.unwrap();
        }

        let found = store
            .find_by_owner_and_due_range(owner, from, to)
            .await
            .unwrap();
        let ids: Vec<Uuid> = found.iter().map(|t| t.id).collect();
        assert!(ids.contains(&on_from.id));
        assert!(ids.contains(&on_to.id));
        assert_eq!(found.len(), 2);
    }

    #[actix_rt::test]
    async fn test_owner_scoping() {
        let store = MemoryTaskStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store
            .save(&task(alice, "Alice task", None, TaskStatus::Pending))
            .await
            .unwrap();
        store
            .save(&task(bob, "Bob task", None, TaskStatus::Pending))
            .await
            .unwrap();

        assert_eq!(store.find_by_owner(alice).await.unwrap().len(), 1);
        assert_eq!(
            store
                .find_by_owner_and_status(bob, TaskStatus::Pending)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(store
            .find_by_owner_and_text(bob, "alice")
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_rt::test]
    async fn test_save_replaces_and_delete_removes() {
        let store = MemoryTaskStore::new();
        let owner = Uuid::new_v4();
        let mut t = task(owner, "Original", None, TaskStatus::Pending);
        store.save(&t).await.unwrap();

        t.title = "Renamed".to_string();
        store.save(&t).await.unwrap();
        assert_eq!(
            store.find_by_id(t.id).await.unwrap().unwrap().title,
            "Renamed"
        );

        store.delete(&t).await.unwrap();
        assert!(store.find_by_id(t.id).await.unwrap().is_none());
    }
}
