//!
//! # Task service
//!
//! CRUD and search orchestration over a `TaskStore`, with ownership
//! enforcement. Every operation takes the caller's id explicitly; identity
//! is resolved once at the transport boundary, never read from ambient
//! state. Id generation and timestamp assignment happen here, not in the
//! store.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskSearchQuery, TaskStatus};
use crate::store::TaskStore;

/// Compares a task's owner to the caller. Mismatch is an explicit
/// `AccessDenied`, which callers must handle; it is only ever raised after
/// existence has been confirmed.
pub fn verify_ownership(owner_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
    if owner_id != caller_id {
        return Err(AppError::AccessDenied);
    }
    Ok(())
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Fetches a task, mapping absence to `NotFound` and then checking
    /// ownership. The ordering means a caller probing someone else's
    /// nonexistent id sees `NotFound`, never `AccessDenied`.
    async fn load_owned(&self, task_id: Uuid, caller_id: Uuid) -> Result<Task, AppError> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task not found with ID: {}", task_id)))?;

        if let Err(e) = verify_ownership(task.user_id, caller_id) {
            warn!(
                "User {} tried to access task {} owned by {}",
                caller_id, task.id, task.user_id
            );
            return Err(e);
        }
        Ok(task)
    }

    pub async fn create(&self, input: TaskInput, caller_id: Uuid) -> Result<Task, AppError> {
        input.validate()?;
        info!("Creating new task for user: {}", caller_id);

        let task = Task::new(input, caller_id);
        let saved = self.store.save(&task).await?;
        info!("Task created with ID: {}", saved.id);
        Ok(saved)
    }

    pub async fn get_by_id(&self, task_id: Uuid, caller_id: Uuid) -> Result<Task, AppError> {
        info!("Fetching task with ID: {} for user: {}", task_id, caller_id);
        self.load_owned(task_id, caller_id).await
    }

    /// Replaces title, description, due date, and status; refreshes
    /// `updated_at`.
    pub async fn update(
        &self,
        task_id: Uuid,
        input: TaskInput,
        caller_id: Uuid,
    ) -> Result<Task, AppError> {
        input.validate()?;
        info!("Updating task with ID: {} for user: {}", task_id, caller_id);

        let mut task = self.load_owned(task_id, caller_id).await?;
        task.title = input.title;
        task.description = input.description;
        task.due_date = input.due_date;
        task.status = input.status;
        task.updated_at = Utc::now();

        let updated = self.store.save(&task).await?;
        info!("Task updated: {}", updated.id);
        Ok(updated)
    }

    /// Mutates only the status (and `updated_at`).
    pub async fn update_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        caller_id: Uuid,
    ) -> Result<Task, AppError> {
        info!(
            "Updating status of task with ID: {} to {} for user: {}",
            task_id, status, caller_id
        );

        let mut task = self.load_owned(task_id, caller_id).await?;
        task.status = status;
        task.updated_at = Utc::now();

        let updated = self.store.save(&task).await?;
        info!("Task status updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, task_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
        info!("Deleting task with ID: {} for user: {}", task_id, caller_id);

        let task = self.load_owned(task_id, caller_id).await?;
        self.store.delete(&task).await?;
        info!("Task deleted: {}", task_id);
        Ok(())
    }

    /// Resolves search criteria first-match-wins, in fixed priority order:
    /// non-empty text term, then status, then a complete due-date range,
    /// then all of the caller's tasks. Exactly one branch runs per call;
    /// criteria belonging to lower branches are silently ignored. An
    /// empty-string term does not take the text branch.
    pub async fn search(
        &self,
        criteria: &TaskSearchQuery,
        caller_id: Uuid,
    ) -> Result<Vec<Task>, AppError> {
        info!("Searching tasks for user: {} with criteria: {:?}", caller_id, criteria);

        let tasks = if let Some(term) = criteria
            .search_term
            .as_deref()
            .filter(|term| !term.is_empty())
        {
            self.store.find_by_owner_and_text(caller_id, term).await?
        } else if let Some(status) = criteria.status {
            self.store.find_by_owner_and_status(caller_id, status).await?
        } else if let (Some(from), Some(to)) = (criteria.from_date, criteria.to_date) {
            self.store
                .find_by_owner_and_due_range(caller_id, from, to)
                .await?
        } else {
            self.store.find_by_owner(caller_id).await?
        };

        info!(
            "Found {} tasks matching criteria for user: {}",
            tasks.len(),
            caller_id
        );
        Ok(tasks)
    }

    /// Dedicated entry point mirroring the status branch of `search`.
    pub async fn get_by_status(
        &self,
        status: TaskStatus,
        caller_id: Uuid,
    ) -> Result<Vec<Task>, AppError> {
        info!("Fetching tasks with status: {} for user: {}", status, caller_id);
        self.store.find_by_owner_and_status(caller_id, status).await
    }

    /// Dedicated entry point mirroring the due-date branch of `search`.
    pub async fn get_by_due_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        caller_id: Uuid,
    ) -> Result<Vec<Task>, AppError> {
        info!(
            "Fetching tasks with due date between {} and {} for user: {}",
            from, to, caller_id
        );
        self.store.find_by_owner_and_due_range(caller_id, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTaskStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    fn input(title: &str, status: TaskStatus) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("some details".to_string()),
            due_date: None,
            status,
        }
    }

    #[test]
    fn test_verify_ownership() {
        let owner = Uuid::new_v4();
        assert!(verify_ownership(owner, owner).is_ok());
        assert_eq!(
            verify_ownership(owner, Uuid::new_v4()),
            Err(AppError::AccessDenied)
        );
    }

    #[actix_rt::test]
    async fn test_create_then_get_round_trip() {
        let svc = service();
        let caller = Uuid::new_v4();
        let due = Utc::now() + Duration::days(3);

        let mut payload = input("Buy milk", TaskStatus::Pending);
        payload.due_date = Some(due);
        let created = svc.create(payload, caller).await.unwrap();

        assert_eq!(created.user_id, caller);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = svc.get_by_id(created.id, caller).await.unwrap();
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.description.as_deref(), Some("some details"));
        assert_eq!(fetched.due_date, Some(due));
        assert_eq!(fetched.status, TaskStatus::Pending);
        assert_eq!(fetched, created);
    }

    #[actix_rt::test]
    async fn test_create_rejects_bad_title() {
        let svc = service();
        let caller = Uuid::new_v4();

        let err = svc.create(input("ab", TaskStatus::Pending), caller).await.unwrap_err();
        match err {
            AppError::Validation(fields) => assert!(fields.contains_key("title")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_not_found_beats_access_denied() {
        let svc = service();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let task = svc
            .create(input("Owned task", TaskStatus::Pending), owner)
            .await
            .unwrap();

        // Nonexistent id: NotFound for everyone, owner or not.
        let missing = Uuid::new_v4();
        assert!(matches!(
            svc.get_by_id(missing, stranger).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            svc.delete(missing, owner).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        // Existing task, wrong caller: AccessDenied on every operation.
        assert_eq!(
            svc.get_by_id(task.id, stranger).await.unwrap_err(),
            AppError::AccessDenied
        );
        assert_eq!(
            svc.update(task.id, input("Stolen title", TaskStatus::Pending), stranger)
                .await
                .unwrap_err(),
            AppError::AccessDenied
        );
        assert_eq!(
            svc.update_status(task.id, TaskStatus::Completed, stranger)
                .await
                .unwrap_err(),
            AppError::AccessDenied
        );
        assert_eq!(
            svc.delete(task.id, stranger).await.unwrap_err(),
            AppError::AccessDenied
        );

        // The owner is unaffected.
        assert!(svc.get_by_id(task.id, owner).await.is_ok());
    }

    #[actix_rt::test]
    async fn test_update_replaces_fields_and_refreshes_updated_at() {
        let svc = service();
        let caller = Uuid::new_v4();
        let created = svc
            .create(input("Original title", TaskStatus::Pending), caller)
            .await
            .unwrap();

        let replacement = TaskInput {
            title: "New title".to_string(),
            description: None,
            due_date: Some(Utc::now() + Duration::days(1)),
            status: TaskStatus::InProgress,
        };
        let updated = svc.update(created.id, replacement, caller).await.unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.description, None);
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[actix_rt::test]
    async fn test_update_status_touches_only_status() {
        let svc = service();
        let caller = Uuid::new_v4();
        let created = svc
            .create(input("Keep my fields", TaskStatus::Pending), caller)
            .await
            .unwrap();

        let updated = svc
            .update_status(created.id, TaskStatus::Completed, caller)
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.due_date, created.due_date);
    }

    #[actix_rt::test]
    async fn test_search_term_wins_over_other_criteria() {
        let svc = service();
        let caller = Uuid::new_v4();
        svc.create(input("Buy milk", TaskStatus::Pending), caller)
            .await
            .unwrap();
        svc.create(input("File taxes", TaskStatus::Completed), caller)
            .await
            .unwrap();

        // Term and status both set: only the term branch runs, so the
        // COMPLETED filter is ignored and the PENDING milk task matches.
        let criteria = TaskSearchQuery {
            search_term: Some("milk".to_string()),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let found = svc.search(&criteria, caller).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Buy milk");
    }

    #[actix_rt::test]
    async fn test_empty_search_term_falls_through_to_status() {
        let svc = service();
        let caller = Uuid::new_v4();
        svc.create(input("Pending job", TaskStatus::Pending), caller)
            .await
            .unwrap();
        let done = svc
            .create(input("Finished job", TaskStatus::Completed), caller)
            .await
            .unwrap();

        let criteria = TaskSearchQuery {
            search_term: Some("".to_string()),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let found = svc.search(&criteria, caller).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, done.id);
    }

    #[actix_rt::test]
    async fn test_date_range_branch_needs_both_bounds() {
        let svc = service();
        let caller = Uuid::new_v4();
        let mut dated = input("Dated", TaskStatus::Pending);
        dated.due_date = Some(Utc::now() + Duration::days(1));
        svc.create(dated, caller).await.unwrap();
        svc.create(input("Undated", TaskStatus::Pending), caller)
            .await
            .unwrap();

        // Only fromDate set: the range branch is skipped and everything
        // owned by the caller comes back.
        let criteria = TaskSearchQuery {
            from_date: Some(Utc::now()),
            ..Default::default()
        };
        assert_eq!(svc.search(&criteria, caller).await.unwrap().len(), 2);

        let criteria = TaskSearchQuery {
            from_date: Some(Utc::now()),
            to_date: Some(Utc::now() + Duration::days(2)),
            ..Default::default()
        };
        let found = svc.search(&criteria, caller).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Dated");
    }

    #[actix_rt::test]
    async fn test_status_search_scenario() {
        let svc = service();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let task = svc
            .create(input("Buy milk", TaskStatus::Pending), u1)
            .await
            .unwrap();

        let pending = TaskSearchQuery {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        };
        let completed = TaskSearchQuery {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };

        assert_eq!(svc.search(&pending, u1).await.unwrap().len(), 1);
        assert!(svc.search(&pending, u2).await.unwrap().is_empty());

        svc.update_status(task.id, TaskStatus::Completed, u1)
            .await
            .unwrap();
        assert!(svc.search(&pending, u1).await.unwrap().is_empty());
        let found = svc.search(&completed, u1).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, task.id);
    }

    #[actix_rt::test]
    async fn test_dedicated_entry_points_match_search_branches() {
        let svc = service();
        let caller = Uuid::new_v4();
        let due = Utc::now() + Duration::days(2);
        let mut payload = input("Deadline work", TaskStatus::InProgress);
        payload.due_date = Some(due);
        let task = svc.create(payload, caller).await.unwrap();

        let by_status = svc
            .get_by_status(TaskStatus::InProgress, caller)
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].id, task.id);

        let by_range = svc
            .get_by_due_date_range(due - Duration::days(1), due + Duration::days(1), caller)
            .await
            .unwrap();
        assert_eq!(by_range.len(), 1);
        assert_eq!(by_range[0].id, task.id);

        assert!(svc
            .get_by_status(TaskStatus::Completed, caller)
            .await
            .unwrap()
            .is_empty());
    }
}
