use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{DueDateRangeQuery, TaskInput, TaskSearchQuery, TaskStatus, TaskStatusUpdate},
    services::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Creates a new task owned by the caller.
///
/// ## Request Body
/// `TaskInput`: `title` (3-100 chars, required), `description` (optional,
/// max 500 chars), `dueDate` (optional), `status` (required).
///
/// ## Responses
/// - `201 Created`: the new `Task`, with id, owner, and timestamps assigned.
/// - `400 Bad Request`: validation failure with a per-field error map.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(task_data.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Lists the caller's tasks, with optional search/filter parameters.
///
/// Criteria resolve first-match-wins: a non-empty `searchTerm` wins over
/// `status`, which wins over a complete `fromDate`/`toDate` pair; with no
/// criteria set, all of the caller's tasks are returned. `page` and `size`
/// are accepted but unused.
///
/// ## Query Parameters
/// - `searchTerm` (optional): case-insensitive substring over title or description.
/// - `status` (optional): `PENDING`, `IN_PROGRESS`, or `COMPLETED`.
/// - `fromDate`, `toDate` (optional): inclusive due-date range, RFC 3339.
#[get("")]
pub async fn search_tasks(
    tasks: web::Data<TaskService>,
    query: web::Query<TaskSearchQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let found = tasks.search(&query, user.user_id).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// Fetches a single task.
///
/// ## Responses
/// - `200 OK`: the `Task`.
/// - `403 Forbidden`: the task exists but belongs to another user.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_by_id(task_id.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces a task's title, description, due date, and status.
/// Existence and ownership checks match `get_task`; `updatedAt` is refreshed.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update(task_id.into_inner(), task_data.into_inner(), user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates only the status of a task.
#[patch("/{id}/status")]
pub async fn update_task_status(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    status_data: web::Json<TaskStatusUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update_status(task_id.into_inner(), status_data.status, user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Responds `204 No Content` on success.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    tasks.delete(task_id.into_inner(), user.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Lists the caller's tasks with the given status. The path segment uses
/// the wire form of the enum, e.g. `/api/tasks/status/IN_PROGRESS`.
#[get("/status/{status}")]
pub async fn get_tasks_by_status(
    tasks: web::Data<TaskService>,
    status: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let status: TaskStatus = status
        .parse()
        .map_err(AppError::BadRequest)?;
    let found = tasks.get_by_status(status, user.user_id).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// Lists the caller's tasks due within `[fromDate, toDate]`, inclusive.
/// Both bounds are required here, unlike the search endpoint.
#[get("/due-date")]
pub async fn get_tasks_by_due_date(
    tasks: web::Data<TaskService>,
    query: web::Query<DueDateRangeQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let found = tasks
        .get_by_due_date_range(query.from_date, query.to_date, user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(found))
}
