pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

/// Route table for the `/api` scope. Fixed segments (`/status/...`,
/// `/due-date`) are registered before the `/{id}` matchers.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::check_username)
            .service(auth::check_email),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::search_tasks)
            .service(tasks::create_task)
            .service(tasks::get_tasks_by_status)
            .service(tasks::get_tasks_by_due_date)
            .service(tasks::update_task_status)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
