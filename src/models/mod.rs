pub mod task;
pub mod user;

pub use task::{DueDateRangeQuery, Task, TaskInput, TaskSearchQuery, TaskStatus, TaskStatusUpdate};
pub use user::{User, UserResponse};
