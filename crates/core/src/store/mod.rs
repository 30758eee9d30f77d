//! Data Access Traits
//!
//! Handlers and the auth layer talk to storage through these traits. The
//! Postgres/Neon-backed [`crate::database::Database`] implements them for
//! production; [`memory::MemoryStore`] implements them in memory for tests and
//! local runs without a database.

use async_trait::async_trait;

use crate::api::{NewTask, TaskChanges};
use crate::error::CoreError;
use crate::models::{AuthSession, Grade, Task, User};
use crate::pagination::PageRequest;

pub mod memory;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns one page of tasks and the total number of matching rows.
    async fn list_tasks(&self, request: &PageRequest) -> Result<(Vec<Task>, u64), CoreError>;

    async fn create_task(&self, task: &NewTask) -> Result<Task, CoreError>;

    async fn get_task(&self, id: i32) -> Result<Option<Task>, CoreError>;

    /// Applies the changes and bumps `updated_at`. `None` if no such task.
    async fn update_task(&self, id: i32, changes: &TaskChanges)
    -> Result<Option<Task>, CoreError>;

    /// `false` if no such task.
    async fn delete_task(&self, id: i32) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<Option<User>, CoreError>;

    async fn list_users(&self, request: &PageRequest) -> Result<(Vec<User>, u64), CoreError>;

    async fn set_user_grade(&self, user_id: &str, grade_id: &str)
    -> Result<Option<User>, CoreError>;
}

#[async_trait]
pub trait GradeStore: Send + Sync {
    async fn list_grades(&self) -> Result<Vec<Grade>, CoreError>;

    async fn get_grade(&self, id: &str) -> Result<Option<Grade>, CoreError>;

    async fn create_grade(&self, name: &str) -> Result<Grade, CoreError>;
}

/// Read access to sessions for the auth layer, plus sign-out.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks up a session by its token together with its user. Read only.
    async fn find_session(&self, token: &str) -> Result<Option<AuthSession>, CoreError>;

    async fn delete_session(&self, token: &str) -> Result<bool, CoreError>;
}

/// Everything a request handler may reach through the request context.
#[async_trait]
pub trait DataStore: TaskStore + UserStore + GradeStore + SessionStore {
    /// Short label of the backing driver, reported by the health route.
    fn driver(&self) -> &'static str;

    /// Round-trips a trivial query.
    async fn ping(&self) -> Result<String, CoreError>;
}
