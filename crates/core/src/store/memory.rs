use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::{NewTask, TaskChanges};
use crate::error::CoreError;
use crate::models::{AuthSession, Grade, Session, Task, User};
use crate::pagination::{PageRequest, Sort};
use super::{DataStore, GradeStore, SessionStore, TaskStore, UserStore};

#[derive(Default)]
struct Tables {
    tasks: BTreeMap<i32, Task>,
    next_task_id: i32,
    users: HashMap<String, User>,
    sessions: HashMap<String, Session>,
    grades: BTreeMap<String, Grade>,
}

/// An in-memory [`DataStore`] for tests and database-less local runs.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.tables
            .write()
            .await
            .users
            .insert(user.id.clone(), user);
    }

    pub async fn insert_session(&self, session: Session) {
        self.tables
            .write()
            .await
            .sessions
            .insert(session.token.clone(), session);
    }

    pub async fn insert_grade(&self, grade: Grade) {
        self.tables
            .write()
            .await
            .grades
            .insert(grade.id.clone(), grade);
    }
}

fn page_of<T: Clone>(mut rows: Vec<T>, request: &PageRequest) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let page = if offset >= rows.len() {
        Vec::new()
    } else {
        rows.drain(offset..).take(request.limit as usize).collect()
    };
    (page, total)
}

fn matches_search(value: &str, search: Option<&str>) -> bool {
    match search {
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, request: &PageRequest) -> Result<(Vec<Task>, u64), CoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| matches_search(&t.name, request.search.as_deref()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if request.sort == Sort::Desc {
            rows.reverse();
        }
        Ok(page_of(rows, request))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, CoreError> {
        let mut tables = self.tables.write().await;
        tables.next_task_id += 1;
        let created = Task {
            id: tables.next_task_id,
            name: task.name.clone(),
            done: task.done,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_task(&self, id: i32) -> Result<Option<Task>, CoreError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn update_task(
        &self,
        id: i32,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, CoreError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            task.name = name.clone();
        }
        if let Some(done) = changes.done {
            task.done = done;
        }
        task.updated_at = Some(Utc::now());
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: i32) -> Result<bool, CoreError> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>, CoreError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn list_users(&self, request: &PageRequest) -> Result<(Vec<User>, u64), CoreError> {
        let tables = self.tables.read().await;
        let search = request.search.as_deref();
        let mut rows: Vec<User> = tables
            .users
            .values()
            .filter(|u| matches_search(&u.name, search) || matches_search(&u.email, search))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if request.sort == Sort::Desc {
            rows.reverse();
        }
        Ok(page_of(rows, request))
    }

    async fn set_user_grade(
        &self,
        user_id: &str,
        grade_id: &str,
    ) -> Result<Option<User>, CoreError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(user_id) else {
            return Ok(None);
        };
        user.grade_id = Some(grade_id.to_string());
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl GradeStore for MemoryStore {
    async fn list_grades(&self) -> Result<Vec<Grade>, CoreError> {
        let tables = self.tables.read().await;
        let mut grades: Vec<Grade> = tables.grades.values().cloned().collect();
        grades.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(grades)
    }

    async fn get_grade(&self, id: &str) -> Result<Option<Grade>, CoreError> {
        Ok(self.tables.read().await.grades.get(id).cloned())
    }

    async fn create_grade(&self, name: &str) -> Result<Grade, CoreError> {
        let grade = Grade {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.insert_grade(grade.clone()).await;
        Ok(grade)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_session(&self, token: &str) -> Result<Option<AuthSession>, CoreError> {
        let tables = self.tables.read().await;
        let Some(session) = tables.sessions.get(token) else {
            return Ok(None);
        };
        Ok(tables
            .users
            .get(&session.user_id)
            .map(|user| AuthSession::new(user.clone(), session.clone())))
    }

    async fn delete_session(&self, token: &str) -> Result<bool, CoreError> {
        Ok(self.tables.write().await.sessions.remove(token).is_some())
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    fn driver(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<String, CoreError> {
        Ok("hello world from DB!".to_string())
    }
}
