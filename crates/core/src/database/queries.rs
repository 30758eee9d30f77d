//! SQL for the store traits. Nullable parameters carry explicit casts because
//! a SQL NULL is bound as text.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::{NewTask, TaskChanges};
use crate::error::CoreError;
use crate::models::{AuthSession, Grade, Session, Task, User};
use crate::pagination::PageRequest;
use crate::store::{DataStore, GradeStore, SessionStore, TaskStore, UserStore};
use super::{Database, SqlParam};

const TASK_COLUMNS: &str =
    r#"id, name, done, created_at AS "createdAt", updated_at AS "updatedAt""#;

const USER_COLUMNS: &str = r#"id, name, email, email_verified AS "emailVerified", image,
    created_at AS "createdAt", updated_at AS "updatedAt", role, banned,
    ban_reason AS "banReason", ban_expires AS "banExpires", grade_id AS "gradeId""#;

const SESSION_COLUMNS: &str = r#"id, token, user_id AS "userId", expires_at AS "expiresAt",
    ip_address AS "ipAddress", user_agent AS "userAgent",
    impersonated_by AS "impersonatedBy", created_at AS "createdAt", updated_at AS "updatedAt""#;

const GRADE_COLUMNS: &str = r#"id, name, created_at AS "createdAt""#;

#[derive(FromRow, Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(FromRow, Deserialize)]
struct TextRow {
    text: String,
}

fn like_pattern(search: Option<&str>) -> SqlParam {
    search
        .map(|s| {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
        .into()
}

fn page_params(request: &PageRequest) -> [SqlParam; 3] {
    [
        like_pattern(request.search.as_deref()),
        SqlParam::BigInt(i64::from(request.limit)),
        SqlParam::BigInt(i64::try_from(request.offset()).unwrap_or(i64::MAX)),
    ]
}

impl Database {
    async fn count(&self, sql: &str, params: &[SqlParam]) -> Result<u64, CoreError> {
        let row: CountRow = self.fetch_one(sql, params).await?;
        Ok(u64::try_from(row.count).unwrap_or(0))
    }
}

#[async_trait]
impl TaskStore for Database {
    async fn list_tasks(&self, request: &PageRequest) -> Result<(Vec<Task>, u64), CoreError> {
        let order = request.sort.as_sql();
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE ($1::text IS NULL OR name ILIKE $1)
             ORDER BY created_at {order}, id {order}
             LIMIT $2 OFFSET $3"
        );
        let params = page_params(request);
        let rows = self.fetch_all(&sql, &params).await?;
        let total = self
            .count(
                r#"SELECT COUNT(*) AS "count" FROM tasks WHERE ($1::text IS NULL OR name ILIKE $1)"#,
                &params[..1],
            )
            .await?;
        Ok((rows, total))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, CoreError> {
        let sql =
            format!("INSERT INTO tasks (name, done) VALUES ($1, $2) RETURNING {TASK_COLUMNS}");
        self.fetch_one(&sql, &[task.name.as_str().into(), task.done.into()])
            .await
    }

    async fn get_task(&self, id: i32) -> Result<Option<Task>, CoreError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        self.fetch_optional(&sql, &[id.into()]).await
    }

    async fn update_task(
        &self,
        id: i32,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, CoreError> {
        let sql = format!(
            "UPDATE tasks
             SET name = COALESCE($2::text, name),
                 done = COALESCE($3::boolean, done),
                 updated_at = now()
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        );
        self.fetch_optional(
            &sql,
            &[id.into(), changes.name.clone().into(), changes.done.into()],
        )
        .await
    }

    async fn delete_task(&self, id: i32) -> Result<bool, CoreError> {
        let affected = self
            .execute("DELETE FROM tasks WHERE id = $1", &[id.into()])
            .await?;
        Ok(affected > 0)
    }
}

#[async_trait]
impl UserStore for Database {
    async fn get_user(&self, id: &str) -> Result<Option<User>, CoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        self.fetch_optional(&sql, &[id.into()]).await
    }

    async fn list_users(&self, request: &PageRequest) -> Result<(Vec<User>, u64), CoreError> {
        let order = request.sort.as_sql();
        let filter = "($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)";
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {filter}
             ORDER BY created_at {order}, id {order}
             LIMIT $2 OFFSET $3"
        );
        let params = page_params(request);
        let rows = self.fetch_all(&sql, &params).await?;
        let count_sql = format!(r#"SELECT COUNT(*) AS "count" FROM users WHERE {filter}"#);
        let total = self.count(&count_sql, &params[..1]).await?;
        Ok((rows, total))
    }

    async fn set_user_grade(
        &self,
        user_id: &str,
        grade_id: &str,
    ) -> Result<Option<User>, CoreError> {
        let sql = format!(
            "UPDATE users SET grade_id = $2, updated_at = now() WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        self.fetch_optional(&sql, &[user_id.into(), grade_id.into()])
            .await
    }
}

#[async_trait]
impl GradeStore for Database {
    async fn list_grades(&self) -> Result<Vec<Grade>, CoreError> {
        let sql = format!("SELECT {GRADE_COLUMNS} FROM grades ORDER BY name ASC");
        self.fetch_all(&sql, &[]).await
    }

    async fn get_grade(&self, id: &str) -> Result<Option<Grade>, CoreError> {
        let sql = format!("SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1");
        self.fetch_optional(&sql, &[id.into()]).await
    }

    async fn create_grade(&self, name: &str) -> Result<Grade, CoreError> {
        let sql =
            format!("INSERT INTO grades (id, name) VALUES ($1, $2) RETURNING {GRADE_COLUMNS}");
        self.fetch_one(&sql, &[Uuid::new_v4().to_string().into(), name.into()])
            .await
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn find_session(&self, token: &str) -> Result<Option<AuthSession>, CoreError> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE token = $1");
        let Some(session) = self.fetch_optional::<Session>(&sql, &[token.into()]).await? else {
            return Ok(None);
        };
        let user = self.get_user(&session.user_id).await?;
        Ok(user.map(|user| AuthSession::new(user, session)))
    }

    async fn delete_session(&self, token: &str) -> Result<bool, CoreError> {
        let affected = self
            .execute("DELETE FROM sessions WHERE token = $1", &[token.into()])
            .await?;
        Ok(affected > 0)
    }
}

#[async_trait]
impl DataStore for Database {
    fn driver(&self) -> &'static str {
        self.kind().as_str()
    }

    async fn ping(&self) -> Result<String, CoreError> {
        let row: TextRow = self
            .fetch_one(r#"SELECT 'hello world from DB!'::text AS "text""#, &[])
            .await?;
        Ok(row.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Sort;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(
            like_pattern(Some("50%_off")),
            SqlParam::Text("%50\\%\\_off%".to_string())
        );
        assert_eq!(like_pattern(None), SqlParam::Null);
    }

    #[test]
    fn test_page_params() {
        let request = PageRequest {
            page: 3,
            limit: 25,
            sort: Sort::Asc,
            search: None,
        };
        let [search, limit, offset] = page_params(&request);
        assert_eq!(search, SqlParam::Null);
        assert_eq!(limit, SqlParam::BigInt(25));
        assert_eq!(offset, SqlParam::BigInt(50));
    }
}
