//! HTTP Contract
//!
//! Paths, request payloads and response bodies shared by the API service and
//! the RPC client. Both sides compile against these definitions, so a route
//! whose shape changes breaks the client build instead of a runtime call.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{AuthSession, Session, User};

pub use crate::pagination::{Page, PageMeta};

pub const BASE_PATH: &str = "/api";

/// Route group prefixes, relative to [`BASE_PATH`].
pub mod paths {
    pub const INDEX: &str = "/";
    pub const TASKS: &str = "/tasks";
    pub const GRADE: &str = "/grade";
    pub const USER: &str = "/user";
    pub const SYSTEM: &str = "/system";
    pub const AUTH: &str = "/auth";
}

pub const REQUIRED: &str = "Required";
pub const NO_UPDATES: &str = "No updates provided";
pub const MAX_TASK_NAME: usize = 500;

/// Error body used by every non-2xx JSON response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raw list query. Values stay strings until [`crate::pagination::PageRequest`]
/// checks them, so malformed numbers surface as validation errors.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            ..Self::default()
        }
    }
}

fn checked_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::new(REQUIRED));
    }
    if name.chars().count() > MAX_TASK_NAME {
        return Err(ValidationError::new(format!(
            "String must contain at most {} character(s)",
            MAX_TASK_NAME
        )));
    }
    Ok(name.to_string())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateTask {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

/// A checked task insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub done: bool,
}

impl CreateTask {
    pub fn validate(&self) -> Result<NewTask, ValidationError> {
        Ok(NewTask {
            name: checked_name(&self.name)?,
            done: self.done.unwrap_or(false),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PatchTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

/// A checked, non-empty task update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub done: Option<bool>,
}

impl PatchTask {
    pub fn validate(&self) -> Result<TaskChanges, ValidationError> {
        if self.name.is_none() && self.done.is_none() {
            return Err(ValidationError::new(NO_UPDATES));
        }
        Ok(TaskChanges {
            name: self.name.as_deref().map(checked_name).transpose()?,
            done: self.done,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserGrade {
    pub grade_id: String,
}

impl UpdateUserGrade {
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let grade_id = self.grade_id.trim();
        if grade_id.is_empty() {
            return Err(ValidationError::new("Grade is required"));
        }
        Ok(grade_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateGrade {
    pub name: String,
}

impl CreateGrade {
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new(REQUIRED));
        }
        Ok(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl From<Option<AuthSession>> for AuthSnapshot {
    fn from(value: Option<AuthSession>) -> Self {
        match value {
            Some(AuthSession { user, session, .. }) => Self {
                user: Some(user),
                session: Some(session),
            },
            None => Self {
                user: None,
                session: None,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndexResponse {
    pub message: String,
    pub auth: AuthSnapshot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignOutResponse {
    pub success: bool,
}
