//! One accessor per route group, mirroring the server's registry.

use reqwest::Method;
use wisby_core::api::{
    BASE_PATH, CreateGrade, CreateTask, HealthResponse, IndexResponse, ListQuery, Page, PatchTask,
    SignOutResponse, UpdateUserGrade, paths,
};
use wisby_core::models::{AuthSession, Grade, Task, User};

use crate::client::Client;
use crate::error::RpcError;
use crate::response::ApiResponse;

fn endpoint(group: &str, rest: &str) -> String {
    if group == paths::INDEX {
        format!("{}{}", BASE_PATH, rest)
    } else {
        format!("{}{}{}", BASE_PATH, group, rest)
    }
}

/// Entry point for `/api`.
#[derive(Clone, Copy)]
pub struct Api<'a> {
    client: &'a Client,
}

impl<'a> Api<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn index(&self) -> IndexRoutes<'a> {
        IndexRoutes { client: self.client }
    }

    pub fn tasks(&self) -> TaskRoutes<'a> {
        TaskRoutes { client: self.client }
    }

    pub fn grade(&self) -> GradeRoutes<'a> {
        GradeRoutes { client: self.client }
    }

    pub fn user(&self) -> UserRoutes<'a> {
        UserRoutes { client: self.client }
    }

    pub fn system(&self) -> SystemRoutes<'a> {
        SystemRoutes { client: self.client }
    }

    pub fn auth(&self) -> AuthRoutes<'a> {
        AuthRoutes { client: self.client }
    }
}

#[derive(Clone, Copy)]
pub struct IndexRoutes<'a> {
    client: &'a Client,
}

impl IndexRoutes<'_> {
    pub async fn get(&self) -> Result<ApiResponse<IndexResponse>, RpcError> {
        let request = self
            .client
            .request(Method::GET, &endpoint(paths::INDEX, ""))?;
        self.client.send(request).await
    }
}

#[derive(Clone, Copy)]
pub struct TaskRoutes<'a> {
    client: &'a Client,
}

impl<'a> TaskRoutes<'a> {
    pub async fn list(&self, query: &ListQuery) -> Result<ApiResponse<Page<Task>>, RpcError> {
        let request = self
            .client
            .request(Method::GET, &endpoint(paths::TASKS, ""))?
            .query(query);
        self.client.send(request).await
    }

    pub async fn create(&self, payload: &CreateTask) -> Result<ApiResponse<Task>, RpcError> {
        let request = self
            .client
            .request(Method::POST, &endpoint(paths::TASKS, ""))?
            .json(payload);
        self.client.send(request).await
    }

    pub fn id(&self, id: i32) -> TaskById<'a> {
        TaskById {
            client: self.client,
            id,
        }
    }
}

/// `/api/tasks/{id}`.
#[derive(Clone, Copy)]
pub struct TaskById<'a> {
    client: &'a Client,
    id: i32,
}

impl TaskById<'_> {
    fn path(&self) -> String {
        endpoint(paths::TASKS, &format!("/{}", self.id))
    }

    pub async fn get(&self) -> Result<ApiResponse<Task>, RpcError> {
        let request = self.client.request(Method::GET, &self.path())?;
        self.client.send(request).await
    }

    pub async fn patch(&self, payload: &PatchTask) -> Result<ApiResponse<Task>, RpcError> {
        let request = self
            .client
            .request(Method::PATCH, &self.path())?
            .json(payload);
        self.client.send(request).await
    }

    pub async fn delete(&self) -> Result<ApiResponse<()>, RpcError> {
        let request = self.client.request(Method::DELETE, &self.path())?;
        self.client.send(request).await
    }
}

#[derive(Clone, Copy)]
pub struct GradeRoutes<'a> {
    client: &'a Client,
}

impl GradeRoutes<'_> {
    pub async fn list(&self) -> Result<ApiResponse<Vec<Grade>>, RpcError> {
        let request = self
            .client
            .request(Method::GET, &endpoint(paths::GRADE, ""))?;
        self.client.send(request).await
    }

    pub async fn create(&self, payload: &CreateGrade) -> Result<ApiResponse<Grade>, RpcError> {
        let request = self
            .client
            .request(Method::POST, &endpoint(paths::GRADE, ""))?
            .json(payload);
        self.client.send(request).await
    }
}

#[derive(Clone, Copy)]
pub struct UserRoutes<'a> {
    client: &'a Client,
}

impl UserRoutes<'_> {
    pub async fn me(&self) -> Result<ApiResponse<User>, RpcError> {
        let request = self
            .client
            .request(Method::GET, &endpoint(paths::USER, "/me"))?;
        self.client.send(request).await
    }

    pub async fn update_grade(
        &self,
        payload: &UpdateUserGrade,
    ) -> Result<ApiResponse<User>, RpcError> {
        let request = self
            .client
            .request(Method::PATCH, &endpoint(paths::USER, "/grade"))?
            .json(payload);
        self.client.send(request).await
    }

    /// Admin only.
    pub async fn list(&self, query: &ListQuery) -> Result<ApiResponse<Page<User>>, RpcError> {
        let request = self
            .client
            .request(Method::GET, &endpoint(paths::USER, ""))?
            .query(query);
        self.client.send(request).await
    }
}

#[derive(Clone, Copy)]
pub struct SystemRoutes<'a> {
    client: &'a Client,
}

impl SystemRoutes<'_> {
    pub async fn health(&self) -> Result<ApiResponse<HealthResponse>, RpcError> {
        let request = self
            .client
            .request(Method::GET, &endpoint(paths::SYSTEM, "/health"))?;
        self.client.send(request).await
    }
}

#[derive(Clone, Copy)]
pub struct AuthRoutes<'a> {
    client: &'a Client,
}

impl AuthRoutes<'_> {
    /// `Ok(None)` when the cookie carries no live session.
    pub async fn get_session(&self) -> Result<ApiResponse<Option<AuthSession>>, RpcError> {
        let request = self
            .client
            .request(Method::GET, &endpoint(paths::AUTH, "/get-session"))?;
        self.client.send(request).await
    }

    pub async fn sign_out(&self) -> Result<ApiResponse<SignOutResponse>, RpcError> {
        let request = self
            .client
            .request(Method::POST, &endpoint(paths::AUTH, "/sign-out"))?;
        self.client.send(request).await
    }
}
