//! Wisby RPC
//!
//! A typed HTTP client for the Wisby API. Paths, payloads and response bodies
//! come from [`wisby_core::api`], the same definitions the server is built
//! from, so a contract change shows up as a compile error on this side.
//!
//! ```no_run
//! # async fn run() -> Result<(), wisby_rpc::RpcError> {
//! use wisby_core::api::ListQuery;
//! use wisby_rpc::{ApiResponse, Client, ClientOptions};
//!
//! let options = ClientOptions::default().cookies([("better-auth.session_token", "...")]);
//! let client = Client::new("http://localhost:4000", options)?;
//! if let ApiResponse::Ok(page) = client.api().tasks().list(&ListQuery::page(1, 10)).await? {
//!     println!("{} tasks", page.meta.total_count);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod guard;
mod response;
mod routes;

pub use client::{BACKEND_URL_VAR, Client, ClientOptions, Credentials, cookie_header};
pub use error::RpcError;
pub use guard::{AUTH_URL_VAR, SessionGuard};
pub use response::ApiResponse;
pub use routes::{
    Api, AuthRoutes, GradeRoutes, IndexRoutes, SystemRoutes, TaskById, TaskRoutes, UserRoutes,
};
