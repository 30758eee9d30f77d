//! Wisby Core
//!
//! Shared building blocks for the Wisby backend: the database handle and its
//! two drivers, session authentication, the process-wide holders for both, and
//! the request/response types that make up the HTTP contract between the API
//! service and the typed RPC client.

pub mod api;
pub mod auth;
pub mod database;
pub mod error;
pub mod global;
pub mod models;
pub mod navigation;
pub mod pagination;
pub mod store;

pub use error::CoreError;
