//! Route groups. Each module exposes `routes()`, mounted by the registry under
//! its prefix.

pub mod auth;
pub mod grade;
pub mod index;
pub mod system;
pub mod tasks;
pub mod user;
