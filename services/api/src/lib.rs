//! Wisby API Library Crate
//!
//! The REST API behind the Wisby front ends: configuration, shared state, the
//! request-context middleware, route groups and the registry that mounts them.
//! The binaries in `bin/` are thin wrappers around this library.

pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod state;
