//! Process-wide handles.
//!
//! The database and auth instances are built once and shared by every request.
//! Binaries can also construct them directly and pass them through `AppState`;
//! these holders are the entry points for code that has no state to hand.

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

use crate::auth::{Auth, AuthConfig};
use crate::database::{Database, DatabaseKind};
use crate::error::CoreError;

/// A value constructed at most once per process.
///
/// Concurrent first calls to [`Singleton::get_or_try_init`] run the
/// initializer once; the others wait and receive the same instance. A failed
/// initializer leaves the slot empty so a later call can retry.
pub struct Singleton<T> {
    name: &'static str,
    cell: OnceCell<Arc<T>>,
}

impl<T> Singleton<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<T>, CoreError>
    where
        F: FnOnce() -> Result<T, CoreError>,
    {
        self.cell.get_or_try_init(|| init().map(Arc::new)).cloned()
    }

    pub fn get(&self) -> Result<Arc<T>, CoreError> {
        self.cell
            .get()
            .cloned()
            .ok_or(CoreError::Uninitialized(self.name))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

static DATABASE: Singleton<Database> = Singleton::new("database");
static AUTH: Singleton<Auth> = Singleton::new("auth");

/// Returns the process database, constructing it on the first call. Later
/// calls return the same instance and ignore their arguments.
pub fn init_database(
    connection_string: &str,
    kind: DatabaseKind,
) -> Result<Arc<Database>, CoreError> {
    DATABASE.get_or_try_init(|| Database::connect(connection_string, kind))
}

pub fn get_database() -> Result<Arc<Database>, CoreError> {
    DATABASE.get()
}

/// Returns the process auth instance, constructing it on the first call. A
/// repeat call keeps the first configuration.
pub fn setup_auth(config: AuthConfig) -> Result<Arc<Auth>, CoreError> {
    AUTH.get_or_try_init(|| {
        let auth = Auth::new(config)?;
        info!(plugins = ?auth.plugins(), "Auth initialized");
        Ok(auth)
    })
}

pub fn get_auth() -> Result<Arc<Auth>, CoreError> {
    AUTH.get()
}
