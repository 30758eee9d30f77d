//! Shared Application State
//!
//! Holds the handles every request needs: the data store reached through the
//! request context, and the auth instance that resolves sessions.

use std::sync::Arc;
use wisby_core::auth::Auth;
use wisby_core::store::DataStore;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DataStore>,
    pub auth: Arc<Auth>,
}

impl AppState {
    pub fn new(db: Arc<dyn DataStore>, auth: Arc<Auth>) -> Arc<Self> {
        Arc::new(Self { db, auth })
    }
}
