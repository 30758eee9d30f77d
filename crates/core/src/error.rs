use crate::database::neon::NeonError;

/// Errors raised by the core layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A process-wide resource was read before it was set up.
    #[error("{0} not initialized")]
    Uninitialized(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Neon(#[from] NeonError),
    #[error("failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// A request payload failed validation. The message is shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
