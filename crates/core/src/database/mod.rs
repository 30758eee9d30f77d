//! Database Handle
//!
//! A single [`Database`] value wraps one of two drivers: the Neon HTTP driver
//! for serverless-style deployments, or a pooled sqlx connection for
//! long-running processes. Queries are written once against [`SqlParam`] and
//! run on whichever driver the handle was built with.

use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::{Arguments, FromRow};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::CoreError;

pub mod neon;
mod queries;

use neon::NeonHttp;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Which driver to construct. Read from `DB_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseKind {
    #[default]
    Neon,
    Postgres,
}

impl DatabaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Neon => "neon",
            DatabaseKind::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neon" => Ok(DatabaseKind::Neon),
            "postgres" | "postgresql" | "pg" => Ok(DatabaseKind::Postgres),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown database type '{}', expected 'neon' or 'postgres'",
                other
            ))),
        }
    }
}

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i32),
    BigInt(i64),
    Text(String),
}

impl SqlParam {
    /// Neon takes every parameter in Postgres text format.
    fn to_text_json(&self) -> Value {
        match self {
            SqlParam::Null => Value::Null,
            SqlParam::Bool(b) => Value::String(b.to_string()),
            SqlParam::Int(n) => Value::String(n.to_string()),
            SqlParam::BigInt(n) => Value::String(n.to_string()),
            SqlParam::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::BigInt(value)
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Bool(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

fn pg_arguments(params: &[SqlParam]) -> Result<PgArguments, CoreError> {
    let mut args = PgArguments::default();
    for param in params {
        let added = match param {
            SqlParam::Null => args.add(None::<String>),
            SqlParam::Bool(b) => args.add(*b),
            SqlParam::Int(n) => args.add(*n),
            SqlParam::BigInt(n) => args.add(*n),
            SqlParam::Text(s) => args.add(s.clone()),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

#[derive(Clone)]
enum Driver {
    Neon(NeonHttp),
    Postgres(PgPool),
}

/// The process's database handle. Cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct Database {
    kind: DatabaseKind,
    connection_string: String,
    driver: Driver,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("kind", &self.kind)
            .finish()
    }
}

impl Database {
    /// Builds the handle without touching the network. The Postgres pool opens
    /// connections on first use, so this must run inside a Tokio runtime.
    pub fn connect(connection_string: &str, kind: DatabaseKind) -> Result<Self, CoreError> {
        let driver = match kind {
            DatabaseKind::Neon => Driver::Neon(NeonHttp::new(connection_string)?),
            DatabaseKind::Postgres => Driver::Postgres(
                PgPoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .connect_lazy(connection_string)?,
            ),
        };
        info!(kind = %kind, "Database initialized");
        Ok(Self {
            kind,
            connection_string: connection_string.to_string(),
            driver,
        })
    }

    pub fn kind(&self) -> DatabaseKind {
        self.kind
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Runs all pending migrations. Migrations always go over TCP; a Neon
    /// handle opens a short-lived single-connection pool for the run.
    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        let migrator = sqlx::migrate!("./migrations");
        match &self.driver {
            Driver::Postgres(pool) => migrator.run(pool).await?,
            Driver::Neon(_) => {
                let pool = PgPoolOptions::new()
                    .max_connections(1)
                    .connect(&self.connection_string)
                    .await?;
                migrator.run(&pool).await?;
                pool.close().await;
            }
        }
        Ok(())
    }

    pub(crate) async fn fetch_all<T>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<T>, CoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + DeserializeOwned + Send + Unpin,
    {
        match &self.driver {
            Driver::Postgres(pool) => {
                let rows = sqlx::query_as_with::<_, T, _>(sql, pg_arguments(params)?)
                    .fetch_all(pool)
                    .await?;
                Ok(rows)
            }
            Driver::Neon(neon) => neon
                .query(sql, params)
                .await?
                .rows
                .into_iter()
                .map(|row| serde_json::from_value(Value::Object(row)).map_err(CoreError::from))
                .collect(),
        }
    }

    pub(crate) async fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<T>, CoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + DeserializeOwned + Send + Unpin,
    {
        Ok(self.fetch_all(sql, params).await?.into_iter().next())
    }

    pub(crate) async fn fetch_one<T>(&self, sql: &str, params: &[SqlParam]) -> Result<T, CoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + DeserializeOwned + Send + Unpin,
    {
        self.fetch_optional(sql, params)
            .await?
            .ok_or(CoreError::Database(sqlx::Error::RowNotFound))
    }

    /// Returns the number of affected rows.
    pub(crate) async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64, CoreError> {
        match &self.driver {
            Driver::Postgres(pool) => {
                let result = sqlx::query_with(sql, pg_arguments(params)?)
                    .execute(pool)
                    .await?;
                Ok(result.rows_affected())
            }
            Driver::Neon(neon) => Ok(neon.query(sql, params).await?.row_count),
        }
    }
}
