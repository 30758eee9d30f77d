//! Database and API Models
//!
//! Rows are selected with camelCase column aliases so the same struct decodes
//! from a sqlx `PgRow` and from a Neon HTTP JSON row, and serializes to the
//! camelCase wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Version of the [`AuthSession`] shape served by `/api/auth/get-session`.
/// Payloads without a `version` tag are version 1.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

fn first_session_version() -> u32 {
    1
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub name: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Account role as stored by the admin plugin. A missing role means `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Moderator,
}

impl Role {
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Role::Admin,
            Some("moderator") => Role::Moderator,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role: Option<String>,
    pub banned: Option<bool>,
    pub ban_reason: Option<String>,
    pub ban_expires: Option<DateTime<Utc>>,
    pub grade_id: Option<String>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_db(self.role.as_deref())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    /// A ban without an expiry never lifts.
    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        if self.banned != Some(true) {
            return false;
        }
        match self.ban_expires {
            Some(expires) => expires > now,
            None => true,
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub impersonated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// The resolved session of a request: the session row and its owner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthSession {
    #[serde(default = "first_session_version")]
    pub version: u32,
    pub user: User,
    pub session: Session,
}

impl AuthSession {
    pub fn new(user: User, session: Session) -> Self {
        Self {
            version: SESSION_SCHEMA_VERSION,
            user,
            session,
        }
    }

    /// Whether this payload has the shape this build understands.
    pub fn is_current(&self) -> bool {
        self.version == SESSION_SCHEMA_VERSION
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
