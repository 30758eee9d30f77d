//! Session Authentication
//!
//! [`Auth`] verifies the signed session cookie on a request and resolves it to
//! an [`AuthSession`]. It reads sessions written by the sign-in flow; it never
//! creates them.

use chrono::Utc;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::CoreError;
use crate::models::AuthSession;
use crate::store::SessionStore;

pub mod cookie;

pub use cookie::{CookiePolicy, SigningKey};

/// Origins allowed to make credentialed requests when none are configured.
pub const DEFAULT_TRUSTED_ORIGINS: &[&str] = &[
    "https://wisby2.donext.org",
    "https://wisby2api.donext.org",
    "http://localhost:3000",
    "http://localhost:4000",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPlugin {
    /// Roles and bans. Banned users have no session.
    Admin,
    /// Marker only: nothing here serves an OpenAPI reference. Recorded so the
    /// plugin list matches the auth server's configuration.
    OpenApi,
}

/// Plugins every instance carries, ahead of the configured ones.
const BUILTIN_PLUGINS: [AuthPlugin; 2] = [AuthPlugin::Admin, AuthPlugin::OpenApi];

pub struct AuthConfig {
    pub database: Arc<dyn SessionStore>,
    pub secret: String,
    pub plugins: Vec<AuthPlugin>,
    pub base_url: Option<String>,
    pub trusted_origins: Vec<String>,
    pub production: bool,
    pub cookie_domain: Option<String>,
}

impl AuthConfig {
    pub fn new(database: Arc<dyn SessionStore>, secret: impl Into<String>) -> Self {
        Self {
            database,
            secret: secret.into(),
            plugins: Vec::new(),
            base_url: None,
            trusted_origins: DEFAULT_TRUSTED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            production: false,
            cookie_domain: None,
        }
    }

    pub fn with_plugins(mut self, plugins: Vec<AuthPlugin>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_trusted_origins(mut self, origins: Vec<String>) -> Self {
        self.trusted_origins = origins;
        self
    }

    /// Enables cross-subdomain cookies under `cookie_domain` when `production`.
    pub fn with_environment(mut self, production: bool, cookie_domain: Option<String>) -> Self {
        self.production = production;
        self.cookie_domain = cookie_domain;
        self
    }
}

pub struct Auth {
    store: Arc<dyn SessionStore>,
    key: SigningKey,
    plugins: Vec<AuthPlugin>,
    cookies: CookiePolicy,
    base_url: Option<String>,
    trusted_origins: Vec<String>,
}

impl Auth {
    pub fn new(config: AuthConfig) -> Result<Self, CoreError> {
        let key = SigningKey::new(&config.secret)?;

        let mut plugins = BUILTIN_PLUGINS.to_vec();
        for plugin in config.plugins {
            if !plugins.contains(&plugin) {
                plugins.push(plugin);
            }
        }

        Ok(Self {
            store: config.database,
            key,
            plugins,
            cookies: CookiePolicy::new(config.production, config.cookie_domain.as_deref()),
            base_url: config.base_url,
            trusted_origins: config.trusted_origins,
        })
    }

    pub fn plugins(&self) -> &[AuthPlugin] {
        &self.plugins
    }

    pub fn has_plugin(&self, plugin: AuthPlugin) -> bool {
        self.plugins.contains(&plugin)
    }

    pub fn cookies(&self) -> &CookiePolicy {
        &self.cookies
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn trusted_origins(&self) -> &[String] {
        &self.trusted_origins
    }

    pub fn is_trusted_origin(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.trusted_origins
            .iter()
            .any(|trusted| trusted.trim_end_matches('/') == origin)
    }

    /// Signed cookie value for a session token.
    pub fn sign_token(&self, token: &str) -> String {
        self.key.sign(token)
    }

    fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        let raw = self.cookies.read_session_cookie(headers)?;
        let token = self.key.verify(&raw);
        if token.is_none() {
            debug!("session cookie failed signature check");
        }
        token
    }

    /// Resolves the request's session. `None` covers every way of not being
    /// signed in: no cookie, bad signature, unknown or expired session, and
    /// an active ban.
    pub async fn get_session(&self, headers: &HeaderMap) -> Result<Option<AuthSession>, CoreError> {
        let Some(token) = self.session_token(headers) else {
            return Ok(None);
        };
        let Some(found) = self.store.find_session(&token).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if found.session.is_expired_at(now) {
            debug!(session_id = %found.session.id, "session expired");
            return Ok(None);
        }
        if self.has_plugin(AuthPlugin::Admin) && found.user.is_banned_at(now) {
            debug!(user_id = %found.user.id, "session belongs to a banned user");
            return Ok(None);
        }
        Ok(Some(found))
    }

    /// Revokes the request's session. Returns whether a session was removed.
    pub async fn sign_out(&self, headers: &HeaderMap) -> Result<bool, CoreError> {
        match self.session_token(headers) {
            Some(token) => self.store.delete_session(&token).await,
            None => Ok(false),
        }
    }
}
