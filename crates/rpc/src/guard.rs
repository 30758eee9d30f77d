//! Front-end route guard backed by the session endpoint.

use tracing::{debug, warn};
use wisby_core::models::{Role, SESSION_SCHEMA_VERSION};
use wisby_core::navigation::{Navigation, decide, needs_session};

use crate::client::{Client, ClientOptions};
use crate::error::RpcError;
use crate::response::ApiResponse;

/// Environment variable holding the auth server's public URL.
pub const AUTH_URL_VAR: &str = "NEXT_PUBLIC_BETTER_AUTH_URL";

/// Decides page navigation for incoming page requests, fetching the session
/// only for paths whose outcome depends on it.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    client: Client,
}

impl SessionGuard {
    pub fn new(auth_url: &str) -> Result<Self, RpcError> {
        Ok(Self {
            client: Client::new(auth_url, ClientOptions::default())?,
        })
    }

    pub fn from_env() -> Result<Self, RpcError> {
        let auth_url = std::env::var(AUTH_URL_VAR)
            .map_err(|_| RpcError::InvalidBaseUrl(format!("{} is not set", AUTH_URL_VAR)))?;
        Self::new(&auth_url)
    }

    /// `cookie` is the page request's `Cookie` header, forwarded verbatim.
    pub async fn check(&self, path: &str, cookie: Option<&str>) -> Navigation {
        if !needs_session(path) {
            return Navigation::Next;
        }
        let role = self.session_role(cookie.unwrap_or_default()).await;
        decide(path, role)
    }

    /// The caller's role, or `None` when there is no session or it could not
    /// be fetched.
    async fn session_role(&self, cookie: &str) -> Option<Role> {
        let client = match self.client.forwarding_cookie(cookie) {
            Ok(client) => client,
            Err(err) => {
                debug!(error = %err, "Unusable cookie header; treating as signed out");
                return None;
            }
        };

        match client.api().auth().get_session().await {
            Ok(ApiResponse::Ok(Some(found))) if !found.is_current() => {
                warn!(
                    version = found.version,
                    expected = SESSION_SCHEMA_VERSION,
                    "Unsupported session schema; treating as signed out"
                );
                None
            }
            Ok(ApiResponse::Ok(found)) => found.map(|session| session.user.role()),
            Ok(other) => {
                debug!(status = other.status(), "Session lookup returned no session");
                None
            }
            Err(err) => {
                warn!(error = %err, "Session lookup failed; treating as signed out");
                None
            }
        }
    }
}
