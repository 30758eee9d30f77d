//! Session cookie format and attributes.
//!
//! The cookie value is `token.signature`, URL-encoded, where the signature is
//! the standard-base64 HMAC-SHA256 of the token under the auth secret.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use sha2::Sha256;

use crate::error::CoreError;

pub const DEFAULT_COOKIE_PREFIX: &str = "better-auth";
pub const SESSION_TOKEN: &str = "session_token";
const SECURE_PREFIX: &str = "__Secure-";
const SESSION_MAX_AGE_DAYS: i64 = 7;
// Standard base64 of a 32-byte MAC, padded.
const SIGNATURE_LEN: usize = 44;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 key derived from the auth secret.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    pub fn new(secret: &str) -> Result<Self, CoreError> {
        if secret.is_empty() {
            return Err(CoreError::InvalidConfig("auth secret must not be empty".to_string()));
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Produces the cookie value for `token`.
    pub fn sign(&self, token: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());
        urlencoding::encode(&format!("{}.{}", token, signature)).into_owned()
    }

    /// Returns the token if the cookie value carries a valid signature.
    pub fn verify(&self, raw: &str) -> Option<String> {
        let decoded = urlencoding::decode(raw).ok()?;
        let (token, signature) = decoded.rsplit_once('.')?;
        if token.is_empty() || signature.len() != SIGNATURE_LEN || !signature.ends_with('=') {
            return None;
        }
        let signature = STANDARD.decode(signature).ok()?;
        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(token.to_string())
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// Attributes of the session cookie.
///
/// Always `SameSite=None; Secure; HttpOnly; Partitioned`. The `Domain`
/// attribute is set only in production, which shares the session across
/// subdomains of the configured parent domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    prefix: String,
    domain: Option<String>,
}

impl CookiePolicy {
    pub fn new(production: bool, cookie_domain: Option<&str>) -> Self {
        Self {
            prefix: DEFAULT_COOKIE_PREFIX.to_string(),
            domain: cookie_domain
                .filter(|_| production)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }

    pub fn cross_subdomain_domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Name the session cookie is written under.
    pub fn session_cookie_name(&self) -> String {
        format!("{}{}.{}", SECURE_PREFIX, self.prefix, SESSION_TOKEN)
    }

    fn plain_cookie_name(&self) -> String {
        format!("{}.{}", self.prefix, SESSION_TOKEN)
    }

    /// Raw (still signed) session cookie value from a request's headers.
    pub fn read_session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        let jar = CookieJar::from_headers(headers);
        jar.get(&self.session_cookie_name())
            .or_else(|| jar.get(&self.plain_cookie_name()))
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn session_cookie(&self, signed_value: String) -> Cookie<'static> {
        let mut builder = Cookie::build((self.session_cookie_name(), signed_value))
            .path("/")
            .same_site(SameSite::None)
            .secure(true)
            .http_only(true)
            .partitioned(true)
            .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS));
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }

    /// Same attributes as the session cookie, expired, to clear it.
    pub fn expired_session_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}
