use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::RpcError;
use crate::response::ApiResponse;
use crate::routes::Api;

/// Environment variable holding the API's public URL.
pub const BACKEND_URL_VAR: &str = "NEXT_PUBLIC_BACKEND_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether the configured cookies travel with requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Include,
    SameOrigin,
    Omit,
}

impl Credentials {
    fn sends_cookies(self) -> bool {
        !matches!(self, Credentials::Omit)
    }
}

/// Joins cookies into a `Cookie` header value: `a=1; b=2`.
pub fn cookie_header<I, K, V>(cookies: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    cookies
        .into_iter()
        .map(|(name, value)| format!("{}={}", name.as_ref(), value.as_ref()))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    headers: Vec<(String, String)>,
    cookie: Option<String>,
    credentials: Credentials,
    timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            cookie: None,
            credentials: Credentials::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Forwards the caller's cookie store.
    pub fn cookies<I, K, V>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let header = cookie_header(cookies);
        self.cookie = (!header.is_empty()).then_some(header);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RpcError> {
    HeaderValue::from_str(value).map_err(|e| RpcError::InvalidHeader(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
    credentials: Credentials,
}

impl Client {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, RpcError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RpcError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RpcError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RpcError::InvalidHeader(e.to_string()))?;
            headers.insert(name, header_value(value)?);
        }
        if let Some(cookie) = &options.cookie {
            headers.insert(COOKIE, header_value(cookie)?);
        }
        if !options.credentials.sends_cookies() {
            headers.remove(COOKIE);
        }

        let http = reqwest::Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            http,
            base_url,
            headers,
            credentials: options.credentials,
        })
    }

    /// Builds a client for the URL in `NEXT_PUBLIC_BACKEND_URL`.
    pub fn from_env(options: ClientOptions) -> Result<Self, RpcError> {
        let base_url = std::env::var(BACKEND_URL_VAR)
            .map_err(|_| RpcError::InvalidBaseUrl(format!("{} is not set", BACKEND_URL_VAR)))?;
        Self::new(&base_url, options)
    }

    /// A copy of this client that sends `cookie` instead of its own cookies.
    pub fn forwarding_cookie(&self, cookie: &str) -> Result<Self, RpcError> {
        let mut client = self.clone();
        client.headers.remove(COOKIE);
        if client.credentials.sends_cookies() && !cookie.is_empty() {
            client.headers.insert(COOKIE, header_value(cookie)?);
        }
        Ok(client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn api(&self) -> Api<'_> {
        Api::new(self)
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, RpcError> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| RpcError::InvalidBaseUrl(format!("{}: {}", joined, e)))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RpcError> {
        Ok(self
            .http
            .request(method, self.url(path)?)
            .headers(self.headers.clone()))
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, RpcError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        debug!(url = %response.url(), status, "API response");
        let body = response.bytes().await?;
        ApiResponse::from_parts(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_assembly() {
        assert_eq!(
            cookie_header([("a", "1"), ("better-auth.session_token", "tok.sig")]),
            "a=1; better-auth.session_token=tok.sig"
        );
        assert_eq!(cookie_header(Vec::<(String, String)>::new()), "");
    }

    #[test]
    fn test_cookies_are_forwarded() {
        let client = Client::new(
            "http://localhost:4000",
            ClientOptions::default().cookies([("a", "1"), ("b", "2")]),
        )
        .unwrap();
        assert_eq!(client.headers().get(COOKIE).unwrap(), "a=1; b=2");
    }

    #[test]
    fn test_omit_strips_cookies() {
        let client = Client::new(
            "http://localhost:4000",
            ClientOptions::default()
                .header("cookie", "x=1")
                .cookies([("a", "1")])
                .credentials(Credentials::Omit),
        )
        .unwrap();
        assert!(client.headers().get(COOKIE).is_none());
        let forwarded = client.forwarding_cookie("a=1").unwrap();
        assert!(forwarded.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_custom_headers() {
        let client = Client::new(
            "http://localhost:4000",
            ClientOptions::default().header("x-request-id", "abc"),
        )
        .unwrap();
        assert_eq!(client.headers().get("x-request-id").unwrap(), "abc");

        let err = Client::new(
            "http://localhost:4000",
            ClientOptions::default().header("bad header", "abc"),
        )
        .unwrap_err();
        assert!(matches!(err, RpcError::InvalidHeader(_)));
    }

    #[test]
    fn test_url_joining() {
        let client = Client::new("http://localhost:4000/", ClientOptions::default()).unwrap();
        assert_eq!(
            client.url("/api/tasks").unwrap().as_str(),
            "http://localhost:4000/api/tasks"
        );
        assert!(matches!(
            Client::new("not a url", ClientOptions::default()),
            Err(RpcError::InvalidBaseUrl(_))
        ));
    }
}
