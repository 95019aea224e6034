//! The authentication collaborator.
//!
//! Google sign-in itself happens outside this service. In production an
//! authenticating reverse proxy (oauth2-proxy with the Google provider) sits
//! in front and forwards the signed-in identity as request headers.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};
use marc_core::{Identity, SessionStatus};

pub const DEFAULT_SIGN_IN_URL: &str = "/oauth2/start?rd=/";
pub const DEFAULT_SIGN_OUT_URL: &str = "/oauth2/sign_out";

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves the session for one request.
    async fn status(&self, headers: &HeaderMap) -> SessionStatus;

    /// Where the "Login dengan Google" button points.
    fn sign_in_url(&self) -> &str;

    fn sign_out_url(&self) -> &str;
}

/// Identity forwarded by an authenticating proxy.
#[derive(Debug, Clone)]
pub struct ProxySession {
    name_headers: Vec<HeaderName>,
    email_header: HeaderName,
    sign_in_url: String,
    sign_out_url: String,
}

impl Default for ProxySession {
    fn default() -> Self {
        Self {
            name_headers: vec![
                HeaderName::from_static("x-forwarded-preferred-username"),
                HeaderName::from_static("x-forwarded-user"),
            ],
            email_header: HeaderName::from_static("x-forwarded-email"),
            sign_in_url: DEFAULT_SIGN_IN_URL.to_string(),
            sign_out_url: DEFAULT_SIGN_OUT_URL.to_string(),
        }
    }
}

impl ProxySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the headers consulted for the display name, in priority order.
    pub fn with_name_headers(mut self, headers: Vec<HeaderName>) -> Self {
        self.name_headers = headers;
        self
    }

    pub fn with_email_header(mut self, header: HeaderName) -> Self {
        self.email_header = header;
        self
    }

    pub fn with_sign_in_url(mut self, url: impl Into<String>) -> Self {
        self.sign_in_url = url.into();
        self
    }

    pub fn with_sign_out_url(mut self, url: impl Into<String>) -> Self {
        self.sign_out_url = url.into();
        self
    }

    fn header<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

#[async_trait]
impl SessionProvider for ProxySession {
    async fn status(&self, headers: &HeaderMap) -> SessionStatus {
        let email = Self::header(headers, &self.email_header);
        let name = self
            .name_headers
            .iter()
            .find_map(|h| Self::header(headers, h))
            .or(email);

        match name {
            Some(name) => {
                let mut identity = Identity::new(name);
                identity.email = email.map(str::to_string);
                SessionStatus::Authenticated(identity)
            }
            None => SessionStatus::Unauthenticated,
        }
    }

    fn sign_in_url(&self) -> &str {
        &self.sign_in_url
    }

    fn sign_out_url(&self) -> &str {
        &self.sign_out_url
    }
}

/// The same status for every request. Used for local development and tests.
#[derive(Debug, Clone)]
pub struct StaticSession {
    status: SessionStatus,
    sign_in_url: String,
    sign_out_url: String,
}

impl StaticSession {
    pub fn new(status: SessionStatus) -> Self {
        Self {
            status,
            sign_in_url: DEFAULT_SIGN_IN_URL.to_string(),
            sign_out_url: DEFAULT_SIGN_OUT_URL.to_string(),
        }
    }

    pub fn with_sign_in_url(mut self, url: impl Into<String>) -> Self {
        self.sign_in_url = url.into();
        self
    }

    pub fn with_sign_out_url(mut self, url: impl Into<String>) -> Self {
        self.sign_out_url = url.into();
        self
    }

    pub fn signed_in(name: impl Into<String>) -> Self {
        Self::new(SessionStatus::Authenticated(Identity::new(name)))
    }

    pub fn signed_out() -> Self {
        Self::new(SessionStatus::Unauthenticated)
    }

    pub fn pending() -> Self {
        Self::new(SessionStatus::Pending)
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn status(&self, _headers: &HeaderMap) -> SessionStatus {
        self.status.clone()
    }

    fn sign_in_url(&self) -> &str {
        &self.sign_in_url
    }

    fn sign_out_url(&self) -> &str {
        &self.sign_out_url
    }
}
