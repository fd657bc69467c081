//! Login and the authenticated session
//!
//! The session is whatever cookies the login response sets. Nothing checks
//! that the login actually succeeded; a rejected login shows up later as
//! application errors on the listing endpoints.

use crate::api::client::{build_http_client, MOBILE_LOGIN_PATH};
use crate::api::headers::{build_headers, LOGIN_CSRF_TOKEN};
use crate::config::ApiConfig;
use crate::Result;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Login credentials
#[derive(Clone)]
pub struct Credentials {
    pub mobile: String,
    pub password: String,
}

impl Credentials {
    pub fn new(mobile: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("mobile", &self.mobile)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An HTTP client carrying the cookies of one login
///
/// Created once per run and never refreshed.
#[derive(Debug, Clone)]
pub struct AuthSession {
    client: Client,
}

impl AuthSession {
    /// Wraps a client that already carries its cookies
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Logs in with a mobile number and password
///
/// # Returns
///
/// * `Ok(AuthSession)` - The login request completed (whatever its outcome)
/// * `Err(CrawlError)` - The request could not be sent
pub async fn login(config: &ApiConfig, credentials: &Credentials) -> Result<AuthSession> {
    let jar = Arc::new(Jar::default());
    let client = build_http_client(config, jar.clone())?;
    let url = Url::parse(&config.base_url)?.join(MOBILE_LOGIN_PATH)?;

    tracing::info!("Logging in as {}", credentials.mobile);

    let form = [
        ("mobile", credentials.mobile.as_str()),
        ("password", credentials.password.as_str()),
    ];
    let response = client
        .post(url.clone())
        .headers(build_headers(config, LOGIN_CSRF_TOKEN)?)
        .form(&form[..])
        .send()
        .await?;

    let status = response.status();
    tracing::debug!("Response status code: {}", status);
    match response.text().await {
        Ok(body) => tracing::debug!("Response body: {}", body),
        Err(e) => tracing::debug!("Failed to read login response body: {}", e),
    }

    match jar.cookies(&url) {
        Some(cookies) => tracing::debug!(
            "Session cookies: {}",
            cookie_names(cookies.to_str().unwrap_or_default()).join(", ")
        ),
        None => tracing::warn!("Login response set no cookies"),
    }

    Ok(AuthSession::from_client(client))
}

/// Extracts the cookie names from a `Cookie` header value
fn cookie_names(header: &str) -> Vec<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.split('=').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
