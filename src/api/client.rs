//! HTTP client for the listing endpoints
//!
//! This module handles all signed API calls made by the crawlers:
//! - Building the HTTP client with a cookie store and compression support
//! - Attaching the signing parameters and fixed headers to each call
//! - Turning every outcome, including network errors, into a [`ResponseClass`]

use crate::api::headers::build_headers;
use crate::api::response::{classify, ResponseClass};
use crate::api::session::AuthSession;
use crate::api::signing::RequestParams;
use crate::config::ApiConfig;
use crate::Result;
use reqwest::cookie::Jar;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Feed listing endpoint
pub const FLOW_LIST_PATH: &str = "/v2/flow/list";

/// Comment listing endpoint
pub const FLOW_REPLY_LIST_PATH: &str = "/api/circle/flowReplyList";

/// Mobile number + password login endpoint
pub const MOBILE_LOGIN_PATH: &str = "/api/login/mobile";

/// Builds an HTTP client that stores cookies in `jar`
///
/// Compression is negotiated by reqwest itself, which advertises
/// `gzip, br, deflate` the way the platform's web client does.
pub fn build_http_client(config: &ApiConfig, jar: Arc<Jar>) -> Result<Client> {
    let client = Client::builder()
        .cookie_provider(jar)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;
    Ok(client)
}

/// Signed form-POST client bound to an authenticated session
pub struct ApiClient {
    session: AuthSession,
    config: ApiConfig,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the session's platform
    pub fn new(session: AuthSession, config: ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            session,
            config,
            base_url,
        })
    }

    /// Resolves an endpoint path against the base URL
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Sends one signed listing request
    ///
    /// `time` and `t` are generated fresh and prepended to `form`; the
    /// matching nonce goes into the `X-Csrf-Token` header.
    ///
    /// # Returns
    ///
    /// The classification of the response. Network errors are reported as
    /// [`ResponseClass::TransportFailure`] without a status; only a broken
    /// endpoint path or header configuration yields `Err`.
    pub async fn post_listing(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<ResponseClass> {
        let url = self.endpoint_url(path)?;
        let params = RequestParams::generate();
        let headers = build_headers(&self.config, &params.csrf_token)?;

        let mut fields: Vec<(&str, String)> = Vec::with_capacity(form.len() + 2);
        fields.push(("time", params.current_time.clone()));
        fields.push(("t", params.signature.clone()));
        fields.extend(form.iter().cloned());

        tracing::debug!(
            "POST {} (time: {}, csrf token: {})",
            url,
            params.current_time,
            params.csrf_token
        );

        let response = match self
            .session
            .client()
            .post(url.clone())
            .headers(headers)
            .form(&fields)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Request to {} failed: {}", url, e);
                return Ok(ResponseClass::TransportFailure { status: None });
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to read response body from {}: {}", url, e);
                return Ok(ResponseClass::TransportFailure { status: None });
            }
        };

        let class = classify(status, &body);
        if !class.is_valid() {
            tracing::debug!("Full response: {}", String::from_utf8_lossy(&body));
        }

        Ok(class)
    }
}
