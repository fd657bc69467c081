//! Fixed browser-like header set
//!
//! The platform rejects requests that do not look like they came from its
//! own web client, so every call carries the same headers apart from the
//! per-request CSRF token.

use crate::config::ApiConfig;
use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER};
use url::Url;

pub const CSRF_TOKEN_HEADER: &str = "x-csrf-token";

/// Token the web client sends before it has generated a real one
pub const LOGIN_CSRF_TOKEN: &str = "1";

/// Builds the header set for a request
///
/// # Arguments
///
/// * `config` - API settings supplying origin, referer and locale
/// * `csrf_token` - Value of the `X-Csrf-Token` header for this request
pub fn build_headers(config: &ApiConfig, csrf_token: &str) -> Result<HeaderMap> {
    let origin = Url::parse(&config.base_url)?.origin().ascii_serialization();
    let referer = format!("{}{}", origin, config.referer_path);

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert(ORIGIN, HeaderValue::from_str(&origin)?);
    headers.insert(REFERER, HeaderValue::from_str(&referer)?);
    headers.insert(
        HeaderName::from_static("x-client-locale"),
        HeaderValue::from_str(&config.locale)?,
    );
    headers.insert(
        HeaderName::from_static(CSRF_TOKEN_HEADER),
        HeaderValue::from_str(csrf_token)?,
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );

    Ok(headers)
}
