//! Remote API module
//!
//! This module contains everything that talks to the platform:
//! - Login and the cookie-carrying session
//! - Per-request signature generation
//! - The fixed header set
//! - Response envelope classification

mod client;
mod headers;
pub mod response;
mod session;
pub mod signing;

pub use client::{
    build_http_client, ApiClient, FLOW_LIST_PATH, FLOW_REPLY_LIST_PATH, MOBILE_LOGIN_PATH,
};
pub use headers::{build_headers, CSRF_TOKEN_HEADER};
pub use response::{classify, ResponseClass};
pub use session::{login, AuthSession, Credentials};
pub use signing::RequestParams;
