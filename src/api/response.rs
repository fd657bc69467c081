//! Response classification
//!
//! Every endpoint wraps its payload in the same `{ok, msg, data}` envelope.
//! Classification is a pure function of the status code and body so that the
//! pagination loop alone decides how to react to each outcome.

use reqwest::StatusCode;
use serde_json::Value;

/// `ok` value of a successful envelope
pub const OK_SUCCESS: i64 = 0;

/// `ok` value the platform uses for throttled requests
pub const OK_RATE_LIMITED: i64 = 20001;

/// `msg` the platform sends with [`OK_RATE_LIMITED`] ("operation too frequent")
pub const RATE_LIMITED_MESSAGE: &str = "操作太频繁了";

/// Outcome of a single API call
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseClass {
    /// The request never produced a 200 response
    ///
    /// `status` is `None` when the request failed before any response
    /// arrived (connection refused, timeout, ...).
    TransportFailure { status: Option<u16> },

    /// The platform asked us to slow down; the same request may be retried
    RateLimited,

    /// The envelope was missing, malformed or reported an error
    ApplicationError { ok: Option<i64>, msg: String },

    /// Success; carries the envelope's `data` value
    Valid(Value),
}

impl ResponseClass {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Classifies a raw HTTP response
///
/// # Arguments
///
/// * `status` - HTTP status of the response
/// * `body` - Raw response body (only inspected for status 200)
pub fn classify(status: StatusCode, body: &[u8]) -> ResponseClass {
    if status != StatusCode::OK {
        return ResponseClass::TransportFailure {
            status: Some(status.as_u16()),
        };
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(envelope) => classify_envelope(&envelope),
        Err(e) => ResponseClass::ApplicationError {
            ok: None,
            msg: format!("response is not JSON: {}", e),
        },
    }
}

/// Classifies an already-parsed envelope
pub fn classify_envelope(envelope: &Value) -> ResponseClass {
    let ok = envelope.get("ok").and_then(Value::as_i64);
    let msg = envelope
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if ok == Some(OK_SUCCESS) {
        if let Some(data) = envelope.get("data").filter(|d| !d.is_null()) {
            return ResponseClass::Valid(data.clone());
        }
    }

    if ok == Some(OK_RATE_LIMITED) && msg == RATE_LIMITED_MESSAGE {
        return ResponseClass::RateLimited;
    }

    ResponseClass::ApplicationError {
        ok,
        msg: msg.to_string(),
    }
}
