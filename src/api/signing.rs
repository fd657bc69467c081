//! Per-request signing parameters
//!
//! Every listing call carries a `time` field, an `X-Csrf-Token` header and a
//! `t` field that is the MD5 of the two concatenated. The server expects
//! `time` to lag the real clock by exactly [`TIME_SKEW_SECS`].

use md5::{Digest, Md5};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds subtracted from the wall clock for the `time` field
pub const TIME_SKEW_SECS: u64 = 1000;

/// The three values that authenticate a single API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// Unix seconds minus [`TIME_SKEW_SECS`], sent as the `time` form field
    pub current_time: String,

    /// Unix milliseconds, sent as the `X-Csrf-Token` header
    pub csrf_token: String,

    /// Hex MD5 of `current_time + csrf_token`, sent as the `t` form field
    pub signature: String,
}

impl RequestParams {
    /// Generates parameters from the current wall clock
    pub fn generate() -> Self {
        Self::at(SystemTime::now())
    }

    /// Generates parameters for a fixed instant
    pub fn at(now: SystemTime) -> Self {
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        let current_time = since_epoch
            .as_secs()
            .saturating_sub(TIME_SKEW_SECS)
            .to_string();
        let csrf_token = since_epoch.as_millis().to_string();
        let signature = sign(&current_time, &csrf_token);

        Self {
            current_time,
            csrf_token,
            signature,
        }
    }
}

/// Computes the `t` signature for a timestamp/token pair
pub fn sign(current_time: &str, csrf_token: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(current_time.as_bytes());
    hasher.update(csrf_token.as_bytes());
    hex::encode(hasher.finalize())
}
