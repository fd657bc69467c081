//! Integration tests for zfrontier-crawler
//!
//! Every test runs against a local wiremock server and a scratch directory.

mod comment_tests;
mod login_tests;
