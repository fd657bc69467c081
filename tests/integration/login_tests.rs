//! Login and session tests

use crate::common::{envelope, feed_entry, form_field, test_config};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zfrontier_crawler::api::login;
use zfrontier_crawler::crawler::StopReason;
use zfrontier_crawler::output::load_post_ids;
use zfrontier_crawler::{run_posts, Credentials};

#[tokio::test]
async fn test_login_posts_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/mobile"))
        .and(header("x-csrf-token", "1"))
        .respond_with(envelope(json!({"user": {"nickname": "me"}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server.uri(), dir.path());
    let credentials = Credentials::new("13800000000", "p@ss word");

    login(&config.api, &credentials)
        .await
        .expect("Login failed");

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    assert_eq!(form_field(request, "mobile").as_deref(), Some("13800000000"));
    assert_eq!(form_field(request, "password").as_deref(), Some("p@ss word"));
    assert_eq!(
        request.headers.get("content-type").unwrap().to_str().unwrap(),
        "application/x-www-form-urlencoded"
    );
}

#[tokio::test]
async fn test_rejected_login_still_returns_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/mobile"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server.uri(), dir.path());
    let credentials = Credentials::new("13800000000", "wrong");

    assert!(login(&config.api, &credentials).await.is_ok());
}

#[tokio::test]
async fn test_unreachable_login_is_an_error() {
    let dir = TempDir::new().unwrap();
    // Port 9 (discard) on localhost is not expected to accept connections
    let mut config = test_config("http://127.0.0.1:9", dir.path());
    config.api.timeout_secs = 2;
    let credentials = Credentials::new("13800000000", "secret");

    assert!(login(&config.api, &credentials).await.is_err());
}

#[tokio::test]
async fn test_session_cookie_is_sent_with_listing_requests() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/login/mobile"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "zf_session=abc; Path=/")
                .set_body_json(json!({"ok": 0, "msg": "", "data": {}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/flow/list"))
        .and(header("cookie", "zf_session=abc"))
        .respond_with(envelope(json!({
            "list": [feed_entry(1), feed_entry(2)],
            "offset": ""
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path());
    let credentials = Credentials::new("13800000000", "secret");

    let report = run_posts(&config, &credentials)
        .await
        .expect("Feed crawl failed");

    assert_eq!(report.stop, StopReason::Exhausted);
    assert_eq!(report.items, 2);
    assert!(report.csv_path.starts_with(dir.path()));
    assert!(report
        .csv_path
        .to_string_lossy()
        .ends_with("_flow_items.csv"));
    assert_eq!(load_post_ids(&report.csv_path).unwrap(), vec!["1", "2"]);
}
