//! Comment crawl tests against a mock reply listing endpoint

use crate::common::{
    api_client, envelope, error_envelope, feed_entry, form, form_field, test_config,
    RecordingSleeper,
};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zfrontier_crawler::api::response::RATE_LIMITED_MESSAGE;
use zfrontier_crawler::crawler::CommentCrawler;
use zfrontier_crawler::output::FlowItemsCsv;
use zfrontier_crawler::{run_comments, CrawlError, Credentials, FeedItem};

fn comment(id: i64) -> Value {
    json!({"id": id, "content": format!("comment {}", id)})
}

#[tokio::test]
async fn test_comments_paged_until_empty() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "1"))
        .respond_with(envelope(json!({"list": [comment(1), comment(2)]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "2"))
        .respond_with(envelope(json!({"list": [comment(3)]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "3"))
        .respond_with(envelope(json!({"list": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path());
    let api = api_client(&config);
    let sleeper = RecordingSleeper::default();

    let comments = CommentCrawler::new(&api, &config, &sleeper)
        .fetch_comments("8812")
        .await
        .unwrap()
        .expect("Thread should be complete");

    assert_eq!(comments, vec![comment(1), comment(2), comment(3)]);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2); 2]);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(form_field(request, "id").as_deref(), Some("8812"));
        assert_eq!(form_field(request, "snap").as_deref(), Some("0"));
        assert_eq!(form_field(request, "sortBy").as_deref(), Some("ctime_asc"));
        assert_eq!(form_field(request, "unfold").as_deref(), Some("0"));
        assert!(form_field(request, "time").is_some());
        assert!(form_field(request, "t").is_some());
    }
}

#[tokio::test]
async fn test_rate_limited_page_is_retried() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "2"))
        .respond_with(error_envelope(20001, RATE_LIMITED_MESSAGE))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "1"))
        .respond_with(envelope(json!({"list": [comment(1)]})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "2"))
        .respond_with(envelope(json!({"list": []})))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path());
    let api = api_client(&config);
    let sleeper = RecordingSleeper::default();

    let comments = CommentCrawler::new(&api, &config, &sleeper)
        .fetch_comments("5")
        .await
        .unwrap()
        .expect("Thread should be complete after the retry");

    assert_eq!(comments, vec![comment(1)]);

    let pages: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|request| form_field(request, "page"))
        .collect();
    assert_eq!(pages, vec!["1", "2", "2"]);

    assert_eq!(
        sleeper.sleeps(),
        vec![Duration::from_secs(2), Duration::from_secs(600)]
    );
}

#[tokio::test]
async fn test_failed_page_discards_thread() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "1"))
        .respond_with(envelope(json!({"list": [comment(1)]})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path());
    let api = api_client(&config);
    let sleeper = RecordingSleeper::default();

    let comments = CommentCrawler::new(&api, &config, &sleeper)
        .fetch_comments("5")
        .await
        .unwrap();

    assert!(comments.is_none());
}

#[tokio::test]
async fn test_run_saves_each_post_once_and_skips_failures() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("id", "11"))
        .and(form("page", "1"))
        .respond_with(envelope(json!({"list": [comment(1), comment(2)]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("id", "11"))
        .and(form("page", "2"))
        .respond_with(envelope(json!({"list": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .and(form("id", "22"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let input = dir.path().join("20240520_flow_items.csv");
    let csv = FlowItemsCsv::open(&input).unwrap();
    let items: Vec<FeedItem> = [11, 22, 11]
        .into_iter()
        .map(|id| FeedItem::from_value(&feed_entry(id)).unwrap())
        .collect();
    csv.append(&items).unwrap();

    let mut config = test_config(&mock_server.uri(), dir.path());
    config.crawler.post_delay_secs = 5;
    let api = api_client(&config);
    let sleeper = RecordingSleeper::default();

    let report = CommentCrawler::new(&api, &config, &sleeper)
        .run(&input)
        .await
        .expect("Comment crawl failed");

    assert_eq!(report.input, input);
    assert_eq!(report.posts, 2);
    assert_eq!(report.saved, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.comments, 2);

    let comments_dir = dir.path().join("comments");
    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(comments_dir.join("11.json")).unwrap())
            .unwrap();
    assert_eq!(
        saved,
        json!({
            "ok": 0,
            "msg": "",
            "data": {"list": [comment(1), comment(2)], "authorZan": [], "foldCnt": null}
        })
    );
    assert!(!comments_dir.join("22.json").exists());

    // Page delay inside post 11, then the post delay before post 22
    assert_eq!(
        sleeper.sleeps(),
        vec![Duration::from_secs(2), Duration::from_secs(5)]
    );
}

#[tokio::test]
async fn test_run_comments_without_input_skips_login() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(envelope(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path());
    let credentials = Credentials::new("13800000000", "secret");

    let result = run_comments(&config, &credentials, None).await;

    assert!(matches!(result, Err(CrawlError::InputNotFound(_))));
}

#[tokio::test]
async fn test_unusable_post_id_is_skipped_without_ending_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/circle/flowReplyList"))
        .respond_with(envelope(json!({"list": []})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let input = dir.path().join("handmade_flow_items.csv");
    std::fs::write(
        &input,
        "id,hash_id,view_url,title,user_nickname,user_hash_id,user_view_url\n\
         1,h1,u,t,n,uh,uu\n\
         ..,h2,u,t,n,uh,uu\n\
         2,h3,u,t,n,uh,uu\n",
    )
    .unwrap();

    let config = test_config(&mock_server.uri(), dir.path());
    let api = api_client(&config);
    let sleeper = RecordingSleeper::default();

    let report = CommentCrawler::new(&api, &config, &sleeper)
        .run(&input)
        .await
        .expect("A bad post id must not end the run");

    assert_eq!(report.posts, 3);
    assert_eq!(report.saved, 2);
    assert_eq!(report.failed, 1);

    let comments_dir = dir.path().join("comments");
    assert!(comments_dir.join("1.json").exists());
    assert!(comments_dir.join("2.json").exists());

    // The bad id never reaches the network
    let ids: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|request| form_field(request, "id"))
        .collect();
    assert_eq!(ids, vec!["1", "2"]);

    // One post delay, between the two posts actually fetched
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2)]);
}
