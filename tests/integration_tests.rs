//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: command line → GraphQL requests → JSON page files

use clap::Parser;
use forum_archive::cli::{Cli, Runner};
use forum_archive::output::PageStore;
use forum_archive::{Error, QueryName};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write a config file pointing the "test" server at the mock
fn write_config(dir: &TempDir, server: &MockServer, extra: &str) -> String {
    let config_path = dir.path().join("archive.yaml");
    let yaml = format!(
        "output_dir: \"{}\"\nendpoints:\n  test: \"{}/graphql\"\n{extra}",
        dir.path().join("out").display(),
        server.uri()
    );
    std::fs::write(&config_path, yaml).unwrap();
    config_path.display().to_string()
}

fn runner(config_path: &str, query: &str) -> Runner {
    Runner::new(Cli::try_parse_from(["forum-archive", "-C", config_path, "test", query]).unwrap())
}

fn store(dir: &TempDir) -> PageStore {
    PageStore::new(dir.path().join("out"))
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn posts_page(ids: &[&str]) -> serde_json::Value {
    let results: Vec<_> = ids
        .iter()
        .map(|id| json!({"_id": id, "title": format!("Title {id}")}))
        .collect();
    json!({"data": {"posts": {"results": results}}})
}

// ============================================================================
// Bulk Listing
// ============================================================================

#[tokio::test]
async fn test_posts_full_window_is_bisected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains(
            r#"after: \"2020-01-01T00:00:00Z\", before: \"2020-01-03T00:00:00Z\""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_page(&["a", "b"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            r#"after: \"2020-01-01T00:00:00Z\", before: \"2020-01-02T00:00:00Z\""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_page(&["a"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            r#"after: \"2020-01-02T00:00:00Z\", before: \"2020-01-03T00:00:00Z\""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_page(&["b"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(
        &dir,
        &server,
        "page_size: 2\nstart: \"2020-01-01T00:00:00Z\"\nend: \"2020-01-03T00:00:00Z\"\n",
    );
    let stats = runner(&config, "posts").run().await.unwrap();

    assert_eq!(stats.requests, 3);
    assert_eq!(stats.pages_written, 2);
    assert_eq!(stats.splits, 1);

    let posts_dir = dir.path().join("out").join("test").join("posts");
    assert_eq!(
        file_names(&posts_dir),
        vec![
            "2020-01-01T00:00:00Z-2020-01-02T00:00:00Z.json",
            "2020-01-02T00:00:00Z-2020-01-03T00:00:00Z.json",
        ]
    );

    let first = store(&dir)
        .read_page(&posts_dir.join("2020-01-01T00:00:00Z-2020-01-02T00:00:00Z.json"))
        .unwrap();
    assert_eq!(first, vec![json!({"_id": "a", "title": "Title a"})]);
}

#[tokio::test]
async fn test_comments_short_window_single_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(body_string_contains("comments(input"))
        .and(body_string_contains("limit: 100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"comments": {"results": [{"_id": "c1", "postId": "p1"}]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&dir, &server, "");
    let stats = runner(&config, "comments").run().await.unwrap();

    assert_eq!(stats.requests, 1);
    assert_eq!(
        file_names(&dir.path().join("out").join("test").join("comments")),
        vec!["1900-01-01T00:00:00Z-2100-01-01T00:00:00Z.json"]
    );
}

// ============================================================================
// Per-Post Comments
// ============================================================================

#[tokio::test]
async fn test_post_comments_resumes_from_checkpoints() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let store = store(&dir);
    store.ensure_query_dir("test", QueryName::Posts).unwrap();
    store
        .write_page(
            "test",
            QueryName::Posts,
            "1900-01-01T00:00:00Z-2100-01-01T00:00:00Z",
            &[json!({"_id": "p1", "title": "Done"}), json!({"_id": "p2", "title": "Todo"})],
        )
        .unwrap();
    store.ensure_query_dir("test", QueryName::PostComments).unwrap();
    store
        .write_page("test", QueryName::PostComments, "p1", &[])
        .unwrap();

    Mock::given(method("POST"))
        .and(body_string_contains(r#"postId: \"p2\""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"comments": {"results": [{"_id": "c9", "postId": "p2"}]}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains(r#"postId: \"p1\""#))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = write_config(&dir, &server, "");
    let stats = runner(&config, "post_comments").run().await.unwrap();

    assert_eq!(stats.requests, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(
        store
            .read_page(&store.page_path("test", QueryName::PostComments, "p2"))
            .unwrap(),
        vec![json!({"_id": "c9", "postId": "p2"})]
    );
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_graphql_error_aborts_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Cannot query field \"bogus\""}],
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&dir, &server, "");
    let err = runner(&config, "posts").run().await.unwrap_err();

    match err {
        Error::GraphQl { messages } => {
            assert_eq!(messages, vec!["Cannot query field \"bogus\"".to_string()]);
        }
        other => panic!("Expected GraphQl error, got {other:?}"),
    }
    assert!(file_names(&dir.path().join("out").join("test").join("posts")).is_empty());
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&dir, &server, "");
    let err = runner(&config, "posts").run().await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_server_error_retried_when_configured() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_page(&["a"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(
        &dir,
        &server,
        "http:\n  max_retries: 2\n  retry_backoff:\n    type: constant\n    initial_ms: 10\n",
    );
    let stats = runner(&config, "posts").run().await.unwrap();

    assert_eq!(stats.requests, 1);
    assert_eq!(stats.records_written, 1);
}

#[tokio::test]
async fn test_unknown_query_sends_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = write_config(&dir, &server, "");
    let err = runner(&config, "bogus").run().await.unwrap_err();

    assert_eq!(err.to_string(), "Unknown query bogus");
    assert!(!dir.path().join("out").exists());
}
