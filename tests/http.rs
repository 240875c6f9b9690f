use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use concordance::handlers::{AppState, router};
use concordance::index::Concordance;

fn make_state() -> AppState {
    let text = b"The apple and the ample angle\nan ankle, an apple\n";
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("document.txt");
    std::fs::write(&path, text).unwrap();
    let concordance = Concordance::build_from_file(&path).unwrap();
    AppState {
        table: concordance.freeze(),
        max_page_size: 500,
        disable_cache: false,
    }
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn healthz_ok() {
    let app = router(make_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn words_endpoint_lists_sorted_records() {
    let (status, body) = get_json("/v1/words").await;
    assert_eq!(status, StatusCode::OK);
    let words: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["word"].as_str().unwrap())
        .collect();
    assert_eq!(words, ["ample", "an", "and", "angle", "ankle", "apple", "the"]);
    assert_eq!(body["total"], 7);
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn words_endpoint_filters_by_prefix_and_paginates() {
    let (status, body) = get_json("/v1/words?prefix=An&page=1&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prefix"], "an");
    assert_eq!(body["total"], 4);
    assert_eq!(body["has_more"], true);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["word"], "an");
    assert_eq!(body["items"][0]["count"], 2);
    assert_eq!(body["items"][0]["lines"], serde_json::json!([2]));
}

#[tokio::test]
async fn words_endpoint_rejects_invalid_params() {
    let (status, body) = get_json("/v1/words?page=0&page_size=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .to_lowercase()
            .contains("page")
    );
}

#[tokio::test]
async fn words_endpoint_rejects_invalid_prefix() {
    let (status, body) = get_json("/v1/words?prefix=a1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("invalid prefix")
    );
}

#[tokio::test]
async fn word_endpoint_returns_record() {
    let (status, body) = get_json("/v1/words/Apple").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["word"], "apple");
    assert_eq!(body["count"], 2);
    assert_eq!(body["lines"], serde_json::json!([1, 2]));
}

#[tokio::test]
async fn word_endpoint_reports_missing_word() {
    let (status, body) = get_json("/v1/words/pear").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("not found")
    );
}
