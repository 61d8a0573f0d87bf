mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::TestApp;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, location, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_resource_index_redirects_home() {
    let app = TestApp::without_db();

    for uri in ["/res", "/res/"] {
        let (status, location, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location.as_deref(), Some("/"));
    }
}

#[tokio::test]
async fn test_resource_page_renders_html() {
    let app = TestApp::without_db();

    let (status, _, html) = get(&app, "/res/faq").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>FAQ | Coursekit</title>"));
    assert!(html.contains("Common questions"));
    assert!(html.contains(r#"<a href="https://example.com/docs" rel="nofollow" target="_blank">the docs</a>"#));
    assert!(html.contains(r#"<a href="https://github.com/octocat" rel="nofollow" target="_blank">@octocat</a>"#));
}

#[tokio::test]
async fn test_unknown_or_missing_resource_redirects_home() {
    let app = TestApp::without_db();

    // "tos" is a known slug without a file in the test docs root.
    for uri in ["/res/unknown", "/res/tos", "/res/..%2Fsecrets"] {
        let (status, location, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location.as_deref(), Some("/"));
    }
}

#[tokio::test]
async fn test_resource_json() {
    let app = TestApp::without_db();

    let (status, body) = app.send("GET", "/api/resources/faq", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "faq");
    assert_eq!(body["title"], "FAQ");
    assert_eq!(body["description"], "Common questions");
    assert_eq!(body["extra"]["updated"], "2024-05-01");
    assert!(body["content_html"].as_str().unwrap().contains("Questions"));

    let (status, body) = app.send("GET", "/api/resources/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::without_db();
    let response = app
        .router()
        .oneshot(Request::builder().uri("/api/resources/faq").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let request_id = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}
