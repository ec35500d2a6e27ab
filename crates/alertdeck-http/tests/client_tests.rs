//! HttpClient behavior against a mock server

use alertdeck_http::{HttpClient, HttpClientTrait, HttpConfig, HttpError, HttpRequest, StatusCode};
use mockito::Matcher;

fn quick_config() -> HttpConfig {
    HttpConfig {
        retry_backoff_ms: 5,
        ..HttpConfig::fast()
    }
}

#[tokio::test]
async fn test_send_propagates_query_headers_and_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/triggers/t1/conditions")
        .match_query(Matcher::UrlEncoded("triggerMode".into(), "FIRING".into()))
        .match_header("x-tenant-id", "acme")
        .match_body(Matcher::Json(serde_json::json!([{"dataId": "cpu"}])))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"dataId": "cpu", "conditionId": "c1"}]"#)
        .create_async()
        .await;

    let client = HttpClient::new(quick_config()).unwrap();
    let request = HttpRequest::put(format!("{}/triggers/t1/conditions", server.url()))
        .query("triggerMode", "FIRING")
        .header("X-Tenant-Id", "acme")
        .json(&serde_json::json!([{"dataId": "cpu"}]))
        .unwrap();

    let response = client.send(request).await.unwrap();
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body[0]["conditionId"], "c1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_reported_with_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/actions/email/ops")
        .with_status(404)
        .with_body("Action not found")
        .create_async()
        .await;

    let client = HttpClient::new(quick_config()).unwrap();
    let err = client
        .get(&format!("{}/actions/email/ops", server.url()))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        HttpError::HttpStatus { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Action not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_idempotent_request_is_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/alerts")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let client = HttpClient::new(quick_config().with_retry_count(2)).unwrap();
    let err = client
        .get(&format!("{}/alerts", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::RetryLimitExceeded { attempts: 3, .. }));
    assert!(err.is_unavailable());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_is_never_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/triggers")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let client = HttpClient::new(quick_config().with_retry_count(2)).unwrap();
    let err = client
        .post(
            &format!("{}/triggers", server.url()),
            serde_json::json!({"name": "cpu"}),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    mock.assert_async().await;
}
