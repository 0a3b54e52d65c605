mod common;

use std::time::Duration;

use chromastudio::{ChromaError, MediaKind, PollOutcome};
use common::StagedResponder;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn status_path(job_id: &str) -> String {
    format!("/image-gen/{}/{}/status", common::TEST_USER, job_id)
}

#[tokio::test]
async fn polls_until_the_job_completes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(StagedResponder::new(
            2,
            json!({
                "status": "completed",
                "result": { "mediaUrl": "https://x/out.png" }
            }),
        ))
        .mount(&server)
        .await;

    let client = common::test_client(&server, MediaKind::Image);
    let status = client.poll_job("J1").await.unwrap();

    assert_eq!(status.status, "completed");
    assert_eq!(status.media_url().unwrap(), "https://x/out.png");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn completion_on_the_first_query_skips_the_wait() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(StagedResponder::new(
            0,
            json!({
                "status": "completed",
                "result": [{ "mediaUrl": "https://x/out.png" }]
            }),
        ))
        .mount(&server)
        .await;

    // An interval far beyond the outer timeout proves no sleep happened.
    let client = common::test_client_with_polling(
        &server,
        MediaKind::Image,
        Duration::from_secs(600),
        60,
    );
    let status = tokio::time::timeout(Duration::from_secs(5), client.poll_job("J1"))
        .await
        .expect("first-query completion must not wait")
        .unwrap();
    assert_eq!(status.media_url().unwrap(), "https://x/out.png");
}

#[tokio::test]
async fn failed_status_carries_the_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failed",
            "error": "not enough credits"
        })))
        .mount(&server)
        .await;

    let client = common::test_client(&server, MediaKind::Image);
    match client.poll_job("J1").await.unwrap_err() {
        ChromaError::JobFailed(message) => assert_eq!(message, "not enough credits"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_status_without_a_message_gets_a_generic_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "error" })))
        .mount(&server)
        .await;

    let client = common::test_client(&server, MediaKind::Image);
    match client.poll_job("J1").await.unwrap_err() {
        ChromaError::JobFailed(message) => assert_eq!(message, "job processing failed"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn gives_up_after_the_configured_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .mount(&server)
        .await;

    let client = common::test_client_with_polling(
        &server,
        MediaKind::Image,
        Duration::from_millis(1),
        3,
    );
    let err = client.poll_job("J1").await.unwrap_err();

    assert!(matches!(err, ChromaError::JobTimeout(3)));
    // The ceiling bounds completed queries, not sleeps.
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn protocol_failure_aborts_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = common::test_client(&server, MediaKind::Image);
    let err = client.poll_job("J1").await.unwrap_err();

    assert!(matches!(err, ChromaError::StatusQuery(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn pre_cancelled_token_resolves_without_querying() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .mount(&server)
        .await;

    let client = common::test_client(&server, MediaKind::Image);
    let token = CancellationToken::new();
    token.cancel();

    let outcome = client.poll_job_cancellable("J1", token).await.unwrap();
    assert!(matches!(outcome, PollOutcome::Cancelled));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn cancellation_during_the_wait_is_honored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(status_path("J1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .mount(&server)
        .await;

    let client = common::test_client_with_polling(
        &server,
        MediaKind::Image,
        Duration::from_secs(600),
        60,
    );
    let token = CancellationToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        client.poll_job_cancellable("J1", token),
    )
    .await
    .expect("cancellation must interrupt the wait")
    .unwrap();

    assert!(matches!(outcome, PollOutcome::Cancelled));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
