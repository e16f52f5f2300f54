use std::time::Duration;

use chrono::NaiveDate;
use mockito::Matcher;
use serde_json::json;
use study_timer::{
    error::ClientError,
    services::{http_client, ChatClient, HttpChatClient, HttpUsageSink},
    timer::UsageSink,
};

fn client() -> reqwest::Client {
    http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn usage_sink_posts_minutes_and_date() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/analytics/study-time")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "minutes": 25, "date": "2024-05-01" })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let sink = HttpUsageSink::new(client(), format!("{}/api/analytics/study-time", server.url()));
    sink.record(25, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn usage_sink_surfaces_http_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/study")
        .with_status(401)
        .with_body("unauthorized")
        .create_async()
        .await;

    let sink = HttpUsageSink::new(client(), format!("{}/study", server.url()));
    let err = sink
        .record(1, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn chat_client_reads_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Json(json!({ "message": "explain recursion" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"reply":"See: recursion."}"#)
        .create_async()
        .await;

    let chat = HttpChatClient::new(client(), format!("{}/api/chat", server.url()));
    let reply = chat.reply("explain recursion").await.unwrap();

    assert_eq!(reply, "See: recursion.");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_client_rejects_malformed_reply() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"answer":"wrong field"}"#)
        .create_async()
        .await;

    let chat = HttpChatClient::new(client(), format!("{}/api/chat", server.url()));
    let err = chat.reply("hi").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Nothing listens on port 9 locally
    let chat = HttpChatClient::new(client(), "http://127.0.0.1:9/api/chat");
    let err = chat.reply("hi").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
}
