//! TelegramSender 통합 테스트 (mockito로 Bot API 대체).

use std::time::Duration;

use coin_notification::{NotificationError, NotificationSender, TelegramConfig, TelegramSender};
use mockito::{Matcher, Server};
use serde_json::json;

fn sender(server_url: String) -> TelegramSender {
    let config = TelegramConfig::new("TEST_TOKEN".to_string(), "@coins".to_string())
        .with_base_url(server_url)
        .with_message_delay(Duration::from_millis(1));
    TelegramSender::new(config).unwrap()
}

#[tokio::test]
async fn test_send_message_is_plain_text() {
    let text = "🟢 BTC: 67,000.0 usdt\n🔴 A&B<C: 1.0000 usdt";
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/botTEST_TOKEN/sendMessage")
        .match_body(Matcher::Json(json!({
            "chat_id": "@coins",
            "text": text,
        })))
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    sender(server.url()).send_message(text).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_message_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/botTEST_TOKEN/sendMessage")
        .with_status(400)
        .with_body(r#"{"ok": false, "description": "chat not found"}"#)
        .create_async()
        .await;

    let err = sender(server.url()).send_message("hi").await.unwrap_err();
    assert!(matches!(err, NotificationError::SendFailed(_)));
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/botTEST_TOKEN/sendMessage")
        .with_status(429)
        .with_body(r#"{"ok": false, "parameters": {"retry_after": 7}}"#)
        .create_async()
        .await;

    let err = sender(server.url()).send_message("hi").await.unwrap_err();
    assert!(matches!(err, NotificationError::RateLimited(7)));
}

#[tokio::test]
async fn test_send_messages_counts_successes() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("POST", "/botTEST_TOKEN/sendMessage")
        .match_body(Matcher::PartialJson(json!({"text": "ok"})))
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .expect(2)
        .create_async()
        .await;
    let _bad = server
        .mock("POST", "/botTEST_TOKEN/sendMessage")
        .match_body(Matcher::PartialJson(json!({"text": "bad"})))
        .with_status(500)
        .create_async()
        .await;

    let messages = vec!["ok".to_string(), "bad".to_string(), "ok".to_string()];
    let sent = sender(server.url()).send_messages(&messages).await;

    ok.assert_async().await;
    assert_eq!(sent, 2);
}

#[tokio::test]
async fn test_send_messages_omits_parse_mode() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/botTEST_TOKEN/sendMessage")
        .match_body(Matcher::Json(json!({"chat_id": "@coins", "text": "line"})))
        .with_status(200)
        .create_async()
        .await;

    let sent = sender(server.url()).send_messages(&["line".to_string()]).await;

    mock.assert_async().await;
    assert_eq!(sent, 1);
}
