//! 스케줄러 통합 테스트 (mockito API 서버).

use std::sync::Arc;
use std::time::Duration;

use coin_scheduler::{CoinScheduler, SchedulerConfig, SchedulerError};
use mockito::{Matcher, Server};

fn config(url: String) -> SchedulerConfig {
    SchedulerConfig::new(url, "sched-token")
        .with_tracked_coins(["BTC", "ETH"])
        .with_interval(Duration::from_secs(600))
        .with_retry_delay(Duration::from_millis(20))
}

#[tokio::test]
async fn test_send_update_posts_symbols_with_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/crawl-and-send/specific")
        .match_header("authorization", "Bearer sched-token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbols".into(), "BTC,ETH".into()),
            Matcher::UrlEncoded("send_multiple".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"success","coins_count":2}"#)
        .create_async()
        .await;

    let scheduler = CoinScheduler::new(config(server.url()).with_send_multiple(true)).unwrap();
    let result = scheduler.send_update().await.unwrap();

    assert_eq!(result["coins_count"], 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_update_reports_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/crawl-and-send/specific")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"code":"INVALID_TOKEN","message":"Invalid API token"}"#)
        .create_async()
        .await;

    let scheduler = CoinScheduler::new(config(server.url())).unwrap();
    match scheduler.send_update().await {
        Err(SchedulerError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API token"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_cycle_retries_after_delay() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/crawl-and-send/specific")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect_at_least(3)
        .create_async()
        .await;

    let scheduler = Arc::new(CoinScheduler::new(config(server.url())).unwrap());
    let runner = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run_until(std::future::pending()).await })
    };

    tokio::time::sleep(Duration::from_millis(500)).await;
    scheduler.stop();
    tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .unwrap()
        .unwrap();

    assert!(!scheduler.is_running());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stop_interrupts_interval_wait() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/crawl-and-send/specific")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let scheduler = Arc::new(CoinScheduler::new(config(server.url())).unwrap());
    let runner = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run_until(std::future::pending()).await })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    scheduler.stop();
    tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_shutdown_future_ends_loop() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/crawl-and-send/specific")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let scheduler = CoinScheduler::new(config(server.url())).unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tx.send(()).unwrap();

    tokio::time::timeout(
        Duration::from_secs(5),
        scheduler.run_until(async {
            let _ = rx.await;
        }),
    )
    .await
    .unwrap();

    assert!(!scheduler.is_running());
}

#[tokio::test]
async fn test_stop_before_run_does_not_skip_first_wait() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/crawl-and-send/specific")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let scheduler = Arc::new(CoinScheduler::new(config(server.url())).unwrap());
    // 실행 전 stop()은 다음 실행에 영향을 주지 않아야 함
    scheduler.stop();

    let runner = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run_until(std::future::pending()).await })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(scheduler.is_running());
    scheduler.stop();
    tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
}
