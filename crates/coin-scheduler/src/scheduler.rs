//! 주기 실행 루프.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Client;
use serde_json::Value;
use tokio::sync::Notify;
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::error::{Result, SchedulerError};

/// 추적 심볼의 시세 전송을 주기적으로 요청하는 스케줄러.
///
/// 인스턴스 하나가 실행 플래그를 소유합니다.
#[derive(Debug)]
pub struct CoinScheduler {
    config: SchedulerConfig,
    client: Client,
    running: AtomicBool,
    wake: Notify,
}

impl CoinScheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            client,
            running: AtomicBool::new(false),
            wake: Notify::new(),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 실행 루프를 멈춥니다. 진행 중인 요청은 끝까지 수행됩니다.
    ///
    /// 대기 중인 루프만 깨우며 permit을 남기지 않습니다.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.wake.notify_waiters();
    }

    /// 시세 전송을 한 번 요청합니다.
    ///
    /// 성공하면 API 응답 본문을 반환합니다.
    pub async fn send_update(&self) -> Result<Value> {
        let send_multiple = if self.config.send_multiple { "true" } else { "false" };

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_token)
            .query(&[
                ("symbols", self.config.symbols_param().as_str()),
                ("send_multiple", send_multiple),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Failed to send update");
            return Err(SchedulerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: Value = response.json().await?;
        info!(result = %result, "Update sent successfully");
        Ok(result)
    }

    /// Ctrl+C를 받을 때까지 실행합니다.
    pub async fn run(&self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Ctrl+C 핸들러 설치 실패: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
    }

    /// `shutdown`이 완료되거나 [`stop`](Self::stop)이 호출될 때까지 실행합니다.
    ///
    /// 성공하면 주기만큼, 실패하면 재시도 지연만큼 기다린 뒤 다음 요청을 보냅니다.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.running.store(true, Ordering::SeqCst);
        tokio::pin!(shutdown);

        info!(
            interval_secs = self.config.interval.as_secs(),
            coins = %self.config.tracked_coins.join(", "),
            "스케줄러 시작"
        );

        while self.is_running() {
            let delay = match self.send_update().await {
                Ok(_) => {
                    info!(
                        "다음 전송까지 {}분 대기",
                        self.config.interval.as_secs() / 60
                    );
                    self.config.interval
                }
                Err(e) => {
                    error!(error = %e, "Scheduler error, retrying after delay");
                    self.config.retry_delay
                }
            };

            // 플래그 확인 전에 등록해야 그 사이의 stop()을 놓치지 않음
            let woken = self.wake.notified();
            tokio::pin!(woken);
            woken.as_mut().enable();
            if !self.is_running() {
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("종료 신호 수신, 스케줄러 종료 중...");
                    self.stop();
                }
                _ = woken => {}
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("스케줄러 종료");
    }
}
