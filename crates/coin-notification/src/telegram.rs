//! 텔레그램 알림 서비스.
//!
//! Telegram Bot API를 통해 코인 시세 메시지를 채널에 전송합니다.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::types::{NotificationError, NotificationResult, NotificationSender};

/// Telegram Bot API 기본 URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// 여러 메시지 전송 시 메시지 간 기본 간격.
pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_millis(100);

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 텔레그램 알림 전송 설정.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: String,
    /// 메시지를 보낼 채널/채팅 ID
    pub chat_id: String,
    /// Bot API 기본 URL
    pub base_url: String,
    /// 여러 메시지 전송 시 메시지 간 간격
    pub message_delay: Duration,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            base_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            message_delay: DEFAULT_MESSAGE_DELAY,
            timeout: Duration::from_secs(10),
        }
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// `TELEGRAM_TOKEN`과 `TELEGRAM_CHANNEL`이 모두 있어야 합니다.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        let chat_id = std::env::var("TELEGRAM_CHANNEL")
            .ok()
            .filter(|v| !v.trim().is_empty())?;

        let mut config = Self::new(bot_token, chat_id);
        if let Some(ms) = std::env::var("TELEGRAM_MESSAGE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.message_delay = Duration::from_millis(ms);
        }
        if let Ok(url) = std::env::var("TELEGRAM_API_URL") {
            config.base_url = url;
        }

        Some(config)
    }

    /// Bot API 기본 URL을 설정합니다.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 메시지 간 간격을 설정합니다.
    pub fn with_message_delay(mut self, delay: Duration) -> Self {
        self.message_delay = delay;
        self
    }
}

/// 429 응답 본문의 재시도 정보.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    parameters: Option<ErrorParameters>,
}

#[derive(Debug, Deserialize)]
struct ErrorParameters {
    retry_after: Option<u64>,
}

/// 텔레그램 알림 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> NotificationResult<Self> {
        if config.bot_token.is_empty() || config.chat_id.is_empty() {
            return Err(NotificationError::InvalidConfig(
                "bot token and chat id are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// 환경 변수에서 전송기를 생성합니다.
    pub fn from_env() -> Option<Self> {
        let config = TelegramConfig::from_env()?;
        match Self::new(config) {
            Ok(sender) => Some(sender),
            Err(e) => {
                error!("Failed to create Telegram sender: {}", e);
                None
            }
        }
    }

    /// 설정.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// `sendMessage`를 호출합니다.
    ///
    /// 시세 라인에는 페이지에서 추출한 `&`, `<` 등이 섞일 수 있어 항상 일반 텍스트로 보냅니다.
    async fn post(&self, text: &str) -> NotificationResult<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.base_url.trim_end_matches('/'),
            self.config.bot_token
        );

        let params = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
        });

        debug!(
            "Sending Telegram message to chat_id: {}",
            self.config.chat_id
        );

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // 요청 한도 제한 확인
        if status.as_u16() == 429 {
            let retry_after = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.parameters)
                .and_then(|p| p.retry_after)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(retry_after, "Telegram rate limited");
            return Err(NotificationError::RateLimited(retry_after));
        }

        Err(NotificationError::SendFailed(format!(
            "HTTP {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send_message(&self, text: &str) -> NotificationResult<()> {
        match self.post(text).await {
            Ok(()) => {
                info!("Message sent to Telegram successfully");
                Ok(())
            }
            Err(e) => {
                error!("Error sending message to Telegram: {}", e);
                Err(e)
            }
        }
    }

    async fn send_messages(&self, messages: &[String]) -> usize {
        let mut success_count = 0;

        for message in messages {
            match self.post(message).await {
                Ok(()) => {
                    success_count += 1;
                    tokio::time::sleep(self.config.message_delay).await;
                }
                Err(e) => {
                    error!("Error sending message '{}': {}", message, e);
                }
            }
        }

        info!(
            "Sent {}/{} messages to Telegram",
            success_count,
            messages.len()
        );
        success_count
    }

    fn is_enabled(&self) -> bool {
        !self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TelegramConfig::new("token".to_string(), "@channel".to_string());
        assert_eq!(config.base_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.message_delay, Duration::from_millis(100));
    }

    #[test]
    fn test_new_rejects_empty_config() {
        let config = TelegramConfig::new(String::new(), "@channel".to_string());
        assert!(matches!(
            TelegramSender::new(config),
            Err(NotificationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sender_name() {
        let config = TelegramConfig::new("token".to_string(), "@channel".to_string());
        let sender = TelegramSender::new(config).unwrap();
        assert_eq!(sender.name(), "telegram");
        assert!(sender.is_enabled());
    }
}
