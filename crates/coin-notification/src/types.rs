//! 알림 타입과 전송기 trait.

use async_trait::async_trait;
use thiserror::Error;

/// 알림 전송 결과 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// 알림 전송기 trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 메시지 하나를 전송합니다.
    async fn send_message(&self, text: &str) -> NotificationResult<()>;

    /// 메시지를 순서대로 하나씩 전송하고 성공한 개수를 반환합니다.
    ///
    /// 개별 실패는 로그만 남기고 다음 메시지로 넘어갑니다.
    async fn send_messages(&self, messages: &[String]) -> usize;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
