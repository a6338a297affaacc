//! 에러 타입 정의.

use thiserror::Error;

/// 스케줄러 에러 타입
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP 전송 에러
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API가 2xx가 아닌 응답을 반환
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, SchedulerError>;
