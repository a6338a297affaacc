//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 소스 관련 오류.
///
/// 디렉터리 계층은 이 오류를 호출자에게 전파하지 않고 다음 전략으로 강등합니다.
#[derive(Debug, Error)]
pub enum DataError {
    /// API 키 미설정
    #[error("CoinMarketCap API key not configured")]
    MissingApiKey,

    /// HTTP 전송 오류
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx가 아닌 응답
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 캐시 오류
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<redis::RedisError> for DataError {
    fn from(err: redis::RedisError) -> Self {
        DataError::CacheError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
