//! 데이터 소스 설정.

use std::time::Duration;

/// CoinMarketCap Pro API 기본 URL.
pub const DEFAULT_API_BASE_URL: &str = "https://pro-api.coinmarketcap.com/v1";

/// 폴백 추출 대상 공개 목록 페이지.
pub const DEFAULT_PAGE_URL: &str = "https://coinmarketcap.com/";

/// 페이지 요청 시 사용할 브라우저 User-Agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 가격 API 및 폴백 페이지 설정.
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    /// CoinMarketCap Pro API 키 (없으면 폴백 추출만 사용)
    pub api_key: Option<String>,
    /// API 기본 URL
    pub api_base_url: String,
    /// 폴백 페이지 URL
    pub page_url: String,
    /// 요청별 타임아웃
    pub timeout: Duration,
    /// 페이지 요청 User-Agent
    pub user_agent: String,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DataSourceConfig {
    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// - `CMC_API_KEY`: API 키 (빈 문자열은 미설정으로 취급)
    /// - `CMC_API_BASE_URL`, `CMC_PAGE_URL`: URL 재정의
    /// - `HTTP_TIMEOUT_SECS`: 요청 타임아웃 (기본 10초)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key: std::env::var("CMC_API_KEY").ok(),
            api_base_url: std::env::var("CMC_API_BASE_URL").unwrap_or(defaults.api_base_url),
            page_url: std::env::var("CMC_PAGE_URL").unwrap_or(defaults.page_url),
            timeout: Duration::from_secs(timeout_secs),
            user_agent: defaults.user_agent,
        }
        .normalized()
    }

    /// API 키를 설정합니다.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.normalized()
    }

    /// API 기본 URL을 설정합니다.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// 폴백 페이지 URL을 설정합니다.
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = url.into();
        self
    }

    /// 유효한 API 키가 있는지 여부.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn normalized(mut self) -> Self {
        self.api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = DataSourceConfig::default().with_api_key("   ");
        assert!(!config.has_api_key());

        let config = DataSourceConfig::default().with_api_key("abc");
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_defaults() {
        let config = DataSourceConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_url, DEFAULT_PAGE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
