//! 환경변수 기반 설정 모듈.

use std::time::Duration;

use crate::error::{Result, SchedulerError};

/// API 서버 기본 주소.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// `TRACKED_COINS` 미설정 시 추적 심볼.
pub const DEFAULT_TRACKED_COINS: [&str; 7] = ["BTC", "ETH", "BNB", "SOL", "TON", "PAXG", "KAG"];

const DEFAULT_INTERVAL_MINUTES: u64 = 30;
const DEFAULT_RETRY_DELAY_SECS: u64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 스케줄러 설정
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// API 서버 주소 (끝의 `/` 제거)
    pub api_url: String,
    /// Bearer 토큰
    pub api_token: String,
    /// 전송 주기
    pub interval: Duration,
    /// 실패 시 재시도 지연
    pub retry_delay: Duration,
    /// 추적 심볼 (대문자)
    pub tracked_coins: Vec<String>,
    /// 코인별 개별 메시지 전송 여부
    pub send_multiple: bool,
    /// API 호출 타임아웃
    pub timeout: Duration,
}

impl SchedulerConfig {
    /// 기본값으로 설정을 생성합니다.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_MINUTES * 60),
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            tracked_coins: parse_tracked_coins(""),
            send_multiple: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// 환경변수에서 설정 로드
    ///
    /// `API_TOKEN`이 없으면 에러를 반환합니다.
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var("API_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                SchedulerError::Config("API_TOKEN environment variable is required".to_string())
            })?;

        let api_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let interval_minutes = env_var_parse("UPDATE_INTERVAL_MINUTES", DEFAULT_INTERVAL_MINUTES);

        let mut config = Self::new(api_url, api_token)
            .with_interval(Duration::from_secs(interval_minutes * 60))
            .with_send_multiple(env_var_bool("SEND_MULTIPLE", false));

        if let Ok(coins) = std::env::var("TRACKED_COINS") {
            config.tracked_coins = parse_tracked_coins(&coins);
        }

        Ok(config)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_tracked_coins<I, S>(mut self, coins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tracked_coins = coins
            .into_iter()
            .map(|c| c.as_ref().trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    pub fn with_send_multiple(mut self, send_multiple: bool) -> Self {
        self.send_multiple = send_multiple;
        self
    }

    /// `symbols` 쿼리 값 (`BTC,ETH,...`).
    pub fn symbols_param(&self) -> String {
        self.tracked_coins.join(",")
    }

    /// 호출 대상 URL.
    pub fn endpoint(&self) -> String {
        format!("{}/crawl-and-send/specific", self.api_url)
    }
}

/// 쉼표로 구분된 심볼 목록을 파싱합니다.
///
/// 결과가 비어 있으면 [`DEFAULT_TRACKED_COINS`]를 반환합니다.
pub fn parse_tracked_coins(raw: &str) -> Vec<String> {
    let coins: Vec<String> = raw
        .split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect();

    if coins.is_empty() {
        DEFAULT_TRACKED_COINS.iter().map(|c| c.to_string()).collect()
    } else {
        coins
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 bool 값 파싱
fn env_var_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}
